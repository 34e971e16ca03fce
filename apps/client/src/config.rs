use std::path::PathBuf;

use anyhow::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const SESSION_FILE_NAME: &str = "session.json";

/// Client configuration loaded from environment variables (and `.env`).
/// Every value has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        // Validated when the client is built, after any --api-url override.
        let api_url =
            std::env::var("CAREER_METRIC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_path = match std::env::var("CAREER_METRIC_SESSION_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_session_path(std::env::var_os("HOME").map(PathBuf::from)),
        };

        Ok(Config {
            api_url,
            session_path,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn default_session_path(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(".career-metric").join(SESSION_FILE_NAME),
        None => PathBuf::from(".career-metric-session.json"),
    }
}
