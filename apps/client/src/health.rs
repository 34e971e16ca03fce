use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::api_client::ScoringApiClient;

/// How often the shell re-probes the service in watch mode.
pub const POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Loading,
    Online,
    Offline,
}

impl ServiceStatus {
    pub fn label(self) -> &'static str {
        match self {
            ServiceStatus::Loading => "Checking",
            ServiceStatus::Online => "Live",
            ServiceStatus::Offline => "Offline",
        }
    }
}

/// Last known reachability of the scoring service.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    status: ServiceStatus,
    last_updated: Option<DateTime<Local>>,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self {
            status: ServiceStatus::Loading,
            last_updated: None,
        }
    }
}

impl HealthMonitor {
    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Probes the service once. Only a `{"status": "ok"}` reply counts as online;
    /// the timestamp moves only on success.
    pub async fn refresh(&mut self, api: &ScoringApiClient) -> ServiceStatus {
        match api.health().await {
            Ok(body) if body.status == "ok" => {
                self.record(ServiceStatus::Online, Local::now());
            }
            Ok(body) => {
                debug!(status = %body.status, "Scoring service reported unhealthy");
                self.record(ServiceStatus::Offline, Local::now());
            }
            Err(e) => {
                debug!("Health check failed: {e}");
                self.record(ServiceStatus::Offline, Local::now());
            }
        }
        self.status
    }

    fn record(&mut self, status: ServiceStatus, at: DateTime<Local>) {
        self.status = status;
        if status == ServiceStatus::Online {
            self.last_updated = Some(at);
        }
    }

    /// "Live 14:02:11", "Offline", "Checking".
    pub fn pill(&self) -> String {
        match (self.status, self.last_updated) {
            (ServiceStatus::Online, Some(at)) => {
                format!("{} {}", self.status.label(), at.format("%H:%M:%S"))
            }
            (status, _) => status.label().to_string(),
        }
    }
}
