//! Scoring API client: the single point of entry for every call to the
//! remote Career Metric service.
//!
//! No other module talks HTTP. Evaluation calls carry no client-side timeout;
//! a caller that stops waiting simply drops the future.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::EvaluationError;
use crate::models::api::{ErrorBody, EvaluationRequest, EvaluationResponse, HealthResponse};
use crate::models::user::{
    AuthenticatedUser, Profile, ProfileCreate, TokenResponse, UserRegistration,
};
use crate::scoring::RemoteEvaluator;

const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Thin wrapper over the service's REST routes.
#[derive(Clone, Debug)]
pub struct ScoringApiClient {
    client: Client,
    base_url: String,
}

impl ScoringApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// GET /api/v1/health
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.send(self.client.get(self.endpoint("/health"))).await
    }

    /// POST /api/v1/auth/register
    pub async fn register(
        &self,
        registration: &UserRegistration,
    ) -> Result<AuthenticatedUser, ApiError> {
        self.send(
            self.client
                .post(self.endpoint("/auth/register"))
                .json(registration),
        )
        .await
    }

    /// POST /api/v1/auth/login (OAuth2 password form).
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.send(
            self.client
                .post(self.endpoint("/auth/login"))
                .form(&[("username", email), ("password", password)]),
        )
        .await
    }

    /// GET /api/v1/auth/me
    pub async fn me(&self, token: &str) -> Result<AuthenticatedUser, ApiError> {
        self.send(self.client.get(self.endpoint("/auth/me")).bearer_auth(token))
            .await
    }

    /// GET /api/v1/profiles/
    pub async fn list_profiles(&self, token: &str) -> Result<Vec<Profile>, ApiError> {
        self.send(self.client.get(self.endpoint("/profiles/")).bearer_auth(token))
            .await
    }

    /// POST /api/v1/profiles/
    pub async fn create_profile(
        &self,
        token: &str,
        profile: &ProfileCreate,
    ) -> Result<Profile, ApiError> {
        self.send(
            self.client
                .post(self.endpoint("/profiles/"))
                .bearer_auth(token)
                .json(profile),
        )
        .await
    }

    /// POST /api/v1/assessments/{profile_id}/evaluate
    pub async fn evaluate_assessment(
        &self,
        profile_id: &str,
        token: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, ApiError> {
        let url = self.endpoint(&format!("/assessments/{profile_id}/evaluate"));
        self.send(self.client.post(url).bearer_auth(token).json(request))
            .await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body);
        warn!("Scoring API {} returned {}: {}", url, status, message);
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!("Scoring API {} returned {}", url, status);
    serde_json::from_str(&body).map_err(ApiError::Parse)
}

/// Pulls `detail` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message())
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl RemoteEvaluator for ScoringApiClient {
    async fn evaluate(
        &self,
        profile_id: &str,
        token: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResponse, EvaluationError> {
        self.evaluate_assessment(profile_id, token, request)
            .await
            .map_err(EvaluationError::from)
    }
}
