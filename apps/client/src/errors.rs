use thiserror::Error;

use crate::api_client::ApiError;

/// Why a remote evaluation could not produce a summary.
///
/// None of these are fatal: the submission flow catches every variant and
/// falls back to the locally computed summary.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication required")]
    Auth,
}

impl EvaluationError {
    /// Short machine-readable code, used in logs and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            EvaluationError::Validation(_) => "VALIDATION_ERROR",
            EvaluationError::Network(_) => "NETWORK_ERROR",
            EvaluationError::Auth => "AUTH_REQUIRED",
        }
    }
}

impl From<ApiError> for EvaluationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) if e.is_decode() => EvaluationError::Validation(e.to_string()),
            ApiError::Http(e) => EvaluationError::Network(e.to_string()),
            ApiError::Api { status, .. } if status == 401 || status == 403 => EvaluationError::Auth,
            ApiError::Api { status, message } => {
                EvaluationError::Network(format!("status {status}: {message}"))
            }
            ApiError::Parse(e) => EvaluationError::Validation(format!("malformed payload: {e}")),
            ApiError::InvalidUrl(msg) => EvaluationError::Network(msg),
        }
    }
}
