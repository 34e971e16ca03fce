//! Wire types for the remote scoring service's assessment endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/v1/assessments/{profile_id}/evaluate`.
/// All five signals are already on the 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub academic: f64,
    pub technical: f64,
    pub soft_skills: f64,
    pub experience: f64,
    pub integrations: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_data: Option<LinkedinData>,
    #[serde(default)]
    pub cp_ratings: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedinData {
    pub headline: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteComponent {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub message: String,
    #[serde(default)]
    pub action_items: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationResponse {
    pub id: String,
    pub profile_id: String,
    pub total_score: f64,
    pub components: Vec<RemoteComponent>,
    #[serde(default)]
    pub feedback_entries: Vec<FeedbackEntry>,
    #[serde(default)]
    pub resume_features: Option<Value>,
    #[serde(default)]
    pub github_summary: Option<Value>,
    #[serde(default)]
    pub linkedin_summary: Option<Value>,
    #[serde(default)]
    pub cp_summary: Option<Value>,
}

/// `GET /api/v1/health`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body returned by the service; `detail` is a string or a list of
/// validation errors depending on the failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
