use serde::{Deserialize, Serialize};

/// `POST /api/v1/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct UserRegistration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// `GET /api/v1/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub target_role: Option<String>,
    pub highest_education: Option<String>,
    pub years_experience: Option<f64>,
    #[serde(default)]
    pub current_score_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileCreate {
    pub target_role: String,
    pub highest_education: String,
    pub years_experience: f64,
}

impl Default for ProfileCreate {
    fn default() -> Self {
        Self {
            target_role: "Software Engineer".to_string(),
            highest_education: "Bachelor".to_string(),
            years_experience: 0.0,
        }
    }
}
