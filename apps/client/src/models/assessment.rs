use serde::{Deserialize, Serialize};

pub const SIGNAL_MIN: f64 = 30.0;
pub const SIGNAL_MAX: f64 = 100.0;
pub const MAX_EXPERIENCE_YEARS: u32 = 20;

/// Raw self-reported signals for one submission.
///
/// Built fresh from the intake fields every time and discarded afterwards.
/// Constructors clamp every numeric field into its allowed range, so a value
/// of this type is always valid input for the local scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub academic: f64,
    pub technical: f64,
    pub soft_skills: f64,
    pub experience_years: u32,
    pub github_username: Option<String>,
    pub linkedin_headline: Option<String>,
    pub cp_ratings: Vec<f64>,
    /// Presence-only signal. The file itself is never read.
    pub resume_file_name: Option<String>,
}

impl AssessmentInput {
    pub fn new(academic: f64, technical: f64, soft_skills: f64, experience_years: i64) -> Self {
        Self {
            academic: clamp_signal(academic),
            technical: clamp_signal(technical),
            soft_skills: clamp_signal(soft_skills),
            experience_years: clamp_years(experience_years),
            github_username: None,
            linkedin_headline: None,
            cp_ratings: Vec::new(),
            resume_file_name: None,
        }
    }

    pub fn with_github(mut self, username: impl Into<String>) -> Self {
        self.github_username = non_blank(username.into());
        self
    }

    pub fn with_linkedin_headline(mut self, headline: impl Into<String>) -> Self {
        self.linkedin_headline = non_blank(headline.into());
        self
    }

    pub fn with_resume(mut self, file_name: impl Into<String>) -> Self {
        self.resume_file_name = non_blank(file_name.into());
        self
    }

    /// Parses a comma-separated ratings field, see [`parse_ratings`].
    pub fn with_cp_ratings(mut self, raw: &str) -> Self {
        self.cp_ratings = parse_ratings(raw);
        self
    }

    /// Re-applies every range rule. Fields may have been mutated directly
    /// (they are public), so the scorer runs this before computing anything.
    pub fn clamped(&self) -> Self {
        Self {
            academic: clamp_signal(self.academic),
            technical: clamp_signal(self.technical),
            soft_skills: clamp_signal(self.soft_skills),
            experience_years: self.experience_years.min(MAX_EXPERIENCE_YEARS),
            github_username: self.github_username.clone().and_then(non_blank),
            linkedin_headline: self.linkedin_headline.clone().and_then(non_blank),
            cp_ratings: self
                .cp_ratings
                .iter()
                .copied()
                .filter(|r| r.is_finite() && *r > 0.0)
                .collect(),
            resume_file_name: self.resume_file_name.clone().and_then(non_blank),
        }
    }

    /// True when any of GitHub, LinkedIn or resume is present and non-empty.
    /// Competitive-programming ratings do not count.
    pub fn has_portfolio_signal(&self) -> bool {
        [
            &self.github_username,
            &self.linkedin_headline,
            &self.resume_file_name,
        ]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Splits on commas, drops anything that is not a finite positive number.
pub fn parse_ratings(raw: &str) -> Vec<f64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .collect()
}

fn clamp_signal(value: f64) -> f64 {
    if value.is_nan() {
        return SIGNAL_MIN;
    }
    value.clamp(SIGNAL_MIN, SIGNAL_MAX)
}

fn clamp_years(years: i64) -> u32 {
    years.clamp(0, MAX_EXPERIENCE_YEARS as i64) as u32
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
