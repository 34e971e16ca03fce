use crate::errors::EvaluationError;
use crate::models::api::{EvaluationRequest, EvaluationResponse, FeedbackEntry, LinkedinData};
use crate::models::assessment::AssessmentInput;
use crate::models::summary::{ScoreComponent, ScoreSummary};
use crate::scoring::local::{experience_score, portfolio_score};

pub const ACTION_SEPARATOR: &str = " — ";
pub const MAX_LINKEDIN_SKILLS: usize = 10;

/// Builds the evaluation payload. Experience and portfolio are sent already
/// transformed to the 0–100 scale, the same values the local scorer uses.
pub fn build_evaluation_request(input: &AssessmentInput) -> EvaluationRequest {
    let input = input.clamped();

    EvaluationRequest {
        academic: input.academic,
        technical: input.technical,
        soft_skills: input.soft_skills,
        experience: experience_score(input.experience_years),
        integrations: portfolio_score(&input),
        resume_html: input.resume_file_name.as_deref().map(resume_marker),
        github_username: input.github_username.clone(),
        linkedin_data: input.linkedin_headline.as_ref().map(|headline| LinkedinData {
            headline: headline.clone(),
            skills: headline_keywords(headline),
        }),
        cp_ratings: input.cp_ratings.clone(),
    }
}

/// First ten whitespace-delimited tokens of the headline.
pub fn headline_keywords(headline: &str) -> Vec<String> {
    headline
        .split_whitespace()
        .take(MAX_LINKEDIN_SKILLS)
        .map(str::to_string)
        .collect()
}

/// Stand-in document telling the service a resume exists. Only the file
/// name is known locally.
pub fn resume_marker(file_name: &str) -> String {
    format!("<p>Resume uploaded: {}</p>", escape_html(file_name))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The message, joined to its action items by [`ACTION_SEPARATOR`] when present.
pub fn recommendation_text(entry: &FeedbackEntry) -> String {
    match entry.action_items.as_deref().map(str::trim) {
        Some(actions) if !actions.is_empty() => {
            format!("{}{}{}", entry.message, ACTION_SEPARATOR, actions)
        }
        _ => entry.message.clone(),
    }
}

/// Reshapes a service response into the display summary. Integration
/// payloads are carried over untouched.
pub fn summary_from_response(
    response: EvaluationResponse,
) -> Result<ScoreSummary, EvaluationError> {
    if !response.total_score.is_finite() {
        return Err(EvaluationError::Validation(format!(
            "total_score is not a number in assessment {}",
            response.id
        )));
    }
    if let Some(bad) = response.components.iter().find(|c| !c.score.is_finite()) {
        return Err(EvaluationError::Validation(format!(
            "component '{}' has a non-numeric score",
            bad.name
        )));
    }

    let recommendations = response
        .feedback_entries
        .iter()
        .map(recommendation_text)
        .collect();

    let components = response
        .components
        .into_iter()
        .map(|c| ScoreComponent {
            name: c.name,
            score: c.score,
            weight: c.weight,
        })
        .collect();

    Ok(ScoreSummary {
        total_score: response.total_score.round().clamp(0.0, 100.0) as u32,
        components,
        recommendations,
        resume_features: response.resume_features,
        github_summary: response.github_summary,
        linkedin_summary: response.linkedin_summary,
        cp_summary: response.cp_summary,
    })
}
