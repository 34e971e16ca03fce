use crate::models::assessment::AssessmentInput;
use crate::models::summary::{weighted_average, ComponentKind, ScoreComponent, ScoreSummary};
use crate::scoring::recommendations::recommendations_for;

pub const PORTFOLIO_WITH_SIGNAL: f64 = 90.0;
pub const PORTFOLIO_WITHOUT_SIGNAL: f64 = 60.0;

/// min(100, years × 10 + 30)
pub fn experience_score(years: u32) -> f64 {
    (years as f64 * 10.0 + 30.0).min(100.0)
}

/// Coarse presence threshold: any portfolio signal lifts the score to 90.
pub fn portfolio_score(input: &AssessmentInput) -> f64 {
    if input.has_portfolio_signal() {
        PORTFOLIO_WITH_SIGNAL
    } else {
        PORTFOLIO_WITHOUT_SIGNAL
    }
}

/// The five components in display order.
pub fn local_components(input: &AssessmentInput) -> Vec<ScoreComponent> {
    ComponentKind::ALL
        .iter()
        .map(|&kind| {
            let score = match kind {
                ComponentKind::Academic => input.academic,
                ComponentKind::Technical => input.technical,
                ComponentKind::SoftSkills => input.soft_skills,
                ComponentKind::Experience => experience_score(input.experience_years),
                ComponentKind::Portfolio => portfolio_score(input),
            };
            ScoreComponent::new(kind, score)
        })
        .collect()
}

/// Client-side readiness estimate. Pure and total: the input is re-clamped
/// first, so any value of `AssessmentInput` yields a summary.
pub fn compute_local_summary(input: &AssessmentInput) -> ScoreSummary {
    let input = input.clamped();
    let components = local_components(&input);
    let total_score = weighted_average(&components).round().clamp(0.0, 100.0) as u32;

    ScoreSummary {
        total_score,
        components,
        recommendations: recommendations_for(&input),
        ..ScoreSummary::default()
    }
}
