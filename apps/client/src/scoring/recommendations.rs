use crate::models::assessment::AssessmentInput;

pub const TECHNICAL_GAP: &str =
    "Join a weekend hackathon or ship a micro-saas to sharpen technical delivery.";
pub const ACADEMIC_GAP: &str = "Revisit core CS concepts—algorithms, data structures, and DBMS.";
pub const SOFT_SKILLS_GAP: &str =
    "Practice behavioural interviews with STAR stories for key roles.";
pub const EXPERIENCE_GAP: &str =
    "Add capstone projects or freelance gigs to demonstrate applied experience.";
pub const BASELINE_SOLID: &str =
    "Great baseline! Double down on advanced certifications this month.";

struct Rule {
    fires: fn(&AssessmentInput) -> bool,
    message: &'static str,
}

fn technical_gap(input: &AssessmentInput) -> bool {
    input.technical < 70.0
}

fn academic_gap(input: &AssessmentInput) -> bool {
    input.academic < 65.0
}

fn soft_skills_gap(input: &AssessmentInput) -> bool {
    input.soft_skills < 60.0
}

fn experience_gap(input: &AssessmentInput) -> bool {
    input.experience_years < 2
}

// Evaluated in order; every rule that fires contributes its message.
const RULES: &[Rule] = &[
    Rule {
        fires: technical_gap,
        message: TECHNICAL_GAP,
    },
    Rule {
        fires: academic_gap,
        message: ACADEMIC_GAP,
    },
    Rule {
        fires: soft_skills_gap,
        message: SOFT_SKILLS_GAP,
    },
    Rule {
        fires: experience_gap,
        message: EXPERIENCE_GAP,
    },
];

/// Threshold recommendations for a clamped input. Never empty: when no rule
/// fires the single baseline message is returned.
pub fn recommendations_for(input: &AssessmentInput) -> Vec<String> {
    let mut suggestions: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.fires)(input))
        .map(|rule| rule.message.to_string())
        .collect();

    if suggestions.is_empty() {
        suggestions.push(BASELINE_SOLID.to_string());
    }
    suggestions
}
