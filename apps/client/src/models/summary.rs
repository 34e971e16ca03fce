use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five fixed components of a locally computed readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Academic,
    Technical,
    SoftSkills,
    Experience,
    Portfolio,
}

impl ComponentKind {
    /// Display order of the components.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Academic,
        ComponentKind::Technical,
        ComponentKind::SoftSkills,
        ComponentKind::Experience,
        ComponentKind::Portfolio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Academic => "Academic",
            ComponentKind::Technical => "Technical",
            ComponentKind::SoftSkills => "Soft Skills",
            ComponentKind::Experience => "Experience",
            ComponentKind::Portfolio => "Portfolio",
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            ComponentKind::Academic => 0.25,
            ComponentKind::Technical => 0.35,
            ComponentKind::SoftSkills => 0.20,
            ComponentKind::Experience => 0.10,
            ComponentKind::Portfolio => 0.10,
        }
    }
}

/// Sum of the fixed weight table. Always 1.0.
pub fn weight_sum() -> f64 {
    ComponentKind::ALL.iter().map(|k| k.weight()).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

impl ScoreComponent {
    pub fn new(kind: ComponentKind, score: f64) -> Self {
        Self {
            name: kind.label().to_string(),
            score,
            weight: kind.weight(),
        }
    }
}

/// Σ(score × weight) / Σweight, or 0 when the weights sum to nothing.
pub fn weighted_average(components: &[ScoreComponent]) -> f64 {
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    components.iter().map(|c| c.score * c.weight).sum::<f64>() / total_weight
}

/// A rendered readiness result. Produced once and replaced wholesale by the
/// next submission; never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_score: u32,
    pub components: Vec<ScoreComponent>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_features: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_summary: Option<Value>,
}

impl ScoreSummary {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, name: &str) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Integration payloads echoed by the remote service, labelled for display.
    pub fn integrations(&self) -> Vec<(&'static str, &Value)> {
        [
            ("Resume", self.resume_features.as_ref()),
            ("GitHub", self.github_summary.as_ref()),
            ("LinkedIn", self.linkedin_summary.as_ref()),
            ("Competitive Programming", self.cp_summary.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}
