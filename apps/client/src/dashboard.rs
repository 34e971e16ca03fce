use std::fmt::Write;

use crate::models::summary::{ScoreComponent, ScoreSummary};

pub const STRENGTH_THRESHOLD: f64 = 80.0;
pub const FOCUS_THRESHOLD: f64 = 60.0;
const BAR_WIDTH: usize = 20;

/// Components split into strengths (≥ 80) and focus areas (< 60).
#[derive(Debug, Default)]
pub struct Highlights<'a> {
    pub strengths: Vec<&'a ScoreComponent>,
    pub focus: Vec<&'a ScoreComponent>,
}

pub fn highlights(summary: &ScoreSummary) -> Highlights<'_> {
    Highlights {
        strengths: summary
            .components
            .iter()
            .filter(|c| c.score >= STRENGTH_THRESHOLD)
            .collect(),
        focus: summary
            .components
            .iter()
            .filter(|c| c.score < FOCUS_THRESHOLD)
            .collect(),
    }
}

fn bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn weight_label(weight: f64) -> String {
    if weight > 0.0 {
        format!("{:.0}%", weight * 100.0)
    } else {
        "n/a".to_string()
    }
}

/// Plain-text readiness overview.
pub fn render_report(summary: &ScoreSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, summary);
    out
}

fn write_report(out: &mut String, summary: &ScoreSummary) -> std::fmt::Result {
    writeln!(out, "Readiness score: {}", summary.total_score)?;
    writeln!(out)?;

    writeln!(out, "Components")?;
    if summary.is_empty() {
        writeln!(out, "  Provide inputs to visualise your readiness radar.")?;
    } else {
        let name_width = summary
            .components
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for c in &summary.components {
            writeln!(
                out,
                "  {:<width$}  [{}] {:>5.1}  weight {}",
                c.name,
                bar(c.score),
                c.score,
                weight_label(c.weight),
                width = name_width
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Next best actions")?;
    if summary.recommendations.is_empty() {
        writeln!(out, "  Submit your profile to unlock targeted guidance.")?;
    }
    for rec in &summary.recommendations {
        writeln!(out, "  - {rec}")?;
    }
    writeln!(out)?;

    let highlights = highlights(summary);
    writeln!(out, "Strengths")?;
    if highlights.strengths.is_empty() {
        writeln!(out, "  We will fill this as you submit!")?;
    }
    for c in &highlights.strengths {
        writeln!(out, "  - {}", c.name)?;
    }
    writeln!(out, "Focus areas")?;
    if highlights.focus.is_empty() {
        writeln!(out, "  Everything looks balanced so far.")?;
    }
    for c in &highlights.focus {
        writeln!(out, "  - {}", c.name)?;
    }

    let integrations = summary.integrations();
    if !integrations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Integrated signals")?;
        for (label, payload) in integrations {
            let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            writeln!(out, "  {label}")?;
            for line in pretty.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }
    Ok(())
}
