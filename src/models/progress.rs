// src/models/progress.rs

use serde::{Deserialize, Serialize};

/// Quiz question types the dashboard breaks progress down by.
pub const QUIZ_TYPES: [&str; 4] = ["mcq", "drag_drop", "red_flag", "password_strength"];

/// Simulated-attack types the dashboard breaks progress down by.
pub const ATTACK_TYPES: [&str; 3] = ["email", "message", "call"];

/// One completed attempt, as stored in the per-user append-only log.
/// Field names are fixed by the persisted JSON format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub attempt_id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub score: i64,
    pub total_questions: i64,
    pub attempt_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub attempts: usize,
    pub average_score_pct: f64,
}

/// Dashboard row for one question or attack type.
#[derive(Debug, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub attempts: usize,
    pub average_score_pct: f64,
}

/// Aggregates a log into attempt count and mean percentage score,
/// rounded to one decimal. Pure function of the log contents.
pub fn summarize(entries: &[ProgressEntry]) -> ProgressSummary {
    let attempts = entries.len();
    if attempts == 0 {
        return ProgressSummary {
            attempts: 0,
            average_score_pct: 0.0,
        };
    }

    let total: f64 = entries
        .iter()
        .map(|e| {
            if e.total_questions > 0 {
                e.score as f64 / e.total_questions as f64 * 100.0
            } else {
                0.0
            }
        })
        .sum();

    ProgressSummary {
        attempts,
        average_score_pct: round_one_decimal(total / attempts as f64),
    }
}

/// Per-type summaries: filter, then apply the same formula.
pub fn breakdown(entries: &[ProgressEntry], types: &[&str]) -> Vec<TypeBreakdown> {
    types
        .iter()
        .map(|t| {
            let filtered: Vec<ProgressEntry> = entries
                .iter()
                .filter(|e| e.entry_type == *t)
                .cloned()
                .collect();
            let summary = summarize(&filtered);
            TypeBreakdown {
                entry_type: t.to_string(),
                attempts: summary.attempts,
                average_score_pct: summary.average_score_pct,
            }
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
