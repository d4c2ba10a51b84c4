// src/models/question.rs

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::engine::strength::Strength;

/// Classification bins for drag-and-drop questions.
pub const DRAG_LABELS: [&str; 2] = ["Safe", "Scam"];

/// Raw shape of the 'questions' table: flat text columns that are
/// reinterpreted per `type`.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub prompt: String,

    /// The correct option, a bin label, a flag count (as text) or a
    /// strength tier, depending on `type`.
    pub correct_answer: String,

    /// Comma-separated distractors, or a JSON array of elements for
    /// red_flag rows.
    pub incorrect_answers: String,

    pub explanation: String,
    pub category: String,

    /// Mapped from the database column 'type' since `type` is a reserved
    /// keyword in Rust.
    #[sqlx(rename = "type")]
    pub question_type: String,
}

/// One inspectable element of a red-flag scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagElement {
    pub text: String,
    pub is_red_flag: bool,
    pub explanation: String,
}

/// Typed question payload. Parsing the flat row into a tagged variant up
/// front keeps malformed data out of the evaluation path entirely.
#[derive(Debug, Clone)]
pub enum QuestionKind {
    Mcq {
        correct_answer: String,
        incorrect_answers: Vec<String>,
    },
    DragDrop {
        correct_label: String,
    },
    RedFlag {
        elements: Vec<RedFlagElement>,
        flag_count: usize,
    },
    PasswordStrength {
        required: Strength,
    },
    /// A simulated-attack scenario; answered by picking the safe action.
    /// `category` on the owning `Question` holds the attack type.
    ScenarioAction {
        correct_action: String,
        incorrect_actions: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub prompt: String,
    pub explanation: String,
    pub category: String,
    pub kind: QuestionKind,
}

impl Question {
    /// Label recorded in the progress log for an attempt that ended on
    /// this question. Scenarios log their attack type.
    pub fn log_label(&self) -> &str {
        match self.kind {
            QuestionKind::Mcq { .. } => "mcq",
            QuestionKind::DragDrop { .. } => "drag_drop",
            QuestionKind::RedFlag { .. } => "red_flag",
            QuestionKind::PasswordStrength { .. } => "password_strength",
            QuestionKind::ScenarioAction { .. } => &self.category,
        }
    }
}

impl TryFrom<QuestionRow> for Question {
    type Error = String;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let kind = match row.question_type.as_str() {
            "mcq" => QuestionKind::Mcq {
                correct_answer: row.correct_answer,
                incorrect_answers: split_list(&row.incorrect_answers),
            },
            "drag_drop" => {
                if !DRAG_LABELS.contains(&row.correct_answer.as_str()) {
                    return Err(format!(
                        "drag_drop answer must be one of {:?}, got '{}'",
                        DRAG_LABELS, row.correct_answer
                    ));
                }
                QuestionKind::DragDrop {
                    correct_label: row.correct_answer,
                }
            }
            "red_flag" => {
                let flag_count: usize = row
                    .correct_answer
                    .trim()
                    .parse()
                    .map_err(|_| format!("red_flag count '{}' is not an integer", row.correct_answer))?;
                QuestionKind::RedFlag {
                    elements: parse_red_flag_elements(&row.incorrect_answers, flag_count),
                    flag_count,
                }
            }
            "password_strength" => QuestionKind::PasswordStrength {
                required: row.correct_answer.parse()?,
            },
            other => return Err(format!("unknown question type '{}'", other)),
        };

        Ok(Question {
            id: row.id,
            prompt: row.prompt,
            explanation: row.explanation,
            category: row.category,
            kind,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parses the red-flag element list. The canonical encoding is a JSON
/// array; legacy rows hold a comma-separated list where the first
/// `flag_count` elements are the flagged ones. The fallback is a tolerated
/// degraded mode, logged so bad rows do not stay invisible.
fn parse_red_flag_elements(raw: &str, flag_count: usize) -> Vec<RedFlagElement> {
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<RedFlagElement>>(raw) {
        Ok(elements) => elements,
        Err(e) => {
            tracing::warn!("Falling back to comma-separated red flags: {}", e);
            raw.split(',')
                .filter(|s| !s.trim().is_empty())
                .enumerate()
                .map(|(index, text)| RedFlagElement {
                    text: text.to_string(),
                    is_red_flag: index < flag_count,
                    explanation: format!(
                        "Element \"{}\" is {}.",
                        text,
                        if index < flag_count { "suspicious" } else { "normal" }
                    ),
                })
                .collect()
        }
    }
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: String,
    pub prompt: String,
    pub category: String,
    /// Answer choices (mcq/scenario, shuffled per presentation), the two
    /// bin labels (drag_drop), or element texts in order (red_flag).
    pub options: Vec<String>,
}

impl PublicQuestion {
    pub fn present(question: &Question) -> Self {
        let mut rng = rand::thread_rng();
        let (question_type, options) = match &question.kind {
            QuestionKind::Mcq {
                correct_answer,
                incorrect_answers,
            } => {
                let mut options = vec![correct_answer.clone()];
                options.extend(incorrect_answers.iter().cloned());
                options.shuffle(&mut rng);
                ("mcq", options)
            }
            QuestionKind::DragDrop { .. } => (
                "drag_drop",
                DRAG_LABELS.iter().map(|s| s.to_string()).collect(),
            ),
            QuestionKind::RedFlag { elements, .. } => (
                "red_flag",
                elements.iter().map(|e| e.text.clone()).collect(),
            ),
            QuestionKind::PasswordStrength { .. } => ("password_strength", Vec::new()),
            QuestionKind::ScenarioAction {
                correct_action,
                incorrect_actions,
            } => {
                let mut options = vec![correct_action.clone()];
                options.extend(incorrect_actions.iter().cloned());
                options.shuffle(&mut rng);
                ("simulated_attack", options)
            }
        };

        PublicQuestion {
            id: question.id,
            question_type: question_type.to_string(),
            prompt: question.prompt.clone(),
            category: question.category.clone(),
            options,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(custom(function = validate_question_type))]
    pub question_type: String,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(length(max = 4000))]
    pub incorrect_answers: Option<String>,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
}

fn validate_question_type(question_type: &str) -> Result<(), validator::ValidationError> {
    match question_type {
        "mcq" | "drag_drop" | "red_flag" | "password_strength" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_question_type")),
    }
}
