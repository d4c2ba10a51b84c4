// src/engine/evaluator.rs

use serde::{Deserialize, Serialize};

use crate::engine::strength;
use crate::error::AppError;
use crate::models::question::{Question, QuestionKind};

/// A user's answer to one question, shaped per interaction mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    /// Multiple choice: the selected option.
    Choice { answer: String },
    /// Drag-and-drop: the bin the item was dropped in ("Safe"/"Scam").
    /// The gesture-to-label mapping happens client side.
    Classification { label: String },
    /// Red flags: the set of selected element texts.
    RedFlags { selected: Vec<String> },
    /// Password strength: the free-text candidate password.
    Password { password: String },
    /// Simulated attack: the chosen response action.
    Action { action: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub correct: bool,
    pub feedback: String,
}

/// Maps a (question, submission) pair to a correctness verdict and
/// feedback text. Pure; a missing or wrongly-shaped submission is a
/// validation error and never changes any state.
pub fn evaluate(question: &Question, submission: &Submission) -> Result<Verdict, AppError> {
    match (&question.kind, submission) {
        (QuestionKind::Mcq { correct_answer, .. }, Submission::Choice { answer }) => {
            if answer.is_empty() {
                return Err(AppError::BadRequest("Please select an answer.".to_string()));
            }
            let correct = answer == correct_answer;
            Ok(Verdict {
                correct,
                feedback: exact_match_feedback(correct, "answer", correct_answer, &question.explanation),
            })
        }

        (QuestionKind::DragDrop { correct_label }, Submission::Classification { label }) => {
            if label.is_empty() {
                return Err(AppError::BadRequest(
                    "Please drag the item to Safe or Scam.".to_string(),
                ));
            }
            let correct = label == correct_label;
            Ok(Verdict {
                correct,
                feedback: exact_match_feedback(correct, "answer", correct_label, &question.explanation),
            })
        }

        (
            QuestionKind::RedFlag {
                elements,
                flag_count,
            },
            Submission::RedFlags { selected },
        ) => {
            if selected.is_empty() {
                return Err(AppError::BadRequest(
                    "Please select at least one red flag.".to_string(),
                ));
            }

            let flagged: Vec<&str> = elements
                .iter()
                .filter(|e| e.is_red_flag)
                .map(|e| e.text.as_str())
                .collect();

            // Exact set equality, plus the stored count. The count is
            // redundant with the flagged set but kept as a consistency
            // check against the persisted payload.
            let correct = selected.len() == *flag_count
                && flagged.iter().all(|f| selected.iter().any(|s| s == f))
                && selected.iter().all(|s| flagged.contains(&s.as_str()));

            // One line per selected element; selections that match no
            // element contribute an empty line.
            let explanations = selected
                .iter()
                .map(|s| {
                    elements
                        .iter()
                        .find(|e| &e.text == s)
                        .map(|e| format!("{}: {}", s, e.explanation))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join("\n");

            let feedback = if correct {
                format!("Correct! You identified all red flags.\n{}", explanations)
            } else {
                format!(
                    "Incorrect. You missed some red flags or selected incorrect ones.\n{}\nCorrect red flags: {}.",
                    explanations,
                    flagged.join(", ")
                )
            };

            Ok(Verdict { correct, feedback })
        }

        (QuestionKind::PasswordStrength { required }, Submission::Password { password }) => {
            if password.is_empty() {
                return Err(AppError::BadRequest("Please enter password.".to_string()));
            }
            let observed = strength::classify(password).strength;
            let correct = observed == *required;
            let feedback = if correct {
                format!(
                    "Correct! This password is {}. {}",
                    observed, question.explanation
                )
            } else {
                format!(
                    "Incorrect. The password is {}, but a {} password is required. {}",
                    observed, required, question.explanation
                )
            };
            Ok(Verdict { correct, feedback })
        }

        (QuestionKind::ScenarioAction { correct_action, .. }, Submission::Action { action }) => {
            if action.is_empty() {
                return Err(AppError::BadRequest("Please select an action.".to_string()));
            }
            let correct = action == correct_action;
            Ok(Verdict {
                correct,
                feedback: exact_match_feedback(correct, "action", correct_action, &question.explanation),
            })
        }

        // Submission shape does not match the question's interaction mode;
        // treat it like a missing submission for that mode.
        (QuestionKind::Mcq { .. }, _) => {
            Err(AppError::BadRequest("Please select an answer.".to_string()))
        }
        (QuestionKind::DragDrop { .. }, _) => Err(AppError::BadRequest(
            "Please drag the item to Safe or Scam.".to_string(),
        )),
        (QuestionKind::RedFlag { .. }, _) => Err(AppError::BadRequest(
            "Please select at least one red flag.".to_string(),
        )),
        (QuestionKind::PasswordStrength { .. }, _) => {
            Err(AppError::BadRequest("Please enter password.".to_string()))
        }
        (QuestionKind::ScenarioAction { .. }, _) => {
            Err(AppError::BadRequest("Please select an action.".to_string()))
        }
    }
}

fn exact_match_feedback(correct: bool, noun: &str, expected: &str, explanation: &str) -> String {
    if correct {
        format!("Correct! {}", explanation)
    } else {
        format!(
            "Incorrect. The correct {} is \"{}\". {}",
            noun, expected, explanation
        )
    }
}
