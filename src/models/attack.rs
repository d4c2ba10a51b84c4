// src/models/attack.rs

use serde::Deserialize;
use sqlx::prelude::FromRow;
use validator::Validate;

use crate::models::question::{Question, QuestionKind};

/// Represents the 'simulated_attacks' table: one social-engineering
/// scenario plus the actions a user can take in response.
#[derive(Debug, Clone, FromRow)]
pub struct AttackRow {
    pub id: i64,
    pub scenario: String,
    pub attack_type: String,
    pub correct_action: String,
    pub incorrect_actions: String,
    pub explanation: String,
}

impl AttackRow {
    /// Maps a scenario row into the common question shape so the attempt
    /// session and evaluator can treat simulations uniformly. The attack
    /// type travels in `category`.
    pub fn into_question(self) -> Question {
        let incorrect_actions = self
            .incorrect_actions
            .split(',')
            .filter(|a| !a.trim().is_empty())
            .map(|a| a.to_string())
            .collect();

        Question {
            id: self.id,
            prompt: self.scenario,
            explanation: self.explanation,
            category: self.attack_type,
            kind: QuestionKind::ScenarioAction {
                correct_action: self.correct_action,
                incorrect_actions,
            },
        }
    }
}

/// DTO for creating a new simulated attack.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAttackRequest {
    #[validate(length(min = 1, max = 2000))]
    pub scenario: String,
    #[validate(custom(function = validate_attack_type))]
    pub attack_type: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_action: String,
    #[validate(length(max = 2000))]
    pub incorrect_actions: Option<String>,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

fn validate_attack_type(attack_type: &str) -> Result<(), validator::ValidationError> {
    match attack_type {
        "email" | "message" | "call" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_attack_type")),
    }
}
