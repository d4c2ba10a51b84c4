// src/seed.rs
//
// Starter content, inserted on first launch when the content tables are
// empty. Curated questions and scenarios live in seed_data.json.

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::AppError;

const SEED_DATA: &str = include_str!("seed_data.json");

#[derive(Debug, Deserialize)]
struct SeedData {
    questions: Vec<SeedQuestion>,
    attacks: Vec<SeedAttack>,
}

#[derive(Debug, Deserialize)]
struct SeedQuestion {
    prompt: String,
    correct_answer: String,
    incorrect_answers: String,
    explanation: String,
    category: String,
    #[serde(rename = "type")]
    question_type: String,
}

#[derive(Debug, Deserialize)]
struct SeedAttack {
    scenario: String,
    attack_type: String,
    correct_action: String,
    incorrect_actions: String,
    explanation: String,
}

/// Seeds questions and simulated attacks if their tables are empty.
pub async fn seed_content(pool: &SqlitePool) -> Result<(), AppError> {
    let data: SeedData = serde_json::from_str(SEED_DATA)
        .map_err(|e| AppError::InternalServerError(format!("Invalid seed data: {}", e)))?;

    let question_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;

    if question_count == 0 {
        for q in &data.questions {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO questions
                    (prompt, correct_answer, incorrect_answers, explanation, category, type)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&q.prompt)
            .bind(&q.correct_answer)
            .bind(&q.incorrect_answers)
            .bind(&q.explanation)
            .bind(&q.category)
            .bind(&q.question_type)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded {} questions", data.questions.len());
    }

    let attack_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM simulated_attacks")
        .fetch_one(pool)
        .await?;

    if attack_count == 0 {
        for a in &data.attacks {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO simulated_attacks
                    (scenario, attack_type, correct_action, incorrect_actions, explanation)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&a.scenario)
            .bind(&a.attack_type)
            .bind(&a.correct_action)
            .bind(&a.incorrect_actions)
            .bind(&a.explanation)
            .execute(pool)
            .await?;
        }
        tracing::info!("Seeded {} simulated attacks", data.attacks.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Question, QuestionRow};

    /// Every bundled question must survive the typed parse, otherwise it
    /// would be silently skipped at load time.
    #[test]
    fn bundled_questions_all_parse() {
        let data: SeedData = serde_json::from_str(SEED_DATA).unwrap();
        assert!(!data.questions.is_empty());
        assert!(!data.attacks.is_empty());

        for (i, q) in data.questions.iter().enumerate() {
            let row = QuestionRow {
                id: i as i64,
                prompt: q.prompt.clone(),
                correct_answer: q.correct_answer.clone(),
                incorrect_answers: q.incorrect_answers.clone(),
                explanation: q.explanation.clone(),
                category: q.category.clone(),
                question_type: q.question_type.clone(),
            };
            assert!(
                Question::try_from(row).is_ok(),
                "seed question {} does not parse: {}",
                i,
                q.prompt
            );
        }
    }

    #[test]
    fn bundled_attacks_use_known_types() {
        let data: SeedData = serde_json::from_str(SEED_DATA).unwrap();
        for a in &data.attacks {
            assert!(
                ["email", "message", "call"].contains(&a.attack_type.as_str()),
                "unknown attack type: {}",
                a.attack_type
            );
        }
    }
}
