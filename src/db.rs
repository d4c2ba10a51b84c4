// src/db.rs
//
// Query helpers shared by the attempt handlers and the dashboard.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::attack::AttackRow;
use crate::models::progress::ProgressEntry;
use crate::models::question::{Question, QuestionRow};

/// Loads questions, optionally filtered by type. No matching rows is an
/// empty list, not an error. Rows that cannot be parsed into a valid
/// typed question are skipped with a warning.
pub async fn load_questions(
    pool: &SqlitePool,
    filter_type: Option<&str>,
) -> Result<Vec<Question>, AppError> {
    let rows: Vec<QuestionRow> = match filter_type {
        Some(question_type) => {
            sqlx::query_as(
                "SELECT id, prompt, correct_answer, incorrect_answers, explanation, category, type
                 FROM questions WHERE type = ?",
            )
            .bind(question_type)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, prompt, correct_answer, incorrect_answers, explanation, category, type
                 FROM questions",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Question::try_from(row) {
                Ok(question) => Some(question),
                Err(reason) => {
                    tracing::warn!("Skipping malformed question {}: {}", id, reason);
                    None
                }
            }
        })
        .collect())
}

/// Loads all simulated attacks as scenario questions.
pub async fn load_attacks(pool: &SqlitePool) -> Result<Vec<Question>, AppError> {
    let rows: Vec<AttackRow> = sqlx::query_as(
        "SELECT id, scenario, attack_type, correct_action, incorrect_actions, explanation
         FROM simulated_attacks",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AttackRow::into_question).collect())
}

/// Which of the user's two progress logs an operation targets.
#[derive(Debug, Clone, Copy)]
pub enum LogColumn {
    Quiz,
    Simulation,
}

impl LogColumn {
    fn select_sql(self) -> &'static str {
        match self {
            LogColumn::Quiz => "SELECT quiz_log FROM users WHERE id = ?",
            LogColumn::Simulation => "SELECT simulation_log FROM users WHERE id = ?",
        }
    }

    fn update_sql(self) -> &'static str {
        match self {
            LogColumn::Quiz => "UPDATE users SET quiz_log = ? WHERE id = ?",
            LogColumn::Simulation => "UPDATE users SET simulation_log = ? WHERE id = ?",
        }
    }
}

/// Reads and decodes a user's progress log. A missing or unparseable
/// blob decodes to an empty log with a warning; a missing user row is
/// `NotFound`.
pub async fn read_log(
    pool: &SqlitePool,
    user_id: i64,
    column: LogColumn,
) -> Result<Vec<ProgressEntry>, AppError> {
    let blob: Option<String> = sqlx::query_scalar(column.select_sql())
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    let blob = blob.ok_or(AppError::NotFound("User not found".to_string()))?;

    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&blob) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            tracing::warn!(
                "Unparseable progress log for user {}, treating as empty: {}",
                user_id,
                e
            );
            Ok(Vec::new())
        }
    }
}

/// Appends one entry to a user's progress log.
///
/// Read-modify-write of the whole encoded sequence; there is no
/// optimistic concurrency control, so callers must not run two
/// concurrent appends for the same user.
pub async fn append_log_entry(
    pool: &SqlitePool,
    user_id: i64,
    column: LogColumn,
    entry: &ProgressEntry,
) -> Result<(), AppError> {
    let mut log = read_log(pool, user_id, column).await?;
    log.push(entry.clone());

    let encoded =
        serde_json::to_string(&log).map_err(|e| AppError::InternalServerError(e.to_string()))?;

    sqlx::query(column.update_sql())
        .bind(encoded)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
