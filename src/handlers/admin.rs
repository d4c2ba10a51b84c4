// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        attack::CreateAttackRequest,
        question::{CreateQuestionRequest, Question, QuestionRow},
    },
};

/// Creates a question. The payload is checked against the typed question
/// model before insertion, so rows that could not be parsed back out
/// (bad drag label, non-numeric flag count, unknown tier) are rejected
/// here instead of being skipped at load time.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let incorrect_answers = payload.incorrect_answers.unwrap_or_default();
    let explanation = payload.explanation.unwrap_or_default();
    let category = payload.category.unwrap_or_default();

    let candidate = QuestionRow {
        id: 0,
        prompt: payload.prompt.clone(),
        correct_answer: payload.correct_answer.clone(),
        incorrect_answers: incorrect_answers.clone(),
        explanation: explanation.clone(),
        category: category.clone(),
        question_type: payload.question_type.clone(),
    };
    if let Err(reason) = Question::try_from(candidate) {
        return Err(AppError::BadRequest(reason));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO questions (prompt, correct_answer, incorrect_answers, explanation, category, type)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.prompt)
    .bind(&payload.correct_answer)
    .bind(&incorrect_answers)
    .bind(&explanation)
    .bind(&category)
    .bind(&payload.question_type)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict("A question with this prompt already exists".to_string())
        } else {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a simulated-attack scenario.
pub async fn create_attack(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateAttackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO simulated_attacks (scenario, attack_type, correct_action, incorrect_actions, explanation)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.scenario)
    .bind(&payload.attack_type)
    .bind(&payload.correct_action)
    .bind(payload.incorrect_actions.unwrap_or_default())
    .bind(payload.explanation.unwrap_or_default())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict("A scenario with this text already exists".to_string())
        } else {
            tracing::error!("Failed to create attack: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn delete_attack(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM simulated_attacks WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Attack not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
