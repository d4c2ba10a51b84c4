// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    db,
    engine::{evaluator::Submission, session::AttemptKind},
    error::AppError,
    handlers::attempt,
    state::AppState,
    utils::jwt::Claims,
};

#[derive(Debug, Deserialize)]
pub struct StartQuizParams {
    /// Question type to drill ('mcq', 'drag_drop', 'red_flag',
    /// 'password_strength'); omitted means all types.
    #[serde(rename = "type")]
    pub question_type: Option<String>,
}

/// Starts (or restarts) a quiz attempt: loads the question pool, shuffles
/// it and serves the first question. Replaces any attempt in progress.
pub async fn start_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<StartQuizParams>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let pool = db::load_questions(&state.pool, params.question_type.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions: {}", e);
            e
        })?;

    attempt::start(&state, user_id, AttemptKind::Quiz, pool)
}

/// Submits an answer for the current question of the active quiz attempt.
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(submission): Json<Submission>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    attempt::submit(&state, user_id, AttemptKind::Quiz, submission).await
}

/// Advances the active quiz attempt to the next question.
pub async fn next_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    attempt::next(&state, user_id, AttemptKind::Quiz)
}
