// src/handlers/dashboard.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    db::{self, LogColumn},
    error::AppError,
    models::progress::{self, ATTACK_TYPES, QUIZ_TYPES},
    utils::jwt::Claims,
};

/// Aggregated progress statistics for the current user: overall and
/// per-type summaries over both progress logs.
pub async fn get_dashboard(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let quiz_log = db::read_log(&pool, user_id, LogColumn::Quiz).await?;
    let simulation_log = db::read_log(&pool, user_id, LogColumn::Simulation).await?;

    let quiz_summary = progress::summarize(&quiz_log);
    let simulation_summary = progress::summarize(&simulation_log);

    Ok(Json(json!({
        "quiz": {
            "attempts": quiz_summary.attempts,
            "average_score_pct": quiz_summary.average_score_pct,
            "by_type": progress::breakdown(&quiz_log, &QUIZ_TYPES),
        },
        "simulation": {
            "attempts": simulation_summary.attempts,
            "average_score_pct": simulation_summary.average_score_pct,
            "by_type": progress::breakdown(&simulation_log, &ATTACK_TYPES),
        },
    })))
}
