// src/handlers/simulation.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    db,
    engine::{evaluator::Submission, session::AttemptKind},
    error::AppError,
    handlers::attempt,
    state::AppState,
    utils::jwt::Claims,
};

/// Starts (or restarts) a simulated-attack attempt over all scenarios.
pub async fn start_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let pool = db::load_attacks(&state.pool).await.map_err(|e| {
        tracing::error!("Failed to fetch simulated attacks: {}", e);
        e
    })?;

    attempt::start(&state, user_id, AttemptKind::Simulation, pool)
}

/// Submits the chosen action for the current scenario.
pub async fn submit_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(submission): Json<Submission>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    attempt::submit(&state, user_id, AttemptKind::Simulation, submission).await
}

/// Advances the active simulation attempt to the next scenario.
pub async fn next_scenario(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    attempt::next(&state, user_id, AttemptKind::Simulation)
}
