// src/handlers/attempt.rs
//
// Attempt plumbing shared by the quiz and simulation flows. The two
// flows differ only in where their question pool comes from, the nominal
// attempt length and which progress log the summary lands in.

use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

use crate::db::{self, LogColumn};
use crate::engine::evaluator::Submission;
use crate::engine::session::{AttemptKind, AttemptSession};
use crate::error::AppError;
use crate::models::progress::ProgressEntry;
use crate::models::question::{PublicQuestion, Question};
use crate::state::AppState;

impl AttemptKind {
    fn log_column(self) -> LogColumn {
        match self {
            AttemptKind::Quiz => LogColumn::Quiz,
            AttemptKind::Simulation => LogColumn::Simulation,
        }
    }
}

/// Starts (or restarts) an attempt over the given pool, replacing any
/// active session for this user and kind.
pub fn start(
    state: &AppState,
    user_id: i64,
    kind: AttemptKind,
    pool: Vec<Question>,
) -> Result<impl IntoResponse, AppError> {
    let session = AttemptSession::start(kind, pool)?;

    let body = json!({
        "session_id": session.session_id().to_string(),
        "target_questions": session.target(),
        "question": PublicQuestion::present(session.current()),
    });

    let mut sessions = state.sessions.lock().expect("session registry poisoned");
    sessions.insert((user_id, kind), session);

    Ok(Json(body))
}

/// Evaluates the submission against the current question of the active
/// session. On completion the summary is appended to the user's progress
/// log; a failed append is reported in the response but the attempt
/// still completes.
pub async fn submit(
    state: &AppState,
    user_id: i64,
    kind: AttemptKind,
    submission: Submission,
) -> Result<impl IntoResponse, AppError> {
    // Evaluate and, if this was the final question, detach the session.
    // The registry lock is released before any database work.
    let (outcome, target, finished) = {
        let mut sessions = state.sessions.lock().expect("session registry poisoned");
        let session = sessions
            .get_mut(&(user_id, kind))
            .ok_or_else(|| AppError::BadRequest("No active attempt. Start one first.".to_string()))?;

        let outcome = session.submit(&submission)?;
        let target = session.target();

        let finished = if outcome.completed {
            sessions.remove(&(user_id, kind))
        } else {
            None
        };

        (outcome, target, finished)
    };

    let mut body = json!({
        "correct": outcome.verdict.correct,
        "feedback": outcome.verdict.feedback,
        "answered": outcome.answered,
        "correct_count": outcome.correct,
        "target_questions": target,
        "completed": outcome.completed,
    });

    if let Some(session) = finished {
        let entry = ProgressEntry {
            attempt_id: session.session_id().to_string(),
            entry_type: session.current().log_label().to_string(),
            score: session.correct() as i64,
            total_questions: session.target() as i64,
            attempt_date: chrono::Utc::now().to_rfc3339(),
        };

        body["summary"] = json!({
            "score": entry.score,
            "total_questions": entry.total_questions,
        });

        if let Err(e) = db::append_log_entry(&state.pool, user_id, kind.log_column(), &entry).await
        {
            tracing::error!("Failed to log attempt for user {}: {}", user_id, e);
            body["log_error"] = json!(format!("Failed to save score: {}", e));
        }
    }

    Ok(Json(body))
}

/// Advances the active session to its next question.
pub fn next(
    state: &AppState,
    user_id: i64,
    kind: AttemptKind,
) -> Result<impl IntoResponse, AppError> {
    let mut sessions = state.sessions.lock().expect("session registry poisoned");
    let session = sessions
        .get_mut(&(user_id, kind))
        .ok_or_else(|| AppError::BadRequest("No active attempt. Start one first.".to_string()))?;

    let question = PublicQuestion::present(session.advance()?);

    Ok(Json(json!({
        "question": question,
        "answered": session.answered(),
        "target_questions": session.target(),
    })))
}
