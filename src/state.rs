// src/state.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::engine::session::{AttemptKind, AttemptSession};

/// Active attempt sessions, one per (user, kind). Starting a new attempt
/// replaces any existing one, which doubles as the restart operation.
///
/// The lock is never held across an await point; session mutation is
/// synchronous and persistence happens after the guard is dropped.
pub type SessionRegistry = Arc<Mutex<HashMap<(i64, AttemptKind), AttemptSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
