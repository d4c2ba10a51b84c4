// src/engine/mod.rs

pub mod evaluator;
pub mod session;
pub mod strength;
