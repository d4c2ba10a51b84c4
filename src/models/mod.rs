// src/models/mod.rs

pub mod attack;
pub mod progress;
pub mod question;
pub mod user;
