// src/handlers/mod.rs

pub mod admin;
pub mod competition;
pub mod events;
pub mod leaderboard;
pub mod profile;
