// src/services/mod.rs

//! Competition scoring and points aggregation.
//!
//! Handlers stay thin; the rules for sampling, entry, recording, ranking and
//! awarding points live here so they can be tested without HTTP.

pub mod attendance;
pub mod entry_gate;
pub mod leaderboard;
pub mod ranking;
pub mod recorder;
pub mod results;
pub mod sampler;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures;
