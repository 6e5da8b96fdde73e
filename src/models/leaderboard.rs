// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};

/// One row of the global leaderboard, recomputed from source records on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub user_name: String,
    pub total_points: i64,
    pub competition_points: i64,
    pub event_points: i64,
    pub manual_points: i64,
    pub competitions_participated: u32,
    pub events_attended: u32,

    /// Best positional rank over all results; `None` before any competition.
    pub best_rank: Option<usize>,

    /// 1-based position in the sorted leaderboard.
    pub rank: usize,
}
