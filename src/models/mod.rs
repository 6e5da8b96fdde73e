// src/models/mod.rs

pub mod answer;
pub mod competition;
pub mod event;
pub mod leaderboard;
pub mod question;
pub mod result;
pub mod user;

use std::fmt;

/// Raised when a stored text column holds a value outside a closed set
/// (entry mode, status, role, answer letter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}
