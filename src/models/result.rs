// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::question::AnswerOption;

/// Which of the two result collections a row lives in.
/// Only `Current` is written; `Legacy` holds results from before the v2 schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Legacy,
    Current,
}

impl ResultSource {
    pub fn collection(&self) -> &'static str {
        match self {
            ResultSource::Legacy => "competition_results",
            ResultSource::Current => "competition_results_v2",
        }
    }
}

/// Represents the 'competition_results' / 'competition_results_v2' collections.
/// One row per completed attempt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub id: String,
    pub competition_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,

    /// Count of correct answers.
    pub score: i32,
    pub total_questions: i32,

    /// `score / total * 100`, formatted to one decimal place.
    pub percentage: String,

    pub completed_at: DateTime<Utc>,
}

/// Result row before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub competition_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: String,
}

/// A result together with its positional rank inside its competition.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub result: CompetitionResult,
}

/// One presented question and the participant's selection, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub selected_answer: Option<AnswerOption>,
}

/// DTO for submitting a finished quiz.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    /// Checked again on submit, same as on entry.
    #[serde(default)]
    pub password: String,
    /// Every presented question, in presentation order.
    pub answers: Vec<SubmittedAnswer>,
}

/// Summary returned to the participant after submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub result_id: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: String,
}
