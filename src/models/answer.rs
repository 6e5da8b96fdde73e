// src/models/answer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::question::AnswerOption;

/// Represents the 'competition_answers_v2' collection.
/// Append-only: a later attempt adds new rows rather than editing old ones.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionAnswer {
    pub id: String,
    pub competition_id: String,
    pub user_id: String,
    pub question_id: String,

    /// `None` when the question was left unanswered.
    #[sqlx(try_from = "Option<String>")]
    pub selected_answer: OptionalAnswer,

    /// Computed at write time against the question's correct answer.
    pub is_correct: bool,

    pub created_at: DateTime<Utc>,
}

/// Nullable answer column wrapper so the row can be decoded through `TryFrom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalAnswer(pub Option<AnswerOption>);

impl TryFrom<Option<String>> for OptionalAnswer {
    type Error = super::ParseEnumError;

    fn try_from(value: Option<String>) -> Result<Self, Self::Error> {
        value
            .map(AnswerOption::try_from)
            .transpose()
            .map(OptionalAnswer)
    }
}

/// Answer row before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub competition_id: String,
    pub user_id: String,
    pub question_id: String,
    pub selected_answer: Option<AnswerOption>,
    pub is_correct: bool,
}
