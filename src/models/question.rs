// src/models/question.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

use super::ParseEnumError;

/// One of the four option letters of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerOption {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerOption::A),
            "B" => Ok(AnswerOption::B),
            "C" => Ok(AnswerOption::C),
            "D" => Ok(AnswerOption::D),
            other => Err(ParseEnumError::new("answer option", other)),
        }
    }
}

impl TryFrom<String> for AnswerOption {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'competition_questions' collection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CompetitionQuestion {
    pub id: String,

    /// Owning competition.
    pub competition_id: String,

    /// The text content of the question.
    pub question: String,

    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    #[sqlx(try_from = "String")]
    pub correct_answer: AnswerOption,

    pub created_at: DateTime<Utc>,
}

impl CompetitionQuestion {
    pub fn is_correct(&self, selected: Option<AnswerOption>) -> bool {
        selected == Some(self.correct_answer)
    }
}

/// Question document before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub competition_id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
}

/// DTO for sending a question to a participant (excludes the correct answer).
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl From<CompetitionQuestion> for PublicQuestion {
    fn from(q: CompetitionQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    pub correct_answer: AnswerOption,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_option_round_trips_through_text() {
        for option in [AnswerOption::A, AnswerOption::B, AnswerOption::C, AnswerOption::D] {
            assert_eq!(option.as_str().parse::<AnswerOption>().unwrap(), option);
        }
        assert!("a".parse::<AnswerOption>().is_err());
        assert!("E".parse::<AnswerOption>().is_err());
    }

    #[test]
    fn test_unanswered_is_incorrect() {
        let q = CompetitionQuestion {
            id: "q1".to_string(),
            competition_id: "c1".to_string(),
            question: "Which knot joins two ropes?".to_string(),
            option_a: "Sheet bend".to_string(),
            option_b: "Clove hitch".to_string(),
            option_c: "Bowline".to_string(),
            option_d: "Half hitch".to_string(),
            correct_answer: AnswerOption::A,
            created_at: Utc::now(),
        };
        assert!(q.is_correct(Some(AnswerOption::A)));
        assert!(!q.is_correct(Some(AnswerOption::B)));
        assert!(!q.is_correct(None));
    }
}
