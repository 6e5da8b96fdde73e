// src/models/competition.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::ParseEnumError;

pub const DEFAULT_PARTICIPATION_POINTS: i32 = 20;
pub const DEFAULT_FIRST_PLACE_POINTS: i32 = 100;
pub const DEFAULT_SECOND_PLACE_POINTS: i32 = 75;
pub const DEFAULT_THIRD_PLACE_POINTS: i32 = 50;

/// How many times a user may sit a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    #[default]
    Once,
    Unlimited,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Once => "once",
            EntryMode::Unlimited => "unlimited",
        }
    }
}

impl FromStr for EntryMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(EntryMode::Once),
            "unlimited" => Ok(EntryMode::Unlimited),
            other => Err(ParseEnumError::new("entry mode", other)),
        }
    }
}

impl TryFrom<String> for EntryMode {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Administrator-driven lifecycle: draft -> active -> finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    #[default]
    Draft,
    Active,
    Finished,
}

impl CompetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionStatus::Draft => "draft",
            CompetitionStatus::Active => "active",
            CompetitionStatus::Finished => "finished",
        }
    }

    fn stage(&self) -> u8 {
        match self {
            CompetitionStatus::Draft => 0,
            CompetitionStatus::Active => 1,
            CompetitionStatus::Finished => 2,
        }
    }

    /// Status only moves forward; a finished competition stays finished.
    pub fn can_become(&self, next: CompetitionStatus) -> bool {
        next.stage() >= self.stage()
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CompetitionStatus::Draft),
            "active" => Ok(CompetitionStatus::Active),
            "finished" => Ok(CompetitionStatus::Finished),
            other => Err(ParseEnumError::new("competition status", other)),
        }
    }
}

impl TryFrom<String> for CompetitionStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'competitions' collection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Competition {
    pub id: String,
    pub title: String,
    pub description: Option<String>,

    /// Entry password, stored and compared as plaintext.
    /// Skipped during serialization so it never reaches a client.
    #[serde(skip_serializing)]
    pub password: String,

    #[sqlx(try_from = "String")]
    pub entry_mode: EntryMode,

    /// Quiz length; may be smaller than the question bank.
    pub number_of_questions: i32,

    #[sqlx(try_from = "String")]
    pub status: CompetitionStatus,

    pub participation_points: i32,
    pub first_place_points: i32,
    pub second_place_points: i32,
    pub third_place_points: i32,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Points granted for a single result, keyed by placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSchedule {
    pub participation: i32,
    pub first: i32,
    pub second: i32,
    pub third: i32,
}

impl Default for PointSchedule {
    fn default() -> Self {
        Self {
            participation: DEFAULT_PARTICIPATION_POINTS,
            first: DEFAULT_FIRST_PLACE_POINTS,
            second: DEFAULT_SECOND_PLACE_POINTS,
            third: DEFAULT_THIRD_PLACE_POINTS,
        }
    }
}

impl PointSchedule {
    /// Points earned by a result at the given 1-based positional rank.
    pub fn points_for_rank(&self, rank: usize) -> i32 {
        match rank {
            1 => self.first,
            2 => self.second,
            3 => self.third,
            _ => self.participation,
        }
    }
}

impl Competition {
    /// Stored values of zero fall back to the defaults, matching how
    /// competitions created without a schedule have always been scored.
    pub fn point_schedule(&self) -> PointSchedule {
        let defaults = PointSchedule::default();
        let or_default = |value: i32, fallback: i32| if value > 0 { value } else { fallback };
        PointSchedule {
            participation: or_default(self.participation_points, defaults.participation),
            first: or_default(self.first_place_points, defaults.first),
            second: or_default(self.second_place_points, defaults.second),
            third: or_default(self.third_place_points, defaults.third),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == CompetitionStatus::Active
    }
}

/// DTO for creating a competition.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_date_range))]
pub struct CreateCompetitionRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub entry_mode: EntryMode,
    #[validate(range(
        min = 1,
        max = 500,
        message = "Number of questions must be a positive integer"
    ))]
    pub number_of_questions: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 0))]
    pub participation_points: Option<i32>,
    #[validate(range(min = 0))]
    pub first_place_points: Option<i32>,
    #[validate(range(min = 0))]
    pub second_place_points: Option<i32>,
    #[validate(range(min = 0))]
    pub third_place_points: Option<i32>,
}

fn validate_date_range(req: &CreateCompetitionRequest) -> Result<(), ValidationError> {
    if req.end_date <= req.start_date {
        let mut err = ValidationError::new("invalid_date_range");
        err.message = Some("End date must be after start date".into());
        return Err(err);
    }
    Ok(())
}

/// Competition document before the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub title: String,
    pub description: Option<String>,
    pub password: String,
    pub entry_mode: EntryMode,
    pub number_of_questions: i32,
    pub status: CompetitionStatus,
    pub points: PointSchedule,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
}

/// DTO for an administrator status change.
#[derive(Debug, Deserialize)]
pub struct UpdateCompetitionStatusRequest {
    pub status: CompetitionStatus,
}

/// DTO carrying the competition password for entry and quiz start.
#[derive(Debug, Deserialize)]
pub struct EnterCompetitionRequest {
    #[serde(default)]
    pub password: String,
}
