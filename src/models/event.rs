// src/models/event.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::ParseEnumError;

pub const DEFAULT_EVENT_POINTS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(EventStatus::Upcoming),
            "ongoing" => Ok(EventStatus::Ongoing),
            "completed" => Ok(EventStatus::Completed),
            other => Err(ParseEnumError::new("event status", other)),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'events' collection.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,

    /// Points granted per attendee once attendance is awarded.
    pub points: i32,

    #[sqlx(try_from = "String")]
    pub status: EventStatus,

    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn attendance_points(&self) -> i32 {
        if self.points > 0 {
            self.points
        } else {
            DEFAULT_EVENT_POINTS
        }
    }
}

/// Event document before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub points: i32,
}

/// Represents the 'event_registrations' collection.
/// Keyed by `{event_id}_{user_id}`, so a user registers at most once per event.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub registered_at: DateTime<Utc>,

    /// Set by an administrator; freely reversible.
    pub attended: bool,

    /// Set once points were granted. Only a full points reset clears it.
    pub points_awarded: bool,
}

impl EventRegistration {
    pub fn key(event_id: &str, user_id: &str) -> String {
        format!("{}_{}", event_id, user_id)
    }

    pub fn counts_for_points(&self) -> bool {
        self.attended && self.points_awarded
    }
}

/// DTO for creating an event.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0, max = 10000))]
    pub points: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventStatusRequest {
    pub status: EventStatus,
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub attended: bool,
}
