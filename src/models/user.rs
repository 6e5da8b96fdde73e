// src/models/user.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{ParseEnumError, leaderboard::LeaderboardEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'users' collection.
/// Identity itself lives in the external identity service; this record only
/// carries what the points system needs.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,

    #[sqlx(try_from = "String")]
    pub role: Role,

    /// Administrator-adjustable point baseline. The only point source stored
    /// on the user; everything else is derived on read.
    pub manual_points: i32,

    /// Award labels, stored as a JSON array.
    #[sqlx(json)]
    pub trophies: Vec<String>,

    pub age: Option<i32>,
    pub phone: Option<String>,
    pub scout_level: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name shown on leaderboards: name, then email, then a placeholder.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.email.as_deref().filter(|e| !e.is_empty()))
            .unwrap_or("Scout")
            .to_string()
    }
}

/// Fields the identity token contributes when a user record is synced.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// DTO for a user updating their scouting metadata.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(range(min = 5, max = 120))]
    pub age: Option<i32>,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub scout_level: Option<String>,
}

/// Current user's record with their derived standing.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub standing: Option<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SetManualPointsRequest {
    pub manual_points: i32,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TrophyRequest {
    #[validate(length(min = 1, max = 100, message = "Trophy name is required"))]
    pub trophy: String,
}
