// src/services/fixtures.rs

//! Builders shared by the service unit tests.

use chrono::{Duration, TimeZone, Utc};

use crate::{
    models::{
        competition::{Competition, CompetitionStatus, EntryMode, NewCompetition, PointSchedule},
        question::{AnswerOption, CompetitionQuestion, NewQuestion},
        result::{CompetitionResult, NewResult},
    },
    store::{MemoryStore, Store},
};

pub fn new_competition(entry_mode: EntryMode) -> NewCompetition {
    let now = Utc::now();
    NewCompetition {
        title: "Knots and Lashings".to_string(),
        description: None,
        password: "Reef-Knot".to_string(),
        entry_mode,
        number_of_questions: 2,
        status: CompetitionStatus::Active,
        points: PointSchedule::default(),
        start_date: now - Duration::days(1),
        end_date: now + Duration::days(1),
        created_by: "admin".to_string(),
    }
}

pub async fn competition(store: &MemoryStore, entry_mode: EntryMode) -> Competition {
    store
        .create_competition(new_competition(entry_mode))
        .await
        .unwrap()
}

pub async fn question(
    store: &MemoryStore,
    competition_id: &str,
    correct_answer: AnswerOption,
) -> CompetitionQuestion {
    store
        .create_question(NewQuestion {
            competition_id: competition_id.to_string(),
            question: "Which knot?".to_string(),
            option_a: "Sheet bend".to_string(),
            option_b: "Clove hitch".to_string(),
            option_c: "Bowline".to_string(),
            option_d: "Half hitch".to_string(),
            correct_answer,
        })
        .await
        .unwrap()
}

pub fn new_result(competition_id: &str, user_id: &str, score: i32) -> NewResult {
    NewResult {
        competition_id: competition_id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_id.to_string(),
        user_email: None,
        score,
        total_questions: 100,
        percentage: format!("{:.1}", score as f64),
    }
}

/// A result row whose `completed_at` is `offset_secs` after a fixed base time.
pub fn result_row(
    competition_id: &str,
    user_id: &str,
    score: i32,
    offset_secs: i64,
) -> CompetitionResult {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    let new = new_result(competition_id, user_id, score);
    CompetitionResult {
        id: format!("{}-{}-{}", competition_id, user_id, offset_secs),
        competition_id: new.competition_id,
        user_id: new.user_id,
        user_name: new.user_name,
        user_email: None,
        score,
        total_questions: new.total_questions,
        percentage: new.percentage,
        completed_at: base + Duration::seconds(offset_secs),
    }
}
