// src/store/mod.rs

//! Document-store access for every collection the points system reads or writes.
//!
//! Each method is a single-document operation. Nothing here spans documents
//! atomically; callers that write several rows (answers plus a result) accept
//! that a failure part-way leaves the earlier rows in place.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        answer::{CompetitionAnswer, NewAnswer},
        competition::{Competition, CompetitionStatus, NewCompetition},
        event::{Event, EventRegistration, EventStatus, NewEvent},
        question::{CompetitionQuestion, NewQuestion},
        result::{CompetitionResult, NewResult, ResultSource},
        user::{Role, UpdateProfileRequest, User, UserIdentity},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle used as axum state.
pub type DynStore = Arc<dyn Store>;

#[async_trait]
pub trait Store: Send + Sync {
    // competitions
    async fn create_competition(&self, new: NewCompetition) -> Result<Competition, AppError>;
    async fn get_competition(&self, id: &str) -> Result<Option<Competition>, AppError>;
    /// Newest first.
    async fn list_competitions(&self) -> Result<Vec<Competition>, AppError>;
    async fn update_competition_status(
        &self,
        id: &str,
        status: CompetitionStatus,
    ) -> Result<bool, AppError>;
    async fn delete_competition(&self, id: &str) -> Result<bool, AppError>;

    // competition_questions
    async fn create_question(&self, new: NewQuestion) -> Result<CompetitionQuestion, AppError>;
    /// Oldest first.
    async fn list_questions(&self, competition_id: &str)
    -> Result<Vec<CompetitionQuestion>, AppError>;
    async fn delete_question(&self, id: &str) -> Result<bool, AppError>;

    // competition_results / competition_results_v2
    async fn create_result(
        &self,
        source: ResultSource,
        new: NewResult,
    ) -> Result<CompetitionResult, AppError>;
    /// Ordered by completion time, oldest first.
    async fn list_results(
        &self,
        source: ResultSource,
        competition_id: &str,
    ) -> Result<Vec<CompetitionResult>, AppError>;
    /// Ordered by completion time, oldest first.
    async fn list_all_results(&self, source: ResultSource)
    -> Result<Vec<CompetitionResult>, AppError>;
    async fn has_result(
        &self,
        source: ResultSource,
        competition_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError>;
    async fn delete_results_for_user(
        &self,
        source: ResultSource,
        user_id: &str,
    ) -> Result<u64, AppError>;

    // competition_answers_v2
    async fn create_answer(&self, new: NewAnswer) -> Result<CompetitionAnswer, AppError>;
    async fn list_answers(
        &self,
        competition_id: &str,
        user_id: &str,
    ) -> Result<Vec<CompetitionAnswer>, AppError>;
    async fn delete_answers_for_user(&self, user_id: &str) -> Result<u64, AppError>;

    // events
    async fn create_event(&self, new: NewEvent) -> Result<Event, AppError>;
    async fn get_event(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Ordered by event date.
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;
    async fn update_event_status(&self, id: &str, status: EventStatus) -> Result<bool, AppError>;

    // event_registrations
    /// Fails with `Conflict` when the `{event}_{user}` key already exists.
    async fn create_registration(
        &self,
        registration: EventRegistration,
    ) -> Result<EventRegistration, AppError>;
    async fn get_registration(&self, id: &str) -> Result<Option<EventRegistration>, AppError>;
    /// Newest registration first.
    async fn list_registrations_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError>;
    /// Newest registration first.
    async fn list_registrations_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError>;
    async fn list_registrations(&self) -> Result<Vec<EventRegistration>, AppError>;
    async fn set_attended(&self, id: &str, attended: bool) -> Result<bool, AppError>;
    /// Flips `points_awarded` to true only if it is currently false.
    /// Returns whether this call performed the flip.
    async fn mark_points_awarded(&self, id: &str) -> Result<bool, AppError>;
    async fn delete_registrations_for_user(&self, user_id: &str) -> Result<u64, AppError>;

    // users
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    /// Inserts the user or refreshes name/email, keeping role, points and trophies.
    async fn upsert_user(&self, identity: UserIdentity) -> Result<User, AppError>;
    async fn update_profile(
        &self,
        id: &str,
        profile: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError>;
    async fn set_manual_points(&self, id: &str, points: i32) -> Result<bool, AppError>;
    async fn set_role(&self, id: &str, role: Role) -> Result<bool, AppError>;
    async fn set_trophies(&self, id: &str, trophies: &[String]) -> Result<bool, AppError>;
    async fn delete_user(&self, id: &str) -> Result<bool, AppError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
