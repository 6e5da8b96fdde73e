// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use super::{Store, new_id};
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

const COMPETITION_COLUMNS: &str = "id, title, description, password, entry_mode, \
    number_of_questions, status, participation_points, first_place_points, \
    second_place_points, third_place_points, start_date, end_date, created_by, \
    created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, competition_id, question, option_a, option_b, option_c, \
    option_d, correct_answer, created_at";

const RESULT_COLUMNS: &str = "id, competition_id, user_id, user_name, user_email, score, \
    total_questions, percentage, completed_at";

const ANSWER_COLUMNS: &str = "id, competition_id, user_id, question_id, selected_answer, \
    is_correct, created_at";

const EVENT_COLUMNS: &str = "id, title, description, date, location, points, status, created_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, user_name, user_email, \
    registered_at, attended, points_awarded";

const USER_COLUMNS: &str = "id, name, email, role, manual_points, trophies, age, phone, \
    scout_level, created_at, updated_at";

/// Postgres-backed store. One table per collection.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Logs a failed query with context before handing the error to `?`.
fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::InternalServerError(e.to_string())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_competition(&self, new: NewCompetition) -> Result<Competition, AppError> {
        let sql = format!(
            r#"
            INSERT INTO competitions
            (id, title, description, password, entry_mode, number_of_questions, status,
             participation_points, first_place_points, second_place_points, third_place_points,
             start_date, end_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            COMPETITION_COLUMNS
        );
        sqlx::query_as::<_, Competition>(&sql)
            .bind(new_id())
            .bind(new.title)
            .bind(new.description)
            .bind(new.password)
            .bind(new.entry_mode.as_str())
            .bind(new.number_of_questions)
            .bind(new.status.as_str())
            .bind(new.points.participation)
            .bind(new.points.first)
            .bind(new.points.second)
            .bind(new.points.third)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(new.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create competition"))
    }

    async fn get_competition(&self, id: &str) -> Result<Option<Competition>, AppError> {
        let sql = format!("SELECT {} FROM competitions WHERE id = $1", COMPETITION_COLUMNS);
        sqlx::query_as::<_, Competition>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch competition"))
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, AppError> {
        let sql = format!(
            "SELECT {} FROM competitions ORDER BY created_at DESC",
            COMPETITION_COLUMNS
        );
        sqlx::query_as::<_, Competition>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list competitions"))
    }

    async fn update_competition_status(
        &self,
        id: &str,
        status: CompetitionStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE competitions SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update competition status"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_competition(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM competitions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete competition"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_question(&self, new: NewQuestion) -> Result<CompetitionQuestion, AppError> {
        let sql = format!(
            r#"
            INSERT INTO competition_questions
            (id, competition_id, question, option_a, option_b, option_c, option_d, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );
        sqlx::query_as::<_, CompetitionQuestion>(&sql)
            .bind(new_id())
            .bind(new.competition_id)
            .bind(new.question)
            .bind(new.option_a)
            .bind(new.option_b)
            .bind(new.option_c)
            .bind(new.option_d)
            .bind(new.correct_answer.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create question"))
    }

    async fn list_questions(
        &self,
        competition_id: &str,
    ) -> Result<Vec<CompetitionQuestion>, AppError> {
        let sql = format!(
            "SELECT {} FROM competition_questions WHERE competition_id = $1 ORDER BY created_at",
            QUESTION_COLUMNS
        );
        sqlx::query_as::<_, CompetitionQuestion>(&sql)
            .bind(competition_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list questions"))
    }

    async fn delete_question(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM competition_questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete question"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_result(
        &self,
        source: ResultSource,
        new: NewResult,
    ) -> Result<CompetitionResult, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {}
            (id, competition_id, user_id, user_name, user_email, score, total_questions, percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            source.collection(),
            RESULT_COLUMNS
        );
        sqlx::query_as::<_, CompetitionResult>(&sql)
            .bind(new_id())
            .bind(new.competition_id)
            .bind(new.user_id)
            .bind(new.user_name)
            .bind(new.user_email)
            .bind(new.score)
            .bind(new.total_questions)
            .bind(new.percentage)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create result"))
    }

    async fn list_results(
        &self,
        source: ResultSource,
        competition_id: &str,
    ) -> Result<Vec<CompetitionResult>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE competition_id = $1 ORDER BY completed_at, id",
            RESULT_COLUMNS,
            source.collection()
        );
        sqlx::query_as::<_, CompetitionResult>(&sql)
            .bind(competition_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list results"))
    }

    async fn list_all_results(
        &self,
        source: ResultSource,
    ) -> Result<Vec<CompetitionResult>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY completed_at, id",
            RESULT_COLUMNS,
            source.collection()
        );
        sqlx::query_as::<_, CompetitionResult>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list all results"))
    }

    async fn has_result(
        &self,
        source: ResultSource,
        competition_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE competition_id = $1 AND user_id = $2)",
            source.collection()
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(competition_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check result existence"))
    }

    async fn delete_results_for_user(
        &self,
        source: ResultSource,
        user_id: &str,
    ) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {} WHERE user_id = $1", source.collection());
        let result = sqlx::query(&sql)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete results"))?;
        Ok(result.rows_affected())
    }

    async fn create_answer(&self, new: NewAnswer) -> Result<CompetitionAnswer, AppError> {
        let sql = format!(
            r#"
            INSERT INTO competition_answers_v2
            (id, competition_id, user_id, question_id, selected_answer, is_correct)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ANSWER_COLUMNS
        );
        sqlx::query_as::<_, CompetitionAnswer>(&sql)
            .bind(new_id())
            .bind(new.competition_id)
            .bind(new.user_id)
            .bind(new.question_id)
            .bind(new.selected_answer.map(|a| a.as_str()))
            .bind(new.is_correct)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create answer"))
    }

    async fn list_answers(
        &self,
        competition_id: &str,
        user_id: &str,
    ) -> Result<Vec<CompetitionAnswer>, AppError> {
        let sql = format!(
            "SELECT {} FROM competition_answers_v2 \
             WHERE competition_id = $1 AND user_id = $2 ORDER BY created_at",
            ANSWER_COLUMNS
        );
        sqlx::query_as::<_, CompetitionAnswer>(&sql)
            .bind(competition_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list answers"))
    }

    async fn delete_answers_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM competition_answers_v2 WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete answers"))?;
        Ok(result.rows_affected())
    }

    async fn create_event(&self, new: NewEvent) -> Result<Event, AppError> {
        let sql = format!(
            r#"
            INSERT INTO events (id, title, description, date, location, points, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(new_id())
            .bind(new.title)
            .bind(new.description)
            .bind(new.date)
            .bind(new.location)
            .bind(new.points)
            .bind(EventStatus::Upcoming.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create event"))
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, AppError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch event"))
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let sql = format!("SELECT {} FROM events ORDER BY date", EVENT_COLUMNS);
        sqlx::query_as::<_, Event>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list events"))
    }

    async fn update_event_status(&self, id: &str, status: EventStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE events SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update event status"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_registration(
        &self,
        registration: EventRegistration,
    ) -> Result<EventRegistration, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO event_registrations
            (id, event_id, user_id, user_name, user_email, registered_at, attended, points_awarded)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&registration.id)
        .bind(&registration.event_id)
        .bind(&registration.user_id)
        .bind(&registration.user_name)
        .bind(&registration.user_email)
        .bind(registration.registered_at)
        .bind(registration.attended)
        .bind(registration.points_awarded)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create registration"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Already registered for this event".to_string(),
            ));
        }
        Ok(registration)
    }

    async fn get_registration(&self, id: &str) -> Result<Option<EventRegistration>, AppError> {
        let sql = format!(
            "SELECT {} FROM event_registrations WHERE id = $1",
            REGISTRATION_COLUMNS
        );
        sqlx::query_as::<_, EventRegistration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch registration"))
    }

    async fn list_registrations_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError> {
        let sql = format!(
            "SELECT {} FROM event_registrations WHERE event_id = $1 ORDER BY registered_at DESC",
            REGISTRATION_COLUMNS
        );
        sqlx::query_as::<_, EventRegistration>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list event registrations"))
    }

    async fn list_registrations_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError> {
        let sql = format!(
            "SELECT {} FROM event_registrations WHERE user_id = $1 ORDER BY registered_at DESC",
            REGISTRATION_COLUMNS
        );
        sqlx::query_as::<_, EventRegistration>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list user registrations"))
    }

    async fn list_registrations(&self) -> Result<Vec<EventRegistration>, AppError> {
        let sql = format!("SELECT {} FROM event_registrations", REGISTRATION_COLUMNS);
        sqlx::query_as::<_, EventRegistration>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list registrations"))
    }

    async fn set_attended(&self, id: &str, attended: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE event_registrations SET attended = $1 WHERE id = $2")
            .bind(attended)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to mark attendance"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_points_awarded(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE event_registrations SET points_awarded = TRUE \
             WHERE id = $1 AND points_awarded = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark points awarded"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_registrations_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM event_registrations WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete registrations"))?;
        Ok(result.rows_affected())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))
    }

    async fn upsert_user(&self, identity: UserIdentity) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, users.name),
                email = COALESCE(EXCLUDED.email, users.email),
                updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(identity.id)
            .bind(identity.name)
            .bind(identity.email)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to upsert user"))
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                age = COALESCE($2, age),
                phone = COALESCE($3, phone),
                scout_level = COALESCE($4, scout_level),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(profile.age)
            .bind(&profile.phone)
            .bind(&profile.scout_level)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update profile"))
    }

    async fn set_manual_points(&self, id: &str, points: i32) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET manual_points = $1, updated_at = NOW() WHERE id = $2")
                .bind(points)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to set manual points"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
            .bind(role.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to set role"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_trophies(&self, id: &str, trophies: &[String]) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE users SET trophies = $1, updated_at = NOW() WHERE id = $2")
                .bind(Json(trophies.to_vec()))
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to set trophies"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}
