// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        competition::{
            CompetitionStatus, CreateCompetitionRequest, NewCompetition, PointSchedule,
            UpdateCompetitionStatusRequest,
        },
        event::{
            CreateEventRequest, DEFAULT_EVENT_POINTS, MarkAttendanceRequest, NewEvent,
            UpdateEventStatusRequest,
        },
        question::{CreateQuestionRequest, NewQuestion},
        user::{SetManualPointsRequest, SetRoleRequest, TrophyRequest},
    },
    services::{attendance, results, users},
    store::DynStore,
    utils::{
        html::{clean_html, clean_optional},
        jwt::Claims,
    },
};

// ---- competitions ----

/// Creates a competition in `draft` status.
/// Omitted point values take the default schedule.
pub async fn create_competition(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCompetitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let title = clean_html(&payload.title);
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let defaults = PointSchedule::default();
    let new = NewCompetition {
        title,
        description: clean_optional(payload.description.as_deref()),
        password: payload.password,
        entry_mode: payload.entry_mode,
        number_of_questions: payload.number_of_questions,
        status: CompetitionStatus::Draft,
        points: PointSchedule {
            participation: payload
                .participation_points
                .unwrap_or(defaults.participation),
            first: payload.first_place_points.unwrap_or(defaults.first),
            second: payload.second_place_points.unwrap_or(defaults.second),
            third: payload.third_place_points.unwrap_or(defaults.third),
        },
        start_date: payload.start_date,
        end_date: payload.end_date,
        created_by: claims.sub,
    };

    let competition = store.create_competition(new).await?;
    tracing::info!("Competition {} created", competition.id);

    Ok((StatusCode::CREATED, Json(competition)))
}

/// Moves a competition forward through draft, active and finished.
pub async fn update_competition_status(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCompetitionStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let competition = store
        .get_competition(&id)
        .await?
        .ok_or(AppError::NotFound("Competition not found".to_string()))?;

    if !competition.status.can_become(payload.status) {
        return Err(AppError::BadRequest(format!(
            "Competition cannot go from {} to {}",
            competition.status, payload.status
        )));
    }

    if !store.update_competition_status(&id, payload.status).await? {
        return Err(AppError::NotFound("Competition not found".to_string()));
    }
    tracing::info!("Competition {} is now {}", id, payload.status);

    Ok(Json(json!({ "id": id, "status": payload.status })))
}

/// Deletes the competition record. Its results stay and are scored with the
/// default schedule from then on.
pub async fn delete_competition(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_competition(&id).await? {
        return Err(AppError::NotFound("Competition not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// All results of a competition, newest first.
pub async fn competition_results(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut rows = results::results_for_competition(store.as_ref(), &id).await?;
    rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    Ok(Json(rows))
}

// ---- questions ----

pub async fn create_question(
    State(store): State<DynStore>,
    Path(competition_id): Path<String>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let competition = store
        .get_competition(&competition_id)
        .await?
        .ok_or(AppError::NotFound("Competition not found".to_string()))?;
    if competition.status == CompetitionStatus::Finished {
        return Err(AppError::BadRequest(
            "Questions cannot be added to a finished competition".to_string(),
        ));
    }

    let question = store
        .create_question(NewQuestion {
            competition_id,
            question: clean_html(&payload.question),
            option_a: clean_html(&payload.option_a),
            option_b: clean_html(&payload.option_b),
            option_c: clean_html(&payload.option_c),
            option_d: clean_html(&payload.option_d),
            correct_answer: payload.correct_answer,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Full question bank including correct answers.
pub async fn list_questions(
    State(store): State<DynStore>,
    Path(competition_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_questions(&competition_id).await?))
}

pub async fn delete_question(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(&id).await? {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---- events ----

pub async fn create_event(
    State(store): State<DynStore>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let event = store
        .create_event(NewEvent {
            title: clean_html(&payload.title),
            description: clean_optional(payload.description.as_deref()),
            date: payload.date,
            location: clean_optional(payload.location.as_deref()),
            points: payload.points.unwrap_or(DEFAULT_EVENT_POINTS),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Moving an event to `completed` also awards attendance points.
pub async fn update_event_status(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let awarded = attendance::update_event_status(store.as_ref(), &id, payload.status).await?;
    Ok(Json(json!({ "id": id, "status": payload.status, "awarded": awarded })))
}

pub async fn award_event_points(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    store
        .get_event(&id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;

    let awarded = attendance::award_points(store.as_ref(), &id).await?;
    Ok(Json(json!({ "awarded": awarded })))
}

pub async fn event_registrations(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_registrations_by_event(&id).await?))
}

pub async fn mark_attendance(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    attendance::mark_attendance(store.as_ref(), &id, payload.attended).await?;
    Ok(StatusCode::OK)
}

// ---- users ----

pub async fn list_users(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_users().await?))
}

pub async fn set_manual_points(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<SetManualPointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    users::set_manual_points(store.as_ref(), &id, payload.manual_points).await?;
    Ok(StatusCode::OK)
}

pub async fn set_role(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    users::set_role(store.as_ref(), &id, payload.role).await?;
    Ok(StatusCode::OK)
}

pub async fn add_trophy(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<TrophyRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let trophies = users::add_trophy(store.as_ref(), &id, payload.trophy.trim()).await?;
    Ok(Json(json!({ "trophies": trophies })))
}

pub async fn remove_trophy(
    State(store): State<DynStore>,
    Path(id): Path<String>,
    Json(payload): Json<TrophyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let trophies = users::remove_trophy(store.as_ref(), &id, payload.trophy.trim()).await?;
    Ok(Json(json!({ "trophies": trophies })))
}

/// Purges the user's registrations, results and answers and zeroes manual points.
pub async fn reset_points(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = users::reset_user_points(store.as_ref(), &id).await?;
    Ok(Json(summary))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    users::delete_user_data(store.as_ref(), &claims.sub, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
