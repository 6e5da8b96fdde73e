// src/handlers/competition.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        answer::CompetitionAnswer,
        competition::{CompetitionStatus, EnterCompetitionRequest},
        question::PublicQuestion,
        result::SubmitQuizRequest,
    },
    services::{entry_gate, ranking, recorder, results, sampler},
    store::DynStore,
    utils::jwt::Claims,
};

/// Lists competitions currently open for entry.
pub async fn list_competitions(
    State(store): State<DynStore>,
) -> Result<impl IntoResponse, AppError> {
    let competitions: Vec<_> = store
        .list_competitions()
        .await?
        .into_iter()
        .filter(|c| c.is_open())
        .collect();

    Ok(Json(competitions))
}

/// Gets a single competition. Drafts are not visible publicly.
pub async fn get_competition(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let competition = store
        .get_competition(&id)
        .await?
        .filter(|c| c.status != CompetitionStatus::Draft)
        .ok_or(AppError::NotFound("Competition not found".to_string()))?;

    Ok(Json(competition))
}

/// Positional ranking of every result in the competition.
pub async fn get_ranking(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rows = results::results_for_competition(store.as_ref(), &id).await?;
    Ok(Json(ranking::rank_results(&rows)))
}

/// Password check only; nothing is written.
pub async fn enter_competition(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<EnterCompetitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let competition = entry_gate::enter(store.as_ref(), &id, &claims.sub, &payload.password).await?;

    Ok(Json(json!({
        "competition_id": competition.id,
        "state": entry_gate::EntryState::Entered,
    })))
}

/// Passes the gate and draws a fresh random sample of questions.
/// Nothing about the sample is stored; reloading draws again.
pub async fn start_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<EnterCompetitionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let competition = entry_gate::enter(store.as_ref(), &id, &claims.sub, &payload.password).await?;

    let bank = store.list_questions(&competition.id).await?;
    let count = competition.number_of_questions.max(0) as usize;
    let questions: Vec<PublicQuestion> = sampler::sample_questions(bank, count)
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    if questions.is_empty() {
        tracing::warn!("Competition {} has no questions", competition.id);
    }

    Ok(Json(json!({
        "competition_id": competition.id,
        "title": competition.title,
        "questions": questions,
    })))
}

/// Grades and records a finished quiz. The password is required again.
pub async fn submit_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    // The gate runs again here. This narrows the once-mode race but cannot
    // close it: the check and the result write are separate operations.
    let competition = entry_gate::enter(store.as_ref(), &id, &claims.sub, &payload.password).await?;

    let identity = claims.identity();
    store.upsert_user(identity.clone()).await?;

    let outcome =
        recorder::record_attempt(store.as_ref(), &competition, &identity, &payload.answers).await?;

    Ok(Json(outcome))
}

/// The caller's answers for the competition, latest attempt per question.
pub async fn my_answers(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut latest: HashMap<String, CompetitionAnswer> = HashMap::new();
    for answer in store.list_answers(&id, &claims.sub).await? {
        match latest.get(&answer.question_id) {
            Some(kept) if kept.created_at > answer.created_at => {}
            _ => {
                latest.insert(answer.question_id.clone(), answer);
            }
        }
    }

    let mut answers: Vec<CompetitionAnswer> = latest.into_values().collect();
    answers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(Json(answers))
}
