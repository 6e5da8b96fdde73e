// src/handlers/leaderboard.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{error::AppError, services::leaderboard, store::DynStore};

/// Global leaderboard, recomputed on every request.
pub async fn get_leaderboard(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    let entries = leaderboard::compute_leaderboard(store.as_ref()).await?;
    Ok(Json(entries))
}
