// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{MeResponse, UpdateProfileRequest},
    services::leaderboard,
    store::DynStore,
    utils::jwt::Claims,
};

/// Creates or refreshes the caller's user record from the token.
/// Role, points and trophies are never taken from the token.
pub async fn sync_profile(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = store.upsert_user(claims.identity()).await?;
    Ok(Json(user))
}

/// Updates the caller's scouting metadata.
pub async fn update_profile(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = store
        .update_profile(&claims.sub, &payload)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Get current user's record and leaderboard standing.
pub async fn get_me(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .get_user(&claims.sub)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;
    let standing = leaderboard::standing_for(store.as_ref(), &user.id).await?;

    Ok(Json(MeResponse { user, standing }))
}
