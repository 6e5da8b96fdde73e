// src/handlers/events.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    services::attendance,
    store::DynStore,
    utils::jwt::Claims,
};

pub async fn list_events(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_events().await?))
}

/// Registers the caller for an event. 409 when already registered.
pub async fn register_for_event(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let identity = claims.identity();
    store.upsert_user(identity.clone()).await?;

    let registration = attendance::register(store.as_ref(), &id, &identity).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// The caller's registrations, each with its event when it still exists.
pub async fn my_registrations(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let rows = attendance::registrations_with_events(store.as_ref(), &claims.sub).await?;
    let body: Vec<_> = rows
        .into_iter()
        .map(|(registration, event)| json!({ "registration": registration, "event": event }))
        .collect();

    Ok(Json(body))
}
