// src/services/users.rs

//! Administrative changes to user records and their point sources.

use crate::{
    error::AppError,
    models::user::{Role, User},
    services::results,
    store::Store,
};

/// Counts of rows removed alongside a reset or deletion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PurgeSummary {
    pub registrations: u64,
    pub results: u64,
    pub answers: u64,
}

async fn require_user(store: &dyn Store, user_id: &str) -> Result<User, AppError> {
    store
        .get_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}

async fn purge_point_sources(store: &dyn Store, user_id: &str) -> Result<PurgeSummary, AppError> {
    Ok(PurgeSummary {
        registrations: store.delete_registrations_for_user(user_id).await?,
        results: results::purge_user_results(store, user_id).await?,
        answers: store.delete_answers_for_user(user_id).await?,
    })
}

/// Wipes every point source of the user: registrations (and with them any
/// `points_awarded` flags), results in both collections, answers, and the
/// manual baseline.
pub async fn reset_user_points(
    store: &dyn Store,
    user_id: &str,
) -> Result<PurgeSummary, AppError> {
    require_user(store, user_id).await?;
    let summary = purge_point_sources(store, user_id).await?;
    store.set_manual_points(user_id, 0).await?;

    tracing::info!("Reset all points for user {}: {:?}", user_id, summary);
    Ok(summary)
}

/// Removes the user record and everything that referenced it.
/// An administrator cannot delete their own account.
pub async fn delete_user_data(
    store: &dyn Store,
    acting_user_id: &str,
    user_id: &str,
) -> Result<PurgeSummary, AppError> {
    if acting_user_id == user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    require_user(store, user_id).await?;
    let summary = purge_point_sources(store, user_id).await?;
    store.delete_user(user_id).await?;

    tracing::info!("Deleted user {}: {:?}", user_id, summary);
    Ok(summary)
}

pub async fn set_manual_points(
    store: &dyn Store,
    user_id: &str,
    points: i32,
) -> Result<(), AppError> {
    if !store.set_manual_points(user_id, points).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!("Manual points for user {} set to {}", user_id, points);
    Ok(())
}

pub async fn set_role(store: &dyn Store, user_id: &str, role: Role) -> Result<(), AppError> {
    if !store.set_role(user_id, role).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    tracing::info!("Role for user {} set to {}", user_id, role);
    Ok(())
}

pub async fn add_trophy(
    store: &dyn Store,
    user_id: &str,
    trophy: &str,
) -> Result<Vec<String>, AppError> {
    let user = require_user(store, user_id).await?;
    if user.trophies.iter().any(|t| t == trophy) {
        return Err(AppError::Conflict("User already has this trophy".to_string()));
    }
    let mut trophies = user.trophies;
    trophies.push(trophy.to_string());
    store.set_trophies(user_id, &trophies).await?;
    Ok(trophies)
}

pub async fn remove_trophy(
    store: &dyn Store,
    user_id: &str,
    trophy: &str,
) -> Result<Vec<String>, AppError> {
    let user = require_user(store, user_id).await?;
    let before = user.trophies.len();
    let trophies: Vec<String> = user.trophies.into_iter().filter(|t| t != trophy).collect();
    if trophies.len() == before {
        return Err(AppError::NotFound("Trophy not found".to_string()));
    }
    store.set_trophies(user_id, &trophies).await?;
    Ok(trophies)
}
