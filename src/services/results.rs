// src/services/results.rs

//! Reads across the legacy and current result collections.
//!
//! Nothing outside this module should branch on `ResultSource`.

use crate::{
    error::AppError,
    models::result::{CompetitionResult, NewResult, ResultSource},
    store::Store,
};

/// Whether the user has a result for the competition in either collection.
pub async fn has_user_entered(
    store: &dyn Store,
    competition_id: &str,
    user_id: &str,
) -> Result<bool, AppError> {
    if store
        .has_result(ResultSource::Current, competition_id, user_id)
        .await?
    {
        return Ok(true);
    }
    store
        .has_result(ResultSource::Legacy, competition_id, user_id)
        .await
}

/// Results for one competition, oldest first.
///
/// The current collection wins when it has any rows for the competition;
/// otherwise the legacy collection is consulted.
pub async fn results_for_competition(
    store: &dyn Store,
    competition_id: &str,
) -> Result<Vec<CompetitionResult>, AppError> {
    let current = store
        .list_results(ResultSource::Current, competition_id)
        .await?;
    if !current.is_empty() {
        return Ok(current);
    }
    store.list_results(ResultSource::Legacy, competition_id).await
}

/// Every result in both collections, legacy rows first.
pub async fn all_results(store: &dyn Store) -> Result<Vec<CompetitionResult>, AppError> {
    let mut results = store.list_all_results(ResultSource::Legacy).await?;
    results.extend(store.list_all_results(ResultSource::Current).await?);
    Ok(results)
}

/// New results always go to the current collection.
pub async fn record(store: &dyn Store, new: NewResult) -> Result<CompetitionResult, AppError> {
    store.create_result(ResultSource::Current, new).await
}

/// Removes the user's results from both collections.
pub async fn purge_user_results(store: &dyn Store, user_id: &str) -> Result<u64, AppError> {
    let legacy = store
        .delete_results_for_user(ResultSource::Legacy, user_id)
        .await?;
    let current = store
        .delete_results_for_user(ResultSource::Current, user_id)
        .await?;
    Ok(legacy + current)
}
