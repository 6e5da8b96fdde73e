// src/services/entry_gate.rs

//! Per (user, competition) admission check.

use serde::Serialize;

use crate::{
    error::AppError,
    models::competition::{Competition, EntryMode},
    services::results,
    store::Store,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    NotEntered,
    Entered,
    Blocked,
}

/// Pure transition from `NotEntered`.
///
/// A once-mode competition with an existing result blocks regardless of the
/// password supplied. Otherwise the password must match byte for byte.
pub fn evaluate(competition: &Competition, password: &str, has_entered: bool) -> EntryState {
    if competition.entry_mode == EntryMode::Once && has_entered {
        return EntryState::Blocked;
    }
    if password.as_bytes() == competition.password.as_bytes() {
        EntryState::Entered
    } else {
        EntryState::NotEntered
    }
}

/// Loads the competition and checks that it is currently accepting entries.
/// A missing competition fails closed with `NotFound`.
pub async fn open_competition(
    store: &dyn Store,
    competition_id: &str,
) -> Result<Competition, AppError> {
    let competition = store
        .get_competition(competition_id)
        .await?
        .ok_or(AppError::NotFound("Competition not found".to_string()))?;

    if !competition.is_open() {
        return Err(AppError::BadRequest(format!(
            "Competition is {}, not active",
            competition.status
        )));
    }
    Ok(competition)
}

/// Whether the once-mode rule stops this user from another attempt.
pub async fn is_blocked(
    store: &dyn Store,
    competition: &Competition,
    user_id: &str,
) -> Result<bool, AppError> {
    if competition.entry_mode == EntryMode::Unlimited {
        return Ok(false);
    }
    results::has_user_entered(store, &competition.id, user_id).await
}

/// Runs the gate for a user supplying a password. Returns the competition on
/// success; a wrong password or a repeated once-mode entry is `Forbidden`.
/// Nothing is written either way, so a rejected user may retry immediately.
pub async fn enter(
    store: &dyn Store,
    competition_id: &str,
    user_id: &str,
    password: &str,
) -> Result<Competition, AppError> {
    let competition = open_competition(store, competition_id).await?;
    let has_entered = is_blocked(store, &competition, user_id).await?;

    match evaluate(&competition, password, has_entered) {
        EntryState::Entered => Ok(competition),
        EntryState::Blocked => {
            tracing::info!(
                "User {} blocked from re-entering competition {}",
                user_id,
                competition.id
            );
            Err(AppError::Forbidden(
                "You have already completed this competition".to_string(),
            ))
        }
        EntryState::NotEntered => Err(AppError::Forbidden(
            "Incorrect competition password".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::competition::CompetitionStatus,
        services::fixtures,
        store::MemoryStore,
    };

    #[tokio::test]
    async fn test_correct_password_enters() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        assert_eq!(evaluate(&c, "Reef-Knot", false), EntryState::Entered);
        assert!(enter(&store, &c.id, "u1", "Reef-Knot").await.is_ok());
    }

    #[tokio::test]
    async fn test_password_is_case_sensitive() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        assert_eq!(evaluate(&c, "reef-knot", false), EntryState::NotEntered);
        assert_eq!(evaluate(&c, "Reef-Knot ", false), EntryState::NotEntered);
        assert_eq!(evaluate(&c, "", false), EntryState::NotEntered);

        let err = enter(&store, &c.id, "u1", "reef-knot").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        // no lockout
        assert!(enter(&store, &c.id, "u1", "Reef-Knot").await.is_ok());
    }

    #[tokio::test]
    async fn test_once_mode_blocks_second_entry() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        results::record(&store, fixtures::new_result(&c.id, "u1", 3))
            .await
            .unwrap();

        assert_eq!(evaluate(&c, "Reef-Knot", true), EntryState::Blocked);
        let err = enter(&store, &c.id, "u1", "Reef-Knot").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // other users are unaffected
        assert!(enter(&store, &c.id, "u2", "Reef-Knot").await.is_ok());
    }

    #[tokio::test]
    async fn test_once_mode_blocks_on_legacy_result() {
        use crate::models::result::ResultSource;

        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        store
            .create_result(ResultSource::Legacy, fixtures::new_result(&c.id, "u1", 3))
            .await
            .unwrap();

        assert!(enter(&store, &c.id, "u1", "Reef-Knot").await.is_err());
    }

    #[tokio::test]
    async fn test_unlimited_mode_permits_reentry() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Unlimited).await;
        results::record(&store, fixtures::new_result(&c.id, "u1", 3))
            .await
            .unwrap();

        assert_eq!(evaluate(&c, "Reef-Knot", true), EntryState::Entered);
        assert!(enter(&store, &c.id, "u1", "Reef-Knot").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_competition_fails_closed() {
        let store = MemoryStore::new();
        let err = enter(&store, "nope", "u1", "").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inactive_competition_rejected() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Unlimited).await;
        store
            .update_competition_status(&c.id, CompetitionStatus::Finished)
            .await
            .unwrap();

        let err = enter(&store, &c.id, "u1", "Reef-Knot").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
