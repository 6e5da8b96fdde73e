// src/services/attendance.rs

//! Event registration, attendance marking and point awards.

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        event::{Event, EventRegistration, EventStatus},
        user::UserIdentity,
    },
    store::Store,
};

/// Registers the user for the event under the `{event}_{user}` key.
pub async fn register(
    store: &dyn Store,
    event_id: &str,
    user: &UserIdentity,
) -> Result<EventRegistration, AppError> {
    let event = store
        .get_event(event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".to_string()))?;
    if event.status == EventStatus::Completed {
        return Err(AppError::BadRequest("Event has already finished".to_string()));
    }

    let registration = EventRegistration {
        id: EventRegistration::key(&event.id, &user.id),
        event_id: event.id.clone(),
        user_id: user.id.clone(),
        user_name: user
            .name
            .clone()
            .or_else(|| user.email.clone())
            .unwrap_or_else(|| "Scout".to_string()),
        user_email: user.email.clone(),
        registered_at: Utc::now(),
        attended: false,
        points_awarded: false,
    };
    store.create_registration(registration).await
}

/// Sets or clears attendance. Reversible; does not touch `points_awarded`.
pub async fn mark_attendance(
    store: &dyn Store,
    registration_id: &str,
    attended: bool,
) -> Result<(), AppError> {
    if !store.set_attended(registration_id, attended).await? {
        return Err(AppError::NotFound("Registration not found".to_string()));
    }
    tracing::info!(
        "Registration {} attendance set to {}",
        registration_id,
        attended
    );
    Ok(())
}

/// Flips `points_awarded` on every attended registration of the event that
/// has not been awarded yet. Returns how many were flipped by this call, so a
/// repeated call returns 0.
pub async fn award_points(store: &dyn Store, event_id: &str) -> Result<usize, AppError> {
    let registrations = store.list_registrations_by_event(event_id).await?;

    let mut awarded = 0;
    for registration in registrations
        .iter()
        .filter(|r| r.attended && !r.points_awarded)
    {
        if store.mark_points_awarded(&registration.id).await? {
            awarded += 1;
        }
    }

    tracing::info!("Awarded points to {} attendees of event {}", awarded, event_id);
    Ok(awarded)
}

/// Changes the event status; moving to `completed` awards attendance points.
/// Returns the award count (0 for other transitions).
pub async fn update_event_status(
    store: &dyn Store,
    event_id: &str,
    status: EventStatus,
) -> Result<usize, AppError> {
    if !store.update_event_status(event_id, status).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    if status == EventStatus::Completed {
        return award_points(store, event_id).await;
    }
    Ok(0)
}

/// Events with the caller's registration, if any.
pub async fn registrations_with_events(
    store: &dyn Store,
    user_id: &str,
) -> Result<Vec<(EventRegistration, Option<Event>)>, AppError> {
    let mut out = Vec::new();
    for registration in store.list_registrations_by_user(user_id).await? {
        let event = store.get_event(&registration.event_id).await?;
        out.push((registration, event));
    }
    Ok(out)
}
