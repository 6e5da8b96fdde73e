// tests/postgres_store_tests.rs
//
// Runs against a live Postgres through DATABASE_URL. Each test is a no-op
// when the variable is unset. Ids are random so runs can share a database.

use chrono::{Duration, Utc};
use scout_backend::{
    error::AppError,
    models::{
        competition::{CompetitionStatus, EntryMode, NewCompetition, PointSchedule},
        event::{EventRegistration, EventStatus, NewEvent},
        result::{NewResult, ResultSource},
        user::{Role, UserIdentity},
    },
    services::{attendance, entry_gate, results},
    store::{PgStore, Store},
};
use sqlx::postgres::PgPoolOptions;

async fn pg_store() -> Option<PgStore> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(PgStore::new(pool))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

fn identity(id: &str) -> UserIdentity {
    UserIdentity {
        id: id.to_string(),
        name: Some("Rana".to_string()),
        email: None,
    }
}

fn new_result(competition_id: &str, user_id: &str, score: i32) -> NewResult {
    NewResult {
        competition_id: competition_id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_id.to_string(),
        user_email: None,
        score,
        total_questions: 10,
        percentage: format!("{:.1}", score as f64 * 10.0),
    }
}

async fn event(store: &PgStore, points: i32) -> String {
    store
        .create_event(NewEvent {
            title: "Spring camp".to_string(),
            description: None,
            date: Utc::now(),
            location: Some("Lakeside".to_string()),
            points,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let Some(store) = pg_store().await else {
        return;
    };
    let event_id = event(&store, 10).await;
    let user = identity(&unique("scout"));

    let registration = attendance::register(&store, &event_id, &user).await.unwrap();
    assert_eq!(registration.id, EventRegistration::key(&event_id, &user.id));

    let err = attendance::register(&store, &event_id, &user).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.list_registrations_by_event(&event_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_award_is_idempotent() {
    let Some(store) = pg_store().await else {
        return;
    };
    let event_id = event(&store, 25).await;
    let present = identity(&unique("present"));
    let absent = identity(&unique("absent"));

    attendance::register(&store, &event_id, &present).await.unwrap();
    attendance::register(&store, &event_id, &absent).await.unwrap();
    attendance::mark_attendance(&store, &EventRegistration::key(&event_id, &present.id), true)
        .await
        .unwrap();

    let first = attendance::update_event_status(&store, &event_id, EventStatus::Completed)
        .await
        .unwrap();
    assert_eq!(first, 1);
    assert_eq!(attendance::award_points(&store, &event_id).await.unwrap(), 0);

    let key = EventRegistration::key(&event_id, &present.id);
    assert!(!store.mark_points_awarded(&key).await.unwrap());
    let stored = store.get_registration(&key).await.unwrap().unwrap();
    assert!(stored.points_awarded);

    let stored_event = store.get_event(&event_id).await.unwrap().unwrap();
    assert_eq!(stored_event.status, EventStatus::Completed);
}

#[tokio::test]
async fn test_upsert_keeps_points_role_and_trophies() {
    let Some(store) = pg_store().await else {
        return;
    };
    let id = unique("scout");

    store.upsert_user(identity(&id)).await.unwrap();
    assert!(store.set_manual_points(&id, 15).await.unwrap());
    assert!(store.set_role(&id, Role::Admin).await.unwrap());
    let trophies = vec!["Gold Knot".to_string(), "Fire Starter".to_string()];
    assert!(store.set_trophies(&id, &trophies).await.unwrap());

    // A missing name keeps the stored one
    let user = store
        .upsert_user(UserIdentity {
            id: id.clone(),
            name: None,
            email: Some("rana@example.org".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(user.name.as_deref(), Some("Rana"));
    assert_eq!(user.email.as_deref(), Some("rana@example.org"));
    assert_eq!(user.manual_points, 15);
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.trophies, trophies);

    assert!(store.delete_user(&id).await.unwrap());
    assert!(store.get_user(&id).await.unwrap().is_none());
    assert!(!store.set_manual_points(&id, 1).await.unwrap());
}

#[tokio::test]
async fn test_competition_enums_round_trip() {
    let Some(store) = pg_store().await else {
        return;
    };
    let now = Utc::now();
    let created = store
        .create_competition(NewCompetition {
            title: "Map reading".to_string(),
            description: None,
            password: "Compass".to_string(),
            entry_mode: EntryMode::Unlimited,
            number_of_questions: 3,
            status: CompetitionStatus::Draft,
            points: PointSchedule::default(),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(1),
            created_by: "admin".to_string(),
        })
        .await
        .unwrap();

    assert!(
        store
            .update_competition_status(&created.id, CompetitionStatus::Active)
            .await
            .unwrap()
    );
    let loaded = store.get_competition(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded.entry_mode, EntryMode::Unlimited);
    assert_eq!(loaded.status, CompetitionStatus::Active);
    assert_eq!(loaded.password, "Compass");
    assert_eq!(loaded.point_schedule(), PointSchedule::default());

    // Unlimited mode never blocks, even with a stored result
    results::record(&store, new_result(&loaded.id, "u1", 5)).await.unwrap();
    assert!(entry_gate::enter(&store, &loaded.id, "u1", "Compass").await.is_ok());
}

#[tokio::test]
async fn test_legacy_results_fallback_and_order() {
    let Some(store) = pg_store().await else {
        return;
    };
    let competition_id = unique("legacy-competition");
    let user_id = unique("scout");

    store
        .create_result(ResultSource::Legacy, new_result(&competition_id, &user_id, 7))
        .await
        .unwrap();
    assert!(results::has_user_entered(&store, &competition_id, &user_id).await.unwrap());

    let legacy_only = results::results_for_competition(&store, &competition_id).await.unwrap();
    assert_eq!(legacy_only.len(), 1);
    assert_eq!(legacy_only[0].score, 7);

    // Current rows take over once present, oldest first
    let first = results::record(&store, new_result(&competition_id, "early", 4)).await.unwrap();
    let second = results::record(&store, new_result(&competition_id, "late", 4)).await.unwrap();
    let current = results::results_for_competition(&store, &competition_id).await.unwrap();
    let ids: Vec<&str> = current.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);

    assert_eq!(results::purge_user_results(&store, &user_id).await.unwrap(), 1);
    assert!(!results::has_user_entered(&store, &competition_id, &user_id).await.unwrap());
}
