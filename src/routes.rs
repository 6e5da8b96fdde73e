// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, competition, events, leaderboard, profile},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public reads (competitions, rankings, leaderboard, events).
/// * Participant routes behind `auth_middleware`.
/// * Admin routes behind `auth_middleware` then `admin_middleware`.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let competition_routes = Router::new()
        .route("/", get(competition::list_competitions))
        .route("/{id}", get(competition::get_competition))
        .route("/{id}/ranking", get(competition::get_ranking))
        // Protected participant routes
        .merge(
            Router::new()
                .route("/{id}/enter", post(competition::enter_competition))
                .route("/{id}/start", post(competition::start_quiz))
                .route("/{id}/submit", post(competition::submit_quiz))
                .route("/{id}/my-answers", get(competition::my_answers))
                .layer(auth.clone()),
        );

    let event_routes = Router::new()
        .route("/", get(events::list_events))
        .merge(
            Router::new()
                .route("/{id}/register", post(events::register_for_event))
                .route("/my-registrations", get(events::my_registrations))
                .layer(auth.clone()),
        );

    let profile_routes = Router::new()
        .route("/", put(profile::update_profile))
        .route("/sync", post(profile::sync_profile))
        .route("/me", get(profile::get_me))
        .layer(auth.clone());

    let admin_routes = Router::new()
        .route("/competitions", post(admin::create_competition))
        .route("/competitions/{id}", delete(admin::delete_competition))
        .route(
            "/competitions/{id}/status",
            put(admin::update_competition_status),
        )
        .route("/competitions/{id}/results", get(admin::competition_results))
        .route(
            "/competitions/{id}/questions",
            post(admin::create_question).get(admin::list_questions),
        )
        .route("/questions/{id}", delete(admin::delete_question))
        .route("/events", post(admin::create_event))
        .route("/events/{id}/status", put(admin::update_event_status))
        .route("/events/{id}/award", post(admin::award_event_points))
        .route(
            "/events/{id}/registrations",
            get(admin::event_registrations),
        )
        .route(
            "/registrations/{id}/attendance",
            put(admin::mark_attendance),
        )
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/points", put(admin::set_manual_points))
        .route("/users/{id}/role", put(admin::set_role))
        .route(
            "/users/{id}/trophies",
            post(admin::add_trophy).delete(admin::remove_trophy),
        )
        .route("/users/{id}/reset-points", post(admin::reset_points))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth);

    Router::new()
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .nest("/api/competitions", competition_routes)
        .nest("/api/events", event_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
