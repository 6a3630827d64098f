use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::json;

use crate::middleware::{
    auth::require_admin,
    rate_limit::{rate_limit_middleware, RateLimiter},
};
use crate::AppState;

pub mod application;
pub mod auth;
pub mod bulk;
pub mod dashboard;
pub mod export;
pub mod extract;
pub mod health;
pub mod internship;
pub mod notes;

/// Routes mounted directly under `/api`.
pub fn public_routes(state: &AppState) -> Router<AppState> {
    let submissions = RateLimiter::submissions(state.config.application_rate_limit);
    Router::new()
        .route("/health", get(health::health))
        .route("/internships", get(internship::list_open))
        .route("/internships/:id", get(internship::get_open))
        .route(
            "/applications",
            post(application::submit).layer(middleware::from_fn_with_state(
                submissions,
                rate_limit_middleware,
            )),
        )
}

/// Routes mounted under `/api/admin`; everything except login requires a token.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::metrics))
        .route(
            "/internships",
            get(internship::list_all).post(internship::create),
        )
        .route(
            "/internships/:id",
            get(internship::get)
                .put(internship::update)
                .delete(internship::delete),
        )
        .route("/internships/:id/status", patch(internship::toggle_status))
        .route(
            "/internships/:id/applications",
            get(internship::applications),
        )
        .route("/applications", get(application::list))
        .route("/applications/export", get(export::export_applications))
        .route("/applications/bulk/status", patch(bulk::update_status))
        .route("/applications/bulk", delete(bulk::delete))
        .route(
            "/applications/:id",
            get(application::get)
                .patch(application::update_status)
                .delete(application::delete),
        )
        .route(
            "/applications/:id/status",
            patch(application::update_status),
        )
        .route(
            "/applications/:id/notes",
            get(notes::list).post(notes::create),
        )
        .route("/notes/:id", put(notes::update).delete(notes::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected)
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}
