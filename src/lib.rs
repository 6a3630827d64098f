pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    cors::cors_layer,
    rate_limit::{rate_limit_middleware, RateLimiter},
};
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    dashboard_service::DashboardService, internship_service::InternshipService,
    mailer::Mailer, note_service::NoteService, notification_service::NotificationService,
};

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub internship_service: InternshipService,
    pub application_service: ApplicationService,
    pub note_service: NoteService,
    pub auth_service: AuthService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config, mailer: Mailer) -> Self {
        let internship_service = InternshipService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let note_service = NoteService::new(pool.clone());
        let auth_service = AuthService::new(pool.clone(), config.jwt_secret.clone());
        let notification_service = NotificationService::new(pool.clone(), mailer);
        let dashboard_service = DashboardService::new(pool);

        Self {
            config: Arc::new(config),
            internship_service,
            application_service,
            note_service,
            auth_service,
            notification_service,
            dashboard_service,
        }
    }
}

/// The complete HTTP application: `/api` public routes, `/api/admin`
/// back-office routes, and the shared middleware stack.
pub fn build_app(state: AppState) -> Router {
    let api_limiter = RateLimiter::api(state.config.api_rate_limit);

    let api = Router::new()
        .merge(routes::public_routes(&state))
        .nest("/admin", routes::admin_routes(&state))
        .layer(from_fn_with_state(api_limiter, rate_limit_middleware));

    Router::new()
        .nest("/api", api)
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors_layer(state.config.frontend_url.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
