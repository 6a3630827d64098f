use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::{
        auth_dto::{LoginPayload, MeResponse},
        response::ApiResponse,
    },
    error::Result,
    models::admin::CurrentAdmin,
    routes::extract::ApiJson,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.login(payload).await?;
    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

pub async fn me(Extension(admin): Extension<CurrentAdmin>) -> Result<impl IntoResponse> {
    Ok(Json(ApiResponse::data(MeResponse { admin })))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout(Extension(admin): Extension<CurrentAdmin>) -> Result<impl IntoResponse> {
    tracing::info!(admin_id = admin.id, "admin logged out");
    Ok(Json(ApiResponse::message("Logged out successfully")))
}
