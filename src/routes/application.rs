use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        application_dto::{
            parse_status, ApplicationFilter, ApplicationListQuery, SubmitApplicationPayload,
            SubmitApplicationResponse, UpdateStatusPayload,
        },
        response::{ApiResponse, PageRequest},
    },
    error::Result,
    models::application::ApplicationStatus,
    routes::extract::{parse_id, ApiJson, ApiPath, ApiQuery},
    AppState,
};

/// Public submission. Confirmation and admin alert emails are sent before
/// responding, but their failure never fails the request.
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    let payload = payload.normalized();
    payload.check()?;

    let (application, internship) = state.application_service.submit(payload).await?;
    state
        .notification_service
        .notify_application_submitted(&application, &internship)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(SubmitApplicationResponse {
            success: true,
            message: "Application submitted successfully".to_string(),
            application_id: application.id,
        }),
    ))
}

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let filter = ApplicationFilter::from_query(&query)?;
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let data = state.application_service.list(&filter, page).await?;
    Ok(Json(ApiResponse::data(data)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "application")?;
    let application = state.application_service.get(id).await?;
    Ok(Json(ApiResponse::data(application)))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "application")?;
    let status: ApplicationStatus = parse_status(payload.status.as_deref())?;

    let updated = state.application_service.update_status(id, status).await?;
    state
        .notification_service
        .notify_status_change(&updated.application, &updated.internship_title, status)
        .await;

    Ok(Json(ApiResponse::message(
        "Application status updated successfully",
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "application")?;
    state.application_service.delete(id).await?;
    Ok(Json(ApiResponse::message("Application deleted successfully")))
}
