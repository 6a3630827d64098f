use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        application_dto::{ApplicationFilter, PageQuery},
        internship_dto::{CreateInternshipPayload, ToggleInternshipPayload, UpdateInternshipPayload},
        response::{ApiResponse, PageRequest},
    },
    error::Result,
    routes::extract::{parse_id, ApiJson, ApiPath, ApiQuery},
    AppState,
};

/// Public listing: active postings that still accept applications.
#[axum::debug_handler]
pub async fn list_open(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let internships = state.internship_service.list_open().await?;
    Ok(Json(ApiResponse::data(internships)))
}

#[axum::debug_handler]
pub async fn get_open(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    let internship = state.internship_service.get_open(id).await?;
    Ok(Json(ApiResponse::data(internship)))
}

pub async fn list_all(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let internships = state.internship_service.list_all().await?;
    Ok(Json(ApiResponse::data(internships)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    let internship = state.internship_service.get(id).await?;
    Ok(Json(ApiResponse::data(internship)))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateInternshipPayload>,
) -> Result<impl IntoResponse> {
    let new = payload.into_new()?;
    let internship = state.internship_service.create(new).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Internship created successfully",
            internship,
        )),
    ))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<UpdateInternshipPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    let internship = state.internship_service.update(id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Internship updated successfully",
        internship,
    )))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    state.internship_service.delete(id).await?;
    Ok(Json(ApiResponse::message("Internship deleted successfully")))
}

pub async fn toggle_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<ToggleInternshipPayload>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    let is_active = payload.is_active()?;
    state.internship_service.set_active(id, is_active).await?;
    let verb = if is_active { "activated" } else { "deactivated" };
    Ok(Json(ApiResponse::message(format!(
        "Internship {} successfully",
        verb
    ))))
}

/// Paginated applications of one posting, newest first.
pub async fn applications(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, "internship")?;
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let data = state
        .application_service
        .list(&ApplicationFilter::for_internship(id), page)
        .await?;
    Ok(Json(ApiResponse::data(data)))
}
