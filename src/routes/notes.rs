use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::{note_dto::NotePayload, response::ApiResponse},
    error::{Error, Result},
    models::admin::CurrentAdmin,
    routes::extract::{parse_id, ApiJson, ApiPath},
    AppState,
};

pub async fn list(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let application_id = parse_id(&id, "application")?;
    let notes = state.note_service.list(application_id).await?;
    Ok(Json(ApiResponse::data(notes)))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<impl IntoResponse> {
    let application_id = parse_id(&id, "application")?;
    let text = payload.text()?;
    if !state.application_service.exists(application_id).await? {
        return Err(Error::NotFound("Application not found".to_string()));
    }
    let note = state
        .note_service
        .create(application_id, admin.id, &text)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Note created successfully", note)),
    ))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<impl IntoResponse> {
    let note_id = parse_id(&id, "note")?;
    let text = payload.text()?;
    let note = state.note_service.update(note_id, &text).await?;
    Ok(Json(ApiResponse::with_message("Note updated successfully", note)))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let note_id = parse_id(&id, "note")?;
    state.note_service.delete(note_id).await?;
    Ok(Json(ApiResponse::message("Note deleted successfully")))
}
