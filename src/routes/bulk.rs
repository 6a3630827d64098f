use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        application_dto::{
            coerce_ids, BulkDeletePayload, BulkDeleteResult, BulkStatusPayload, BulkStatusResult,
        },
        response::ApiResponse,
    },
    error::Result,
    routes::extract::ApiJson,
    AppState,
};

/// Updates all listed applications at once. Applicant emails go through the
/// outbox so the response does not wait on delivery.
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BulkStatusPayload>,
) -> Result<impl IntoResponse> {
    let (ids, status) = payload.parse()?;

    let updated = state
        .application_service
        .bulk_update_status(&ids, status)
        .await?;

    for row in &updated {
        if let Err(e) = state
            .notification_service
            .enqueue_status_change(&row.application, &row.internship_title, status)
            .await
        {
            tracing::error!(error = ?e, application_id = row.application.id, "failed to queue status email");
        }
    }

    let count = updated.len() as u64;
    Ok(Json(ApiResponse::with_message(
        format!("Successfully updated {} application(s) to {}", count, status),
        BulkStatusResult {
            updated_count: count,
            status,
        },
    )))
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BulkDeletePayload>,
) -> Result<impl IntoResponse> {
    let ids = coerce_ids(payload.application_ids.as_deref())?;
    let deleted = state.application_service.bulk_delete(&ids).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Successfully deleted {} application(s)", deleted),
        BulkDeleteResult {
            deleted_count: deleted,
        },
    )))
}
