use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    dto::application_dto::{ApplicationFilter, ApplicationListQuery},
    error::Result,
    routes::extract::ApiQuery,
    services::export_service::ExportService,
    utils::time::today,
    AppState,
};

/// CSV download of every application matching the listing filters.
pub async fn export_applications(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let filter = ApplicationFilter::from_query(&query)?;
    let rows = state.application_service.list_all(&filter).await?;
    let csv = ExportService::applications_csv(&rows);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        ExportService::filename(today())
    );
    tracing::info!(rows = rows.len(), "applications exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
