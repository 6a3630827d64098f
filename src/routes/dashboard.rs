use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::response::ApiResponse, error::Result, AppState};

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let data = state.dashboard_service.metrics().await?;
    Ok(Json(ApiResponse::data(data)))
}
