use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::utils::time::now;

#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    let body = json!({
        "success": true,
        "message": "Server is running",
        "timestamp": now().to_rfc3339(),
    });
    (StatusCode::OK, Json(body))
}
