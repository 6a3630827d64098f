use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Credentialed CORS for the configured frontend origin, or a permissive
/// policy when none is configured.
pub fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url.and_then(|url| match HeaderValue::from_str(url.trim_end_matches('/')) {
        Ok(origin) => Some(origin),
        Err(e) => {
            tracing::warn!(error = %e, url, "ignoring invalid FRONTEND_URL for CORS");
            None
        }
    });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        None => permissive_cors(),
    }
}

pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
