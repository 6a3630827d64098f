use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{Error, Result};
use crate::AppState;

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Rejects the request unless it carries a valid session token for an active
/// admin, who is then available to handlers as `Extension<CurrentAdmin>`.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let Some(token) = bearer_token(&req) else {
        return Err(Error::Unauthorized("No token provided".to_string()));
    };
    let admin = state.auth_service.authenticate(&token).await?;
    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}
