use axum::extract::{FromRequest, FromRequestParts};

use crate::error::{Error, Result};

/// `Json` whose rejections render as the standard error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Parses a numeric path id, naming the entity in the error.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::BadRequest(format!("Invalid {} ID", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("7", "application").unwrap(), 7);
        for raw in ["abc", "0", "-3", "1.5", ""] {
            let err = parse_id(raw, "note").unwrap_err();
            assert_eq!(err.to_string(), "Bad request: Invalid note ID");
        }
    }
}
