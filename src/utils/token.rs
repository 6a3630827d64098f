use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SESSION_TTL_DAYS: i64 = 7;

/// Session claims; the admin id is the only identity carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub admin_id: i32,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_session_token(admin_id: i32, secret: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        admin_id,
        iat: now.timestamp(),
        exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))
}

pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_admin_id() {
        let token = issue_session_token(42, "secret").unwrap();
        let claims = verify_session_token(&token, "secret").unwrap();
        assert_eq!(claims.admin_id, 42);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token(1, "secret").unwrap();
        assert!(matches!(
            verify_session_token(&token, "other"),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let past = Utc::now() - Duration::days(1);
        let claims = Claims {
            admin_id: 1,
            iat: (past - Duration::days(SESSION_TTL_DAYS)).timestamp(),
            exp: past.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(verify_session_token(&token, "secret").is_err());
    }
}
