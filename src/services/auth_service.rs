use sqlx::PgPool;

use crate::dto::auth_dto::{LoginPayload, LoginResponse};
use crate::error::{Error, Result};
use crate::models::admin::{Admin, CurrentAdmin};
use crate::utils::crypto::{verify_against_dummy, verify_password};
use crate::utils::token::{issue_session_token, verify_session_token};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt_secret: String) -> Self {
        Self { pool, jwt_secret }
    }

    /// Unknown email, inactive account and wrong password all fail the same way,
    /// and each path runs one password verification.
    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let email = payload
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        let password = payload.password.as_deref().filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(Error::BadRequest(
                "Email and password are required".to_string(),
            ));
        };

        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE LOWER(email) = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(admin) = admin else {
            verify_against_dummy(password);
            tracing::warn!(email = %email, "login attempt for unknown admin");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let password_ok = verify_password(password, &admin.password_hash);
        if !password_ok || !admin.is_active {
            tracing::warn!(admin_id = admin.id, "rejected admin login");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let admin = sqlx::query_as::<_, Admin>(
            "UPDATE admins SET last_login = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(admin.id)
        .fetch_one(&self.pool)
        .await?;

        let token = issue_session_token(admin.id, &self.jwt_secret)?;
        tracing::info!(admin_id = admin.id, "admin logged in");
        Ok(LoginResponse {
            token,
            admin: admin.into(),
        })
    }

    /// Resolves a bearer token to the active admin it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentAdmin> {
        let claims = verify_session_token(token, &self.jwt_secret)?;
        self.find_active(claims.admin_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid token or admin not found".to_string()))
    }

    pub async fn find_active(&self, admin_id: i32) -> Result<Option<CurrentAdmin>> {
        let admin = sqlx::query_as::<_, CurrentAdmin>(
            r#"SELECT id, email, name, role, is_active, last_login, created_at, updated_at
               FROM admins WHERE id = $1 AND is_active = TRUE"#,
        )
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }
}
