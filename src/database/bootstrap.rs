use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::models::admin::ROLE_SUPER_ADMIN;
use crate::utils::crypto::hash_password;

/// Seeds a super admin from configuration when the `admins` table is empty.
/// Returns whether an account was created.
pub async fn ensure_default_admin(pool: &PgPool, config: &Config) -> Result<bool> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(false);
    }

    let email = config.admin_default_email.trim().to_lowercase();
    let password_hash = hash_password(&config.admin_default_password)?;
    sqlx::query(
        r#"INSERT INTO admins (email, password_hash, name, role)
           VALUES ($1, $2, $3, $4)
           ON CONFLICT (email) DO NOTHING"#,
    )
    .bind(&email)
    .bind(password_hash)
    .bind("Super Admin")
    .bind(ROLE_SUPER_ADMIN)
    .execute(pool)
    .await?;

    tracing::warn!(
        email = %email,
        "created default super admin; change its password after first login"
    );
    Ok(true)
}
