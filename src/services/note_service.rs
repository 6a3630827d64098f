use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::note::Note;

#[derive(Clone)]
pub struct NoteService {
    pool: PgPool,
}

fn note_not_found() -> Error {
    Error::NotFound("Note not found".to_string())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

impl NoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, application_id: i32) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT n.*, ad.name AS admin_name, ad.email AS admin_email
            FROM admin_notes n
            JOIN admins ad ON ad.id = n.admin_id
            WHERE n.application_id = $1
            ORDER BY n.created_at DESC, n.id DESC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    /// Adds a note by `admin_id`. A missing application surfaces as not found,
    /// including one deleted between the caller's check and this insert.
    pub async fn create(&self, application_id: i32, admin_id: i32, text: &str) -> Result<Note> {
        let created = sqlx::query_as::<_, Note>(
            r#"
            WITH inserted AS (
                INSERT INTO admin_notes (application_id, admin_id, note)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT n.*, ad.name AS admin_name, ad.email AS admin_email
            FROM inserted n
            JOIN admins ad ON ad.id = n.admin_id
            "#,
        )
        .bind(application_id)
        .bind(admin_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await;

        match created {
            Ok(note) => {
                tracing::info!(note_id = note.id, application_id, admin_id, "note created");
                Ok(note)
            }
            Err(e) if is_foreign_key_violation(&e) => {
                Err(Error::NotFound("Application not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Any authenticated admin may edit any note.
    pub async fn update(&self, note_id: i32, text: &str) -> Result<Note> {
        sqlx::query_as::<_, Note>(
            r#"
            WITH updated AS (
                UPDATE admin_notes SET note = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT n.*, ad.name AS admin_name, ad.email AS admin_email
            FROM updated n
            JOIN admins ad ON ad.id = n.admin_id
            "#,
        )
        .bind(note_id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(note_not_found)
    }

    pub async fn delete(&self, note_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM admin_notes WHERE id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(note_not_found());
        }
        Ok(())
    }
}
