use sqlx::PgPool;

use crate::dto::internship_dto::{NewInternship, UpdateInternshipPayload};
use crate::error::{Error, Result};
use crate::models::internship::Internship;

pub const UNAVAILABLE_MESSAGE: &str = "Internship not found or no longer accepting applications";

#[derive(Clone)]
pub struct InternshipService {
    pool: PgPool,
}

fn not_found() -> Error {
    Error::NotFound("Internship not found".to_string())
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl InternshipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active postings whose deadline has not passed, soonest deadline first.
    pub async fn list_open(&self) -> Result<Vec<Internship>> {
        let rows = sqlx::query_as::<_, Internship>(
            r#"SELECT * FROM internships
               WHERE is_active = TRUE AND application_deadline >= CURRENT_DATE
               ORDER BY application_deadline ASC, id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_open(&self, id: i32) -> Result<Option<Internship>> {
        let row = sqlx::query_as::<_, Internship>(
            r#"SELECT * FROM internships
               WHERE id = $1 AND is_active = TRUE AND application_deadline >= CURRENT_DATE"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_open(&self, id: i32) -> Result<Internship> {
        self.find_open(id)
            .await?
            .ok_or_else(|| Error::NotFound(UNAVAILABLE_MESSAGE.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<Internship>> {
        let rows = sqlx::query_as::<_, Internship>(
            "SELECT * FROM internships ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Internship> {
        sqlx::query_as::<_, Internship>("SELECT * FROM internships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, new: NewInternship) -> Result<Internship> {
        let row = sqlx::query_as::<_, Internship>(
            r#"
            INSERT INTO internships (
                title, department, description, requirements, duration, stipend,
                location, type, application_deadline, start_date, skills_required,
                task_sheet_url, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(&new.department)
        .bind(&new.description)
        .bind(&new.requirements)
        .bind(&new.duration)
        .bind(&new.stipend)
        .bind(&new.location)
        .bind(new.internship_type.as_str())
        .bind(new.application_deadline)
        .bind(new.start_date)
        .bind(&new.skills_required)
        .bind(&new.task_sheet_url)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(internship_id = row.id, title = %row.title, "internship created");
        Ok(row)
    }

    /// Patches the posting. Omitted fields keep their stored value, except
    /// `task_sheet_url`, which is always written: an omitted url clears it.
    pub async fn update(&self, id: i32, payload: UpdateInternshipPayload) -> Result<Internship> {
        let current = self.get(id).await?;
        payload.check(&current)?;

        let row = sqlx::query_as::<_, Internship>(
            r#"
            UPDATE internships
            SET
                title = COALESCE($2, title),
                department = COALESCE($3, department),
                description = COALESCE($4, description),
                requirements = COALESCE($5, requirements),
                duration = COALESCE($6, duration),
                stipend = COALESCE($7, stipend),
                location = COALESCE($8, location),
                type = COALESCE($9, type),
                application_deadline = COALESCE($10, application_deadline),
                start_date = COALESCE($11, start_date),
                skills_required = COALESCE($12, skills_required),
                task_sheet_url = $13,
                is_active = COALESCE($14, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(blank_to_none(&payload.title))
        .bind(blank_to_none(&payload.department))
        .bind(blank_to_none(&payload.description))
        .bind(blank_to_none(&payload.requirements))
        .bind(blank_to_none(&payload.duration))
        .bind(blank_to_none(&payload.stipend))
        .bind(blank_to_none(&payload.location))
        .bind(payload.internship_type())
        .bind(payload.application_deadline)
        .bind(payload.start_date)
        .bind(blank_to_none(&payload.skills_required))
        .bind(blank_to_none(&payload.task_sheet_url))
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        tracing::info!(internship_id = id, "internship updated");
        Ok(row)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM internships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        tracing::info!(internship_id = id, "internship deleted");
        Ok(())
    }

    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<()> {
        let result =
            sqlx::query("UPDATE internships SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
