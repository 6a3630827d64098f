use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::application_dto::{ApplicationFilter, ApplicationListData, SubmitApplicationPayload};
use crate::dto::response::{PageRequest, Pagination};
use crate::error::{Error, Result};
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, ApplicationWithInternship,
};
use crate::models::internship::Internship;
use crate::services::internship_service::{InternshipService, UNAVAILABLE_MESSAGE};

pub const DUPLICATE_MESSAGE: &str = "You have already applied for this internship";

const SELECT_WITH_INTERNSHIP: &str = r#"
    SELECT a.*, i.title AS internship_title, i.department
    FROM internship_applications a
    JOIN internships i ON i.id = a.internship_id
"#;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    internships: InternshipService,
}

fn not_found() -> Error {
    Error::NotFound("Application not found".to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl ApplicationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            internships: InternshipService::new(pool.clone()),
            pool,
        }
    }

    /// Stores a new `pending` application against an open posting.
    ///
    /// The duplicate pre-check only short-circuits the common case; the
    /// `(email, internship_id)` unique constraint is what actually guards
    /// concurrent submissions, and its violation maps to the same conflict.
    pub async fn submit(
        &self,
        payload: SubmitApplicationPayload,
    ) -> Result<(Application, Internship)> {
        let unavailable = || Error::BadRequest(UNAVAILABLE_MESSAGE.to_string());
        let internship_id = i32::try_from(payload.internship_id).map_err(|_| unavailable())?;
        let internship = self
            .internships
            .find_open(internship_id)
            .await?
            .ok_or_else(unavailable)?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM internship_applications WHERE email = $1 AND internship_id = $2)",
        )
        .bind(&payload.email)
        .bind(internship_id)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            return Err(Error::Conflict(DUPLICATE_MESSAGE.to_string()));
        }

        let gpa = payload
            .gpa
            .map(|g| Decimal::try_from(g).map(|d| d.round_dp(2)))
            .transpose()
            .map_err(|e| Error::BadRequest(format!("Invalid GPA: {}", e)))?;

        let inserted = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO internship_applications (
                internship_id, first_name, last_name, email, phone, university,
                graduation_year, major, gpa, motivation, project_submission_url
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(internship_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.university)
        .bind(payload.graduation_year)
        .bind(&payload.major)
        .bind(gpa)
        .bind(&payload.motivation)
        .bind(&payload.project_submission_url)
        .fetch_one(&self.pool)
        .await;

        let application = match inserted {
            Ok(application) => application,
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Conflict(DUPLICATE_MESSAGE.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            application_id = application.id,
            internship_id,
            "application submitted"
        );
        Ok((application, internship))
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<ApplicationListData> {
        let (where_clause, args) = filter.where_clause();

        let count_sql = format!(
            "SELECT COUNT(*) FROM internship_applications a {}",
            where_clause
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = count_query.bind(arg);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "{} {} ORDER BY a.created_at DESC, a.id DESC LIMIT ${} OFFSET ${}",
            SELECT_WITH_INTERNSHIP,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let mut list_query = sqlx::query_as::<_, ApplicationWithInternship>(&list_sql);
        for arg in &args {
            list_query = list_query.bind(arg);
        }
        let applications = list_query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(ApplicationListData {
            applications,
            pagination: Pagination::new(page.page, page.limit, total),
        })
    }

    /// Every row matching the filter, unpaginated, in listing order.
    pub async fn list_all(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationWithInternship>> {
        let (where_clause, args) = filter.where_clause();
        let sql = format!(
            "{} {} ORDER BY a.created_at DESC, a.id DESC",
            SELECT_WITH_INTERNSHIP, where_clause
        );
        let mut query = sqlx::query_as::<_, ApplicationWithInternship>(&sql);
        for arg in &args {
            query = query.bind(arg);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn get(&self, id: i32) -> Result<ApplicationDetail> {
        sqlx::query_as::<_, ApplicationDetail>(
            r#"
            SELECT a.*, i.title AS internship_title, i.department,
                   i.description AS internship_description
            FROM internship_applications a
            JOIN internships i ON i.id = a.internship_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM internship_applications WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
    ) -> Result<ApplicationWithInternship> {
        let mut updated = self.set_status(&[id], status).await?;
        let row = updated.pop().ok_or_else(not_found)?;
        tracing::info!(application_id = id, status = %status, "application status updated");
        Ok(row)
    }

    /// Updates every listed application in one statement and returns the rows
    /// that actually changed.
    pub async fn bulk_update_status(
        &self,
        ids: &[i32],
        status: ApplicationStatus,
    ) -> Result<Vec<ApplicationWithInternship>> {
        let updated = self.set_status(ids, status).await?;
        tracing::info!(
            requested = ids.len(),
            updated = updated.len(),
            status = %status,
            "bulk status update"
        );
        Ok(updated)
    }

    async fn set_status(
        &self,
        ids: &[i32],
        status: ApplicationStatus,
    ) -> Result<Vec<ApplicationWithInternship>> {
        let rows = sqlx::query_as::<_, ApplicationWithInternship>(
            r#"
            WITH updated AS (
                UPDATE internship_applications
                SET application_status = $1, updated_at = NOW()
                WHERE id = ANY($2)
                RETURNING *
            )
            SELECT u.*, i.title AS internship_title, i.department
            FROM updated u
            JOIN internships i ON i.id = u.internship_id
            ORDER BY u.id
            "#,
        )
        .bind(status.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM internship_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        tracing::info!(application_id = id, "application deleted");
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[i32]) -> Result<u64> {
        let result = sqlx::query("DELETE FROM internship_applications WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        tracing::info!(
            requested = ids.len(),
            deleted = result.rows_affected(),
            "bulk delete"
        );
        Ok(result.rows_affected())
    }
}
