use sqlx::PgPool;

use crate::dto::dashboard_dto::{DashboardData, DashboardMetrics, StatusCount};
use crate::error::Result;
use crate::models::application::ApplicationWithInternship;

const RECENT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Computed fresh on every call; the rolling windows are relative to now.
    pub async fn metrics(&self) -> Result<DashboardData> {
        let (active, total, pending, week, month, breakdown, recent) = tokio::try_join!(
            self.count("SELECT COUNT(*) FROM internships WHERE is_active = TRUE"),
            self.count("SELECT COUNT(*) FROM internship_applications"),
            self.count(
                "SELECT COUNT(*) FROM internship_applications WHERE application_status = 'pending'"
            ),
            self.count(
                "SELECT COUNT(*) FROM internship_applications WHERE created_at >= NOW() - INTERVAL '7 days'"
            ),
            self.count(
                "SELECT COUNT(*) FROM internship_applications WHERE created_at >= NOW() - INTERVAL '30 days'"
            ),
            self.status_breakdown(),
            self.recent(),
        )?;

        Ok(DashboardData {
            metrics: DashboardMetrics {
                total_active_internships: active,
                total_applications: total,
                pending_applications: pending,
                this_week_applications: week,
                this_month_applications: month,
                status_breakdown: breakdown,
            },
            recent_applications: recent,
        })
    }

    async fn status_breakdown(&self) -> Result<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"SELECT application_status, COUNT(*) AS count
               FROM internship_applications
               GROUP BY application_status
               ORDER BY application_status"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn recent(&self) -> Result<Vec<ApplicationWithInternship>> {
        let rows = sqlx::query_as::<_, ApplicationWithInternship>(
            r#"
            SELECT a.*, i.title AS internship_title, i.department
            FROM internship_applications a
            JOIN internships i ON i.id = a.internship_id
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
