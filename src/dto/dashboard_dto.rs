use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::application::ApplicationWithInternship;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub application_status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_active_internships: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub this_week_applications: i64,
    pub this_month_applications: i64,
    pub status_breakdown: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub metrics: DashboardMetrics,
    pub recent_applications: Vec<ApplicationWithInternship>,
}
