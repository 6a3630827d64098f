use serde::{Deserialize, Serialize};

use crate::models::admin::{Admin, CurrentAdmin};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<Admin> for AdminSummary {
    fn from(value: Admin) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            role: value.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub admin: CurrentAdmin,
}
