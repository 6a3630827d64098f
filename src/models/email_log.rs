use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailLogStatus {
    Sent,
    Failed,
}

impl EmailLogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailLogStatus::Sent => "sent",
            EmailLogStatus::Failed => "failed",
        }
    }
}

/// A queued notification awaiting delivery by the outbox worker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OutboxEmail {
    pub id: Uuid,
    pub template: String,
    pub recipient: String,
    pub variables: JsonValue,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
