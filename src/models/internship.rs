use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Internship {
    pub id: i32,
    pub title: String,
    pub department: String,
    pub description: String,
    pub requirements: String,
    pub duration: String,
    pub stipend: String,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub internship_type: String,
    pub application_deadline: NaiveDate,
    pub start_date: NaiveDate,
    pub skills_required: String,
    pub task_sheet_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Internship {
    /// Open to the public: active and the deadline has not passed.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.application_deadline >= today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternshipType {
    Remote,
    Onsite,
    Hybrid,
}

impl InternshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InternshipType::Remote => "remote",
            InternshipType::Onsite => "onsite",
            InternshipType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for InternshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(InternshipType::Remote),
            "onsite" => Ok(InternshipType::Onsite),
            "hybrid" => Ok(InternshipType::Hybrid),
            _ => Err("Invalid type. Must be remote, onsite, or hybrid".to_string()),
        }
    }
}

impl fmt::Display for InternshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
