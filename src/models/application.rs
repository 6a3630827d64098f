use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }

    /// Capitalised label used in applicant emails.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
        }
    }

    pub fn applicant_message(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Your application is pending review.",
            ApplicationStatus::Reviewed => {
                "Your application has been reviewed and is under consideration."
            }
            ApplicationStatus::Shortlisted => {
                "Congratulations! You have been shortlisted for the next round."
            }
            ApplicationStatus::Accepted => {
                "Congratulations! Your application has been accepted. We will contact you soon with next steps."
            }
            ApplicationStatus::Rejected => {
                "Thank you for your interest. Unfortunately, we are unable to proceed with your application at this time."
            }
        }
    }

    pub fn invalid_message() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
        format!("Invalid status. Must be one of: {}", names.join(", "))
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(Self::invalid_message)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i32,
    pub internship_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub graduation_year: i32,
    pub major: String,
    pub gpa: Option<Decimal>,
    pub motivation: String,
    pub project_submission_url: String,
    pub application_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Application row joined with the owning internship, as listed in the back-office.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithInternship {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub internship_title: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub internship_title: String,
    pub department: String,
    pub internship_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_five_statuses() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_lists_valid_values() {
        let err = "hired".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(
            err,
            "Invalid status. Must be one of: pending, reviewed, shortlisted, rejected, accepted"
        );
        assert!("Pending".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn every_status_has_an_applicant_message() {
        for status in ApplicationStatus::ALL {
            assert!(!status.applicant_message().is_empty());
            assert!(status.label().starts_with(|c: char| c.is_ascii_uppercase()));
        }
    }
}
