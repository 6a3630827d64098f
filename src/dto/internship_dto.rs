use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, FieldError, Result};
use crate::models::internship::{Internship, InternshipType};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateInternshipPayload {
    pub title: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub internship_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub skills_required: Option<String>,
    pub task_sheet_url: Option<String>,
    pub is_active: Option<bool>,
}

/// A fully validated internship, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInternship {
    pub title: String,
    pub department: String,
    pub description: String,
    pub requirements: String,
    pub duration: String,
    pub stipend: String,
    pub location: String,
    pub internship_type: InternshipType,
    pub application_deadline: NaiveDate,
    pub start_date: NaiveDate,
    pub skills_required: String,
    pub task_sheet_url: Option<String>,
    pub is_active: bool,
}

fn required(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<String>,
) -> String {
    match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(v) => v,
        None => {
            errors.push(FieldError::new(field, format!("{} is required", field)));
            String::new()
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_window(deadline: NaiveDate, start: NaiveDate) -> Result<()> {
    if deadline > start {
        return Err(Error::Validation(vec![FieldError::new(
            "application_deadline",
            "application_deadline must not be later than start_date",
        )]));
    }
    Ok(())
}

impl CreateInternshipPayload {
    pub fn into_new(self) -> Result<NewInternship> {
        let mut errors = Vec::new();

        let title = required(&mut errors, "title", self.title);
        let department = required(&mut errors, "department", self.department);
        let description = required(&mut errors, "description", self.description);
        let requirements = required(&mut errors, "requirements", self.requirements);
        let duration = required(&mut errors, "duration", self.duration);
        let stipend = required(&mut errors, "stipend", self.stipend);
        let location = required(&mut errors, "location", self.location);
        let internship_type = match blank_to_none(self.internship_type) {
            Some(raw) => match raw.parse::<InternshipType>() {
                Ok(t) => Some(t),
                Err(msg) => {
                    errors.push(FieldError::new("type", msg));
                    None
                }
            },
            None => {
                errors.push(FieldError::new("type", "type is required"));
                None
            }
        };
        if self.application_deadline.is_none() {
            errors.push(FieldError::new(
                "application_deadline",
                "application_deadline is required",
            ));
        }
        if self.start_date.is_none() {
            errors.push(FieldError::new("start_date", "start_date is required"));
        }
        let skills_required = required(&mut errors, "skills_required", self.skills_required);

        match (internship_type, self.application_deadline, self.start_date) {
            (Some(internship_type), Some(application_deadline), Some(start_date))
                if errors.is_empty() =>
            {
                check_window(application_deadline, start_date)?;
                Ok(NewInternship {
                    title,
                    department,
                    description,
                    requirements,
                    duration,
                    stipend,
                    location,
                    internship_type,
                    application_deadline,
                    start_date,
                    skills_required,
                    task_sheet_url: blank_to_none(self.task_sheet_url),
                    is_active: self.is_active.unwrap_or(true),
                })
            }
            _ => {
                errors.sort_by(|a, b| a.field.cmp(&b.field));
                Err(Error::Validation(errors))
            }
        }
    }
}

/// Partial update. Absent fields keep their stored value, except
/// `task_sheet_url`, which is always written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateInternshipPayload {
    pub title: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub internship_type: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub skills_required: Option<String>,
    pub task_sheet_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateInternshipPayload {
    /// Validates the patch against the stored posting it will be merged into.
    pub fn check(&self, current: &Internship) -> Result<()> {
        if let Some(raw) = self.internship_type() {
            raw.parse::<InternshipType>().map_err(Error::BadRequest)?;
        }
        check_window(
            self.application_deadline.unwrap_or(current.application_deadline),
            self.start_date.unwrap_or(current.start_date),
        )
    }

    pub fn internship_type(&self) -> Option<&str> {
        self.internship_type.as_deref().filter(|t| !t.is_empty())
    }
}

/// `is_active` is kept as raw JSON so that only a real boolean is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleInternshipPayload {
    #[serde(default)]
    pub is_active: JsonValue,
}

impl ToggleInternshipPayload {
    pub fn is_active(&self) -> Result<bool> {
        self.is_active
            .as_bool()
            .ok_or_else(|| Error::BadRequest("is_active must be a boolean".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> JsonValue {
        json!({
            "title": "Backend Intern",
            "department": "Engineering",
            "description": "Build APIs",
            "requirements": "Rust",
            "duration": "3 months",
            "stipend": "10000",
            "location": "Remote",
            "type": "remote",
            "application_deadline": "2099-01-01",
            "start_date": "2099-02-01",
            "skills_required": "Rust, SQL"
        })
    }

    #[test]
    fn complete_payload_defaults_to_active() {
        let payload: CreateInternshipPayload = serde_json::from_value(full()).unwrap();
        let new = payload.into_new().unwrap();
        assert!(new.is_active);
        assert_eq!(new.internship_type, InternshipType::Remote);
        assert_eq!(new.task_sheet_url, None);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let payload: CreateInternshipPayload =
            serde_json::from_value(json!({ "title": "Only a title", "stipend": "  " })).unwrap();
        let Err(Error::Validation(errors)) = payload.into_new() else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "application_deadline",
                "department",
                "description",
                "duration",
                "location",
                "requirements",
                "skills_required",
                "start_date",
                "stipend",
                "type",
            ]
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut body = full();
        body["type"] = json!("office");
        let payload: CreateInternshipPayload = serde_json::from_value(body).unwrap();
        assert!(matches!(payload.into_new(), Err(Error::Validation(_))));
    }

    #[test]
    fn deadline_after_start_is_rejected() {
        let mut body = full();
        body["application_deadline"] = json!("2099-03-01");
        let payload: CreateInternshipPayload = serde_json::from_value(body).unwrap();
        assert!(payload.into_new().is_err());
    }

    fn stored() -> Internship {
        let now = chrono::Utc::now();
        Internship {
            id: 1,
            title: "Backend Intern".into(),
            department: "Engineering".into(),
            description: "Build APIs".into(),
            requirements: "Rust".into(),
            duration: "3 months".into(),
            stipend: "10000".into(),
            location: "Remote".into(),
            internship_type: "remote".into(),
            application_deadline: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2099, 2, 1).unwrap(),
            skills_required: "Rust".into(),
            task_sheet_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_checks_type_and_window() {
        let current = stored();
        let ok = UpdateInternshipPayload {
            internship_type: Some("hybrid".into()),
            ..Default::default()
        };
        assert!(ok.check(&current).is_ok());

        let bad_type = UpdateInternshipPayload {
            internship_type: Some("office".into()),
            ..Default::default()
        };
        assert!(bad_type.check(&current).is_err());

        let bad_window = UpdateInternshipPayload {
            application_deadline: NaiveDate::from_ymd_opt(2099, 3, 1),
            start_date: NaiveDate::from_ymd_opt(2099, 2, 1),
            ..Default::default()
        };
        assert!(bad_window.check(&current).is_err());

        // Only the deadline moves, past the stored start date.
        let late_deadline = UpdateInternshipPayload {
            application_deadline: NaiveDate::from_ymd_opt(2099, 2, 15),
            ..Default::default()
        };
        assert!(late_deadline.check(&current).is_err());
    }

    #[test]
    fn toggle_requires_a_real_boolean() {
        let on: ToggleInternshipPayload = serde_json::from_value(json!({"is_active": true})).unwrap();
        assert!(on.is_active().unwrap());

        for body in [json!({"is_active": "true"}), json!({"is_active": 1}), json!({})] {
            let payload: ToggleInternshipPayload = serde_json::from_value(body).unwrap();
            assert!(payload.is_active().is_err());
        }
    }
}
