use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::{Validate, ValidationErrors};

use crate::dto::response::{leading_int, Pagination};
use crate::error::{Error, FieldError, Result};
use crate::models::application::{ApplicationStatus, ApplicationWithInternship};
use crate::utils::validation::{validate_graduation_year, validate_phone};

/// Public application form, as posted by the portal. Missing keys default to
/// empty values so that validation can report every absent field at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitApplicationPayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "First name is required and must be less than 100 characters"
    ))]
    pub first_name: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Last name is required and must be less than 100 characters"
    ))]
    pub last_name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "University is required and must be less than 255 characters"
    ))]
    pub university: String,
    pub graduation_year: i32,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Major is required and must be less than 255 characters"
    ))]
    pub major: String,
    #[validate(range(min = 0.0, max = 10.0, message = "GPA must be between 0.0 and 10.0"))]
    pub gpa: Option<f64>,
    #[validate(length(
        min = 20,
        max = 2000,
        message = "Motivation is required and must be between 20 and 2000 characters"
    ))]
    pub motivation: String,
    #[validate(url(
        message = "Please provide a valid project submission URL (GitHub/Google Drive)"
    ))]
    pub project_submission_url: String,
    #[validate(range(min = 1, message = "Valid internship ID is required"))]
    pub internship_id: i64,
}

impl SubmitApplicationPayload {
    /// Trims free-text fields and lowercases the email before validation.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.first_name,
            &mut self.last_name,
            &mut self.phone,
            &mut self.university,
            &mut self.major,
            &mut self.motivation,
            &mut self.project_submission_url,
        ] {
            *field = field.trim().to_string();
        }
        self.email = self.email.trim().to_lowercase();
        self
    }

    /// Validates every field and reports all failures together.
    pub fn check(&self) -> Result<()> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Err(err) = validate_graduation_year(self.graduation_year) {
            errors.add("graduation_year", err);
        }
        if errors.is_empty() {
            return Ok(());
        }
        match Error::from(errors) {
            Error::Validation(fields) => {
                let mut fields: Vec<FieldError> = fields
                    .into_iter()
                    .map(|f| FieldError::new(camel_case(&f.field), f.message))
                    .collect();
                fields.sort_by(|a, b| a.field.cmp(&b.field));
                Err(Error::Validation(fields))
            }
            other => Err(other),
        }
    }
}

/// Reports field names the way the client sent them.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationResponse {
    pub success: bool,
    pub message: String,
    pub application_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub internship_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Conjunctive filter shared by the application listing and the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub internship_id: Option<i32>,
    pub status: Option<ApplicationStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::BadRequest(format!("{} must be a date in YYYY-MM-DD format", name)))
}

impl ApplicationFilter {
    pub fn from_query(query: &ApplicationListQuery) -> Result<Self> {
        let internship_id = non_empty(&query.internship_id)
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| Error::BadRequest("Invalid internship ID".to_string()))
            })
            .transpose()?;
        let status = non_empty(&query.status)
            .map(|raw| raw.parse::<ApplicationStatus>().map_err(Error::BadRequest))
            .transpose()?;
        let date_from = non_empty(&query.date_from)
            .map(|raw| parse_date("date_from", raw))
            .transpose()?;
        let date_to = non_empty(&query.date_to)
            .map(|raw| parse_date("date_to", raw))
            .transpose()?;

        Ok(Self {
            internship_id,
            status,
            date_from,
            date_to,
            search: non_empty(&query.search).map(str::to_string),
        })
    }

    pub fn for_internship(internship_id: i32) -> Self {
        Self {
            internship_id: Some(internship_id),
            ..Self::default()
        }
    }

    /// Builds the `WHERE` clause over alias `a` plus its text arguments,
    /// numbered from `$1`.
    pub fn where_clause(&self) -> (String, Vec<String>) {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(internship_id) = self.internship_id {
            args.push(internship_id.to_string());
            filters.push(format!("a.internship_id = ${}::int", args.len()));
        }
        if let Some(status) = self.status {
            args.push(status.as_str().to_string());
            filters.push(format!("a.application_status = ${}", args.len()));
        }
        if let Some(date_from) = self.date_from {
            args.push(date_from.to_string());
            filters.push(format!("a.created_at::date >= ${}::date", args.len()));
        }
        if let Some(date_to) = self.date_to {
            args.push(date_to.to_string());
            filters.push(format!("a.created_at::date <= ${}::date", args.len()));
        }
        if let Some(search) = &self.search {
            args.push(format!("%{}%", search));
            let n = args.len();
            filters.push(format!(
                "(a.first_name ILIKE ${n} OR a.last_name ILIKE ${n} OR a.email ILIKE ${n} OR a.university ILIKE ${n})"
            ));
        }

        let clause = if filters.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };
        (clause, args)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationListData {
    pub applications: Vec<ApplicationWithInternship>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkStatusPayload {
    pub application_ids: Option<Vec<JsonValue>>,
    pub status: Option<String>,
}

impl BulkStatusPayload {
    /// The status is checked first, so a bad status is reported even when
    /// the id list is also unusable.
    pub fn parse(&self) -> Result<(Vec<i32>, ApplicationStatus)> {
        let status = parse_status(self.status.as_deref())?;
        let ids = coerce_ids(self.application_ids.as_deref())?;
        Ok((ids, status))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeletePayload {
    pub application_ids: Option<Vec<JsonValue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkStatusResult {
    pub updated_count: u64,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResult {
    pub deleted_count: u64,
}

pub fn parse_status(raw: Option<&str>) -> Result<ApplicationStatus> {
    match raw {
        None | Some("") => Err(Error::BadRequest("Status is required".to_string())),
        Some(value) => value.parse().map_err(Error::BadRequest),
    }
}

/// Coerces one id the way a lenient integer parse would: numbers are truncated,
/// strings contribute their leading digits, anything else is dropped.
fn coerce_id(value: &JsonValue) -> Option<i32> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        JsonValue::String(s) => leading_int(s).and_then(|v| i32::try_from(v).ok()),
        _ => None,
    }
}

/// Requires a non-empty id list and keeps the ids that coerce to integers.
pub fn coerce_ids(raw: Option<&[JsonValue]>) -> Result<Vec<i32>> {
    let raw = match raw {
        Some(values) if !values.is_empty() => values,
        _ => {
            return Err(Error::BadRequest(
                "application_ids must be a non-empty array".to_string(),
            ))
        }
    };
    let mut ids: Vec<i32> = raw.iter().filter_map(coerce_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Err(Error::BadRequest(
            "No valid application IDs provided".to_string(),
        ));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::current_year;
    use serde_json::json;

    fn valid_payload() -> SubmitApplicationPayload {
        SubmitApplicationPayload {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "a@b.com".into(),
            phone: "+44 20 7946 0958".into(),
            university: "University of London".into(),
            graduation_year: current_year() + 1,
            major: "Mathematics".into(),
            gpa: Some(9.1),
            motivation: "I would love to work on analytical engines.".into(),
            project_submission_url: "https://github.com/ada/engine".into(),
            internship_id: 7,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(valid_payload().check().is_ok());
    }

    #[test]
    fn every_failing_field_is_reported() {
        let payload = SubmitApplicationPayload {
            first_name: String::new(),
            email: "not-an-email".into(),
            graduation_year: current_year() - 1,
            gpa: Some(11.0),
            motivation: "too short".into(),
            project_submission_url: "nope".into(),
            internship_id: 0,
            ..valid_payload()
        };
        let err = payload.check().unwrap_err();
        let Error::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "email",
                "firstName",
                "gpa",
                "graduationYear",
                "internshipId",
                "motivation",
                "projectSubmissionUrl",
            ]
        );
    }

    #[test]
    fn empty_body_reports_every_required_field() {
        let payload: SubmitApplicationPayload = serde_json::from_value(json!({})).unwrap();
        let Err(Error::Validation(fields)) = payload.check() else {
            panic!("expected validation error");
        };
        let mut names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        names.dedup();
        assert_eq!(
            names,
            vec![
                "email",
                "firstName",
                "graduationYear",
                "internshipId",
                "lastName",
                "major",
                "motivation",
                "phone",
                "projectSubmissionUrl",
                "university",
            ]
        );
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        let payload = SubmitApplicationPayload {
            first_name: "  Ada ".into(),
            email: " A@B.COM ".into(),
            ..valid_payload()
        }
        .normalized();
        assert_eq!(payload.first_name, "Ada");
        assert_eq!(payload.email, "a@b.com");
    }

    #[test]
    fn whitespace_only_name_fails_after_normalization() {
        let payload = SubmitApplicationPayload {
            last_name: "   ".into(),
            ..valid_payload()
        }
        .normalized();
        assert!(payload.check().is_err());
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let payload: SubmitApplicationPayload = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "a@b.com",
            "phone": "5551234567",
            "university": "UCL",
            "graduationYear": 2030,
            "major": "Maths",
            "motivation": "twenty characters at least",
            "projectSubmissionUrl": "https://example.com/p",
            "internshipId": 7
        }))
        .unwrap();
        assert_eq!(payload.internship_id, 7);
        assert_eq!(payload.gpa, None);
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, args) = ApplicationFilter::default().where_clause();
        assert!(clause.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn filters_combine_with_and_in_order() {
        let query = ApplicationListQuery {
            internship_id: Some("7".into()),
            status: Some("pending".into()),
            date_from: Some("2025-01-01".into()),
            date_to: Some("2025-01-31".into()),
            search: Some("ada".into()),
            ..Default::default()
        };
        let filter = ApplicationFilter::from_query(&query).unwrap();
        let (clause, args) = filter.where_clause();
        assert_eq!(
            clause,
            "WHERE a.internship_id = $1::int AND a.application_status = $2 \
             AND a.created_at::date >= $3::date AND a.created_at::date <= $4::date \
             AND (a.first_name ILIKE $5 OR a.last_name ILIKE $5 OR a.email ILIKE $5 OR a.university ILIKE $5)"
        );
        assert_eq!(args, vec!["7", "pending", "2025-01-01", "2025-01-31", "%ada%"]);
    }

    #[test]
    fn blank_query_values_are_ignored() {
        let query = ApplicationListQuery {
            status: Some("".into()),
            search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            ApplicationFilter::from_query(&query).unwrap(),
            ApplicationFilter::default()
        );
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let bad_status = ApplicationListQuery {
            status: Some("hired".into()),
            ..Default::default()
        };
        assert!(ApplicationFilter::from_query(&bad_status).is_err());

        let bad_date = ApplicationListQuery {
            date_from: Some("01/02/2025".into()),
            ..Default::default()
        };
        assert!(ApplicationFilter::from_query(&bad_date).is_err());
    }

    #[test]
    fn status_must_be_present_and_known() {
        assert_eq!(
            parse_status(Some("shortlisted")).unwrap(),
            ApplicationStatus::Shortlisted
        );
        assert!(parse_status(None).is_err());
        assert!(parse_status(Some("hired")).is_err());
    }

    #[test]
    fn ids_are_coerced_and_invalid_ones_dropped() {
        let raw = vec![json!(3), json!("5"), json!("12abc"), json!("x"), json!(null), json!(3)];
        assert_eq!(coerce_ids(Some(&raw)).unwrap(), vec![3, 5, 12]);
    }

    #[test]
    fn ids_must_not_be_empty_or_all_invalid() {
        assert!(coerce_ids(None).is_err());
        assert!(coerce_ids(Some(&[])).is_err());
        assert!(coerce_ids(Some(&[json!("abc"), json!({})])).is_err());
    }

    #[test]
    fn bulk_status_reports_a_bad_status_before_bad_ids() {
        let payload = BulkStatusPayload {
            application_ids: Some(vec![json!("x")]),
            status: Some("hired".into()),
        };
        let err = payload.parse().unwrap_err();
        assert_eq!(err.to_string(), format!("Bad request: {}", ApplicationStatus::invalid_message()));

        let payload = BulkStatusPayload {
            application_ids: Some(vec![json!("x")]),
            status: Some("reviewed".into()),
        };
        assert_eq!(
            payload.parse().unwrap_err().to_string(),
            "Bad request: No valid application IDs provided"
        );

        let payload = BulkStatusPayload {
            application_ids: Some(vec![json!(4), json!("2")]),
            status: Some("reviewed".into()),
        };
        assert_eq!(
            payload.parse().unwrap(),
            (vec![2, 4], ApplicationStatus::Reviewed)
        );
    }

    #[test]
    fn paging_values_are_kept_raw_for_lenient_parsing() {
        let query: ApplicationListQuery =
            serde_json::from_value(json!({"page": "abc", "limit": "25"})).unwrap();
        assert_eq!(query.page.as_deref(), Some("abc"));
        assert!(ApplicationFilter::from_query(&query).is_ok());
    }
}
