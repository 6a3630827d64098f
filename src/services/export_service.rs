use chrono::{NaiveDate, SecondsFormat};

use crate::models::application::ApplicationWithInternship;

pub const CSV_HEADERS: [&str; 14] = [
    "Application ID",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "University",
    "Graduation Year",
    "Major",
    "GPA",
    "Internship Title",
    "Department",
    "Status",
    "Project URL",
    "Submitted Date",
];

pub struct ExportService;

impl ExportService {
    /// Renders applications as CSV with a fixed header row and column order.
    pub fn applications_csv(rows: &[ApplicationWithInternship]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(CSV_HEADERS.join(","));

        for row in rows {
            let a = &row.application;
            let fields = [
                a.id.to_string(),
                a.first_name.clone(),
                a.last_name.clone(),
                a.email.clone(),
                a.phone.clone(),
                a.university.clone(),
                a.graduation_year.to_string(),
                a.major.clone(),
                a.gpa.map(|g| g.to_string()).unwrap_or_default(),
                row.internship_title.clone(),
                row.department.clone(),
                a.application_status.clone(),
                a.project_submission_url.clone(),
                a.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ];
            let escaped: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
            lines.push(escaped.join(","));
        }

        let mut csv = lines.join("\r\n");
        csv.push_str("\r\n");
        csv
    }

    pub fn filename(date: NaiveDate) -> String {
        format!("applications-{}.csv", date.format("%Y-%m-%d"))
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
