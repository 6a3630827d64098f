use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::admin::ROLE_SUPER_ADMIN;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::email_log::{EmailLogStatus, OutboxEmail};
use crate::models::internship::Internship;
use crate::services::email_templates::{render, TemplateKind, TemplateVars};
use crate::services::mailer::{MailError, Mailer};

/// Upper bound for the retry delay of a queued email, in seconds.
const MAX_BACKOFF_SECS: i64 = 3600;

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    mailer: Arc<Mailer>,
}

impl NotificationService {
    pub fn new(pool: PgPool, mailer: Mailer) -> Self {
        Self {
            pool,
            mailer: Arc::new(mailer),
        }
    }

    /// Renders and sends one templated email, recording the attempt in `email_logs`.
    pub async fn send_template(
        &self,
        kind: TemplateKind,
        recipients: &[String],
        vars: &TemplateVars,
    ) -> std::result::Result<String, MailError> {
        let email = render(kind, vars);
        let outcome = self.mailer.send(recipients, &email).await;
        self.log_attempt(&recipients.join(", "), &email.subject, &outcome)
            .await;
        outcome
    }

    async fn log_attempt(
        &self,
        recipient: &str,
        subject: &str,
        outcome: &std::result::Result<String, MailError>,
    ) {
        let (status, message_id, error) = match outcome {
            Ok(id) => (EmailLogStatus::Sent, Some(id.as_str()), None),
            Err(e) => (EmailLogStatus::Failed, None, Some(e.to_string())),
        };
        let res = sqlx::query(
            r#"INSERT INTO email_logs (recipient_email, subject, status, message_id, error_message)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(recipient)
        .bind(subject)
        .bind(status.as_str())
        .bind(message_id)
        .bind(error)
        .execute(&self.pool)
        .await;
        if let Err(e) = res {
            tracing::error!(error = ?e, recipient, "failed to record email log");
        }
    }

    /// Confirmation to the applicant plus one alert to every active super admin.
    /// Delivery problems are logged, never returned.
    pub async fn notify_application_submitted(
        &self,
        application: &Application,
        internship: &Internship,
    ) {
        let vars = submitted_vars(application, internship);
        if let Err(e) = self
            .send_template(
                TemplateKind::ApplicationSubmitted,
                &[application.email.clone()],
                &vars,
            )
            .await
        {
            tracing::warn!(error = %e, application_id = application.id, "applicant confirmation email failed");
        }

        let admins = match self.super_admin_emails().await {
            Ok(admins) => admins,
            Err(e) => {
                tracing::error!(error = ?e, "failed to load super admin recipients");
                return;
            }
        };
        if admins.is_empty() {
            return;
        }
        let vars = new_application_vars(application, internship);
        if let Err(e) = self
            .send_template(TemplateKind::NewApplicationNotification, &admins, &vars)
            .await
        {
            tracing::warn!(error = %e, application_id = application.id, "admin alert email failed");
        }
    }

    pub async fn notify_status_change(
        &self,
        application: &Application,
        internship_title: &str,
        status: ApplicationStatus,
    ) {
        let vars = status_vars(application, internship_title, status);
        if let Err(e) = self
            .send_template(
                TemplateKind::ApplicationStatusUpdate,
                &[application.email.clone()],
                &vars,
            )
            .await
        {
            tracing::warn!(error = %e, application_id = application.id, "status update email failed");
        }
    }

    async fn super_admin_emails(&self) -> Result<Vec<String>> {
        let emails = sqlx::query_scalar::<_, String>(
            "SELECT email FROM admins WHERE role = $1 AND is_active = TRUE ORDER BY id",
        )
        .bind(ROLE_SUPER_ADMIN)
        .fetch_all(&self.pool)
        .await?;
        Ok(emails)
    }

    pub async fn enqueue(
        &self,
        kind: TemplateKind,
        recipient: &str,
        vars: &TemplateVars,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO email_outbox (id, template, recipient, variables)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(recipient)
        .bind(sqlx::types::Json(vars))
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn enqueue_status_change(
        &self,
        application: &Application,
        internship_title: &str,
        status: ApplicationStatus,
    ) -> Result<Uuid> {
        let vars = status_vars(application, internship_title, status);
        self.enqueue(TemplateKind::ApplicationStatusUpdate, &application.email, &vars)
            .await
    }

    /// Claims and delivers one due outbox email. Returns `false` when nothing was due.
    pub async fn run_once(&self) -> Result<bool> {
        let claimed = sqlx::query_as::<_, OutboxEmail>(
            r#"UPDATE email_outbox
               SET attempts = attempts + 1,
                   next_attempt_at = NOW() + INTERVAL '5 minutes',
                   updated_at = NOW()
               WHERE id = (
                   SELECT id FROM email_outbox
                   WHERE status = 'pending' AND next_attempt_at <= NOW()
                   ORDER BY created_at ASC
                   FOR UPDATE SKIP LOCKED
                   LIMIT 1
               )
               RETURNING *"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(job) = claimed else { return Ok(false) };

        let kind = match job.template.parse::<TemplateKind>() {
            Ok(kind) => kind,
            Err(e) => {
                self.mark_failed(job.id, &e).await?;
                return Ok(true);
            }
        };
        let vars: TemplateVars = match serde_json::from_value(job.variables.clone()) {
            Ok(vars) => vars,
            Err(e) => {
                self.mark_failed(job.id, &format!("invalid template variables: {}", e))
                    .await?;
                return Ok(true);
            }
        };

        match self
            .send_template(kind, std::slice::from_ref(&job.recipient), &vars)
            .await
        {
            Ok(_) => {
                sqlx::query(
                    "UPDATE email_outbox SET status = 'sent', last_error = NULL, updated_at = NOW() WHERE id = $1",
                )
                .bind(job.id)
                .execute(&self.pool)
                .await?;
            }
            Err(e) if job.attempts >= job.max_attempts => {
                tracing::error!(error = %e, id = %job.id, attempts = job.attempts, "queued email permanently failed");
                self.mark_failed(job.id, &e.to_string()).await?;
            }
            Err(e) => {
                let delay = retry_delay_secs(job.attempts);
                tracing::warn!(error = %e, id = %job.id, retry_in_secs = delay, "queued email failed; will retry");
                sqlx::query(
                    r#"UPDATE email_outbox
                       SET last_error = $2,
                           next_attempt_at = NOW() + make_interval(secs => $3),
                           updated_at = NOW()
                       WHERE id = $1"#,
                )
                .bind(job.id)
                .bind(e.to_string())
                .bind(delay as f64)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(true)
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE email_outbox SET status = 'failed', last_error = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// 30s, 60s, 120s, ... capped at one hour.
pub fn retry_delay_secs(attempts: i32) -> i64 {
    let exponent = attempts.saturating_sub(1).clamp(0, 16) as u32;
    (30_i64 << exponent).min(MAX_BACKOFF_SECS)
}

fn vars<const N: usize>(pairs: [(&str, String); N]) -> TemplateVars {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

pub fn submitted_vars(application: &Application, internship: &Internship) -> TemplateVars {
    vars([
        ("applicant_name", application.full_name()),
        ("internship_title", internship.title.clone()),
        ("department", internship.department.clone()),
        ("application_id", application.id.to_string()),
    ])
}

pub fn new_application_vars(application: &Application, internship: &Internship) -> TemplateVars {
    vars([
        ("internship_title", internship.title.clone()),
        ("applicant_name", application.full_name()),
        ("applicant_email", application.email.clone()),
        ("university", application.university.clone()),
        ("major", application.major.clone()),
    ])
}

pub fn status_vars(
    application: &Application,
    internship_title: &str,
    status: ApplicationStatus,
) -> TemplateVars {
    vars([
        ("applicant_name", application.full_name()),
        ("internship_title", internship_title.to_string()),
        ("status", status.label().to_string()),
        ("message", status.applicant_message().to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn application() -> Application {
        let now = Utc::now();
        Application {
            id: 42,
            internship_id: 7,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "a@b.com".into(),
            phone: "5551234567".into(),
            university: "UCL".into(),
            graduation_year: 2030,
            major: "Maths".into(),
            gpa: None,
            motivation: "m".repeat(20),
            project_submission_url: "https://example.com".into(),
            application_status: "pending".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        assert_eq!(retry_delay_secs(1), 30);
        assert_eq!(retry_delay_secs(2), 60);
        assert_eq!(retry_delay_secs(3), 120);
        assert_eq!(retry_delay_secs(20), MAX_BACKOFF_SECS);
        assert_eq!(retry_delay_secs(0), 30);
    }

    #[test]
    fn status_email_carries_label_and_message() {
        let vars = status_vars(&application(), "Backend Intern", ApplicationStatus::Shortlisted);
        assert_eq!(vars["status"], "Shortlisted");
        assert_eq!(vars["applicant_name"], "Ada Lovelace");
        assert_eq!(
            vars["message"],
            "Congratulations! You have been shortlisted for the next round."
        );

        let email = render(TemplateKind::ApplicationStatusUpdate, &vars);
        assert_eq!(email.subject, "Update on Your Application - Backend Intern");
        assert!(email.text.contains("Current Status: Shortlisted"));
    }
}
