pub mod application_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod email_templates;
pub mod export_service;
pub mod internship_service;
pub mod mailer;
pub mod note_service;
pub mod notification_service;
