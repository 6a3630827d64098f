pub mod admin;
pub mod application;
pub mod email_log;
pub mod internship;
pub mod note;
