use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub db_max_connections: u32,
    pub frontend_url: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub email_from: String,
    pub email_from_name: String,
    pub admin_default_email: String,
    pub admin_default_password: String,
    pub api_rate_limit: u32,
    pub application_rate_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let smtp = match env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()) {
            Some(host) => Some(SmtpConfig {
                host,
                port: get_env_parse_or("SMTP_PORT", 587)?,
                user: env::var("SMTP_USER").ok().filter(|v| !v.is_empty()),
                pass: env::var("SMTP_PASS").ok().filter(|v| !v.is_empty()),
            }),
            None => None,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:3011"),
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            db_max_connections: get_env_parse_or("DB_MAX_CONNECTIONS", 10)?,
            frontend_url: env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),
            smtp,
            email_from: get_env_or("EMAIL_FROM", "onboarding@resend.dev"),
            email_from_name: get_env_or("EMAIL_FROM_NAME", "Getfly Technologies"),
            admin_default_email: get_env_or("ADMIN_DEFAULT_EMAIL", "admin@getflytechnologies.com"),
            admin_default_password: get_env_or("ADMIN_DEFAULT_PASSWORD", "admin123"),
            api_rate_limit: get_env_parse_or("API_RATE_LIMIT", 1000)?,
            application_rate_limit: get_env_parse_or("APPLICATION_RATE_LIMIT", 3)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
