use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub runner_command: String,
    pub runner_timeout_ms: u64,
    pub runner_max_output: usize,
    pub comment_window_hours: i64,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_to: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/codehive.db?mode=rwc".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-change-in-production".to_string()),
            runner_command: env::var("RUNNER_COMMAND").unwrap_or_else(|_| "node".to_string()),
            runner_timeout_ms: env::var("RUNNER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            runner_max_output: env::var("RUNNER_MAX_OUTPUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024),
            comment_window_hours: env::var("COMMENT_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_string()),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_to: env::var("MAIL_TO").unwrap_or_else(|_| "contact@codehive.dev".to_string()),
        }
    }
}
