use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub s3_bucket: String,
    /// Endpoint override for MinIO in local development; unset means AWS.
    pub s3_endpoint: Option<String>,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub resend_api_key: String,
    pub mail_from: String,
    pub webhook_url: String,
    pub candidate_email: String,
    pub spreadsheet_id: String,
    pub google_credentials_path: PathBuf,
    pub upload_dir: PathBuf,
    pub follow_up_poll_interval: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            s3_bucket: require_env("S3_BUCKET_NAME")?,
            s3_endpoint: std::env::var("S3_ENDPOINT").ok(),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            resend_api_key: require_env("RESEND_API_KEY")?,
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Recruiting Team <no-reply@yourdomain.com>".to_string()),
            webhook_url: require_env("WEBHOOK_URL")?,
            candidate_email: require_env("CANDIDATE_EMAIL")?,
            spreadsheet_id: require_env("SPREADSHEET_ID")?,
            google_credentials_path: std::env::var("GOOGLE_CREDENTIALS_PATH")
                .unwrap_or_else(|_| "google-credentials.json".to_string())
                .into(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "/tmp/uploads".to_string())
                .into(),
            follow_up_poll_interval: Duration::from_secs(
                std::env::var("FOLLOW_UP_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("FOLLOW_UP_POLL_INTERVAL_SECS must be a number of seconds")?,
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
