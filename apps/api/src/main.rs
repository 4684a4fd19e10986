mod config;
mod cv;
mod errors;
mod intake;
mod mailer;
mod routes;
mod scheduler;
mod sheets;
mod state;
mod storage;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cv::PdfTextExtractor;
use crate::intake::FileStore;
use crate::mailer::ResendMailer;
use crate::routes::build_router;
use crate::scheduler::FollowUpScheduler;
use crate::sheets::SheetsClient;
use crate::state::AppState;
use crate::webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake API v{}", env!("CARGO_PKG_VERSION"));

    // Local file store for uploaded résumés
    let files = FileStore::new(config.upload_dir.clone());
    files.ensure_dir().await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize Google Sheets ledger
    let sheets = SheetsClient::from_key_file(
        config.spreadsheet_id.clone(),
        &config.google_credentials_path,
    )?;
    info!("Google Sheets client initialized");

    // Downstream webhook
    let webhook = WebhookClient::new(config.webhook_url.clone(), config.candidate_email.clone());

    // Follow-up scheduler: Resend-backed dispatcher behind one ticking loop
    let mailer = Arc::new(ResendMailer::new(
        config.resend_api_key.clone(),
        config.mail_from.clone(),
    ));
    let scheduler = Arc::new(FollowUpScheduler::new(
        mailer,
        config.follow_up_poll_interval,
    ));
    scheduler.start();

    // Build app state
    let state = AppState {
        s3,
        sheets,
        webhook,
        scheduler,
        files,
        extractor: Arc::new(PdfTextExtractor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "intake-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials);
    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    aws_sdk_s3::Client::new(&loader.load().await)
}
