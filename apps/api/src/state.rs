use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::cv::TextExtractor;
use crate::intake::FileStore;
use crate::scheduler::FollowUpScheduler;
use crate::sheets::SheetsClient;
use crate::webhook::WebhookClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub s3: S3Client,
    pub sheets: SheetsClient,
    pub webhook: WebhookClient,
    /// Owned follow-up scheduler: constructed and started once in `main`,
    /// stoppable so tests never leak a ticking loop.
    pub scheduler: Arc<FollowUpScheduler>,
    pub files: FileStore,
    /// Pluggable résumé text extraction. Production: PDF via `pdf-extract`.
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
