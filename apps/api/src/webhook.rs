//! Downstream webhook notification for processed applications.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::cv::SectionedResume;
use crate::intake::ApplicationRecord;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    cv_data: CvData<'a>,
    metadata: Metadata<'a>,
}

#[derive(Debug, Serialize)]
struct CvData<'a> {
    #[serde(flatten)]
    sections: &'a SectionedResume,
    cv_public_link: &'a str,
}

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    applicant_name: &'a str,
    email: &'a str,
    status: &'a str,
    cv_processed: bool,
    processed_timestamp: String,
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    candidate_email: String,
}

impl WebhookClient {
    pub fn new(url: String, candidate_email: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(WEBHOOK_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            url,
            candidate_email,
        }
    }

    /// POSTs the processed application downstream. Callers treat failures as
    /// non-fatal: by the time this runs the submission is already accepted.
    pub async fn notify(&self, record: &ApplicationRecord, status: &str) -> Result<()> {
        let payload = WebhookPayload {
            cv_data: CvData {
                sections: &record.cv_data,
                cv_public_link: &record.cv_link,
            },
            metadata: Metadata {
                applicant_name: &record.name,
                email: &record.email,
                status,
                cv_processed: true,
                processed_timestamp: Utc::now().to_rfc3339(),
            },
        };

        self.client
            .post(&self.url)
            .header("X-Candidate-Email", &self.candidate_email)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .context("webhook endpoint rejected notification")?;

        info!(email = %record.email, "webhook notification delivered");
        Ok(())
    }
}
