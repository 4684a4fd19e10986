//! Follow-up mail dispatch via the Resend HTTP API.
//!
//! The scheduler makes exactly one attempt per task, so this client performs
//! no retries of its own; a non-2xx response surfaces as an error for the
//! tick loop to log.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scheduler::Dispatcher;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const SUBJECT: &str = "Your Application is Under Review";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resend API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Outbound mail transport backed by Resend.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            from,
        }
    }

    fn follow_up_body(display_name: &str) -> String {
        format!(
            "<html>\n<body>\n\
             <p>Dear {display_name},</p>\n\
             <p>Thank you for submitting your application. We have received your CV \
             and it is currently under review.</p>\n\
             <p>We will get back to you soon with updates.</p>\n\
             <p>Best regards,<br>The Recruiting Team</p>\n\
             </body>\n</html>"
        )
    }
}

#[async_trait]
impl Dispatcher for ResendMailer {
    async fn send(&self, recipient: &str, display_name: &str) -> anyhow::Result<()> {
        let request_body = SendEmailRequest {
            from: &self.from,
            to: [recipient],
            subject: SUBJECT,
            html: Self::follow_up_body(display_name),
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(MailError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let sent: SendEmailResponse = response.json().await.map_err(MailError::Http)?;
        debug!(recipient, id = %sent.id, "follow-up email accepted by Resend");
        Ok(())
    }
}
