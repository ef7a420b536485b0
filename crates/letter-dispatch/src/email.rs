//! Confirmation email sender.
//!
//! Posts the email envelope to the notification sender API, which forwards
//! it onto the messaging pipeline.

use chrono::Utc;
use rand::Rng;
use request_orchestrator::DispatchError;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

/// Default request timeout.
const TIMEOUT_SECS: u64 = 30;

/// Application id stamped on every confirmation email.
const RECEIVED_APP_ID: &str = "emergency-auth-code-service.emergency_auth_code_request_received";
/// Message type understood by the notification sender.
const RECEIVED_MESSAGE_TYPE: &str = "emergency_auth_code_request_received";
/// Filing description rendered into the email body.
const FILING_DESCRIPTION: &str = "Emergency Auth Code Request";
/// Subject line of the confirmation email.
const SUBJECT: &str = "Confirmation of your company authentication code request";
/// Domain used in generated message ids.
const MESSAGE_ID_DOMAIN: &str = "registry-service.dev";

/// Body fields rendered into the email template.
#[derive(Debug, Serialize)]
struct DataField {
    filing_description: String,
    to: String,
    subject: String,
    portal_url: String,
}

/// The envelope posted to the notification sender.
#[derive(Debug, Serialize)]
struct EmailSend {
    app_id: String,
    message_id: String,
    message_type: String,
    /// JSON-encoded [`DataField`].
    data: String,
    email_address: String,
    created_at: String,
}

/// Client for the notification sender's email endpoint.
#[derive(Clone, Debug)]
pub struct EmailClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    portal_url: String,
}

impl EmailClient {
    /// Create a new client for the sender at `base_url`.
    ///
    /// `portal_url` is rendered into the email so the recipient can follow
    /// their request.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        portal_url: impl Into<String>,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            portal_url: portal_url.into(),
        }
    }

    /// Send the confirmation email for a submitted request.
    pub async fn send_confirmation(&self, recipient: &str) -> Result<(), DispatchError> {
        let data = DataField {
            filing_description: FILING_DESCRIPTION.to_string(),
            to: recipient.to_string(),
            subject: SUBJECT.to_string(),
            portal_url: self.portal_url.clone(),
        };
        let data = serde_json::to_string(&data)
            .map_err(|e| DispatchError::Encoding(e.to_string()))?;

        let envelope = EmailSend {
            app_id: RECEIVED_APP_ID.to_string(),
            message_id: generate_message_id(recipient),
            message_type: RECEIVED_MESSAGE_TYPE.to_string(),
            data,
            email_address: recipient.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let url = format!("{}/send-email", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.api_key, Some(""))
            .json(&envelope)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "unexpected status from email sender");
            return Err(DispatchError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }
}

/// Unique-enough message id for the mail pipeline.
fn generate_message_id(recipient: &str) -> String {
    let nonce: u32 = rand::thread_rng().gen_range(0..100_000);
    format!("<emergency-auth-code-request.{recipient}.{nonce}@{MESSAGE_ID_DOMAIN}>")
}
