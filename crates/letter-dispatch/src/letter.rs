//! Letter/queue API client.

use request_orchestrator::{DispatchError, LetterInstruction, ResidentialAddress};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Default request timeout.
const TIMEOUT_SECS: u64 = 30;

/// Item type understood by the letter processing backend.
const ITEM_TYPE_AUTHCODE_PUT: &str = "authcode_put";

/// The letter item posted to the letter/queue API.
#[derive(Debug, Clone, Serialize)]
pub struct LetterItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub email: String,
    pub company_number: String,
    /// Addressee line printed on the envelope by the letter backend.
    pub company_name: String,
    pub ro_address: AddressItem,
    pub status: String,
}

/// Postal address for the letter.
///
/// `premises` is not carried: upstream duplicates it into `address_line_1`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub po_box: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address_line_1: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address_line_2: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub locality: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
}

impl From<&ResidentialAddress> for AddressItem {
    fn from(address: &ResidentialAddress) -> Self {
        Self {
            po_box: address.po_box.clone(),
            address_line_1: address.address_line_1.clone(),
            address_line_2: address.address_line_2.clone(),
            locality: address.locality.clone(),
            region: address.region.clone(),
            postal_code: address.postcode.clone(),
            country: address.country.clone(),
        }
    }
}

impl LetterItem {
    /// Build the wire item for a letter instruction.
    pub fn from_instruction(instruction: &LetterInstruction) -> Self {
        Self {
            item_type: ITEM_TYPE_AUTHCODE_PUT.to_string(),
            email: instruction.email.clone(),
            company_number: instruction.company_number.clone(),
            company_name: instruction.addressee.clone(),
            ro_address: AddressItem::from(&instruction.address),
            status: instruction.letter_type.as_str().to_string(),
        }
    }
}

/// Client for the letter/queue API.
#[derive(Clone, Debug)]
pub struct LetterApiClient {
    http_client: reqwest::Client,
    base_url: String,
    path: String,
}

impl LetterApiClient {
    /// Create a new client posting to `base_url` + `path`.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http_client,
            base_url: base_url.into(),
            path: path.into(),
        }
    }

    /// Send a letter item.
    ///
    /// The request id travels as `X-Request-Id` so the backend can
    /// de-duplicate retried sends.
    pub async fn send_letter_item(
        &self,
        item: &LetterItem,
        request_id: &str,
    ) -> Result<(), DispatchError> {
        let url = format!("{}{}", self.base_url, self.path);

        let response = self
            .http_client
            .post(&url)
            .header("X-Request-Id", request_id)
            .json(item)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                company_number = %item.company_number,
                "unexpected status from letter API"
            );
            return Err(DispatchError::UnexpectedStatus(status.as_u16()));
        }

        info!(
            company_number = %item.company_number,
            letter_type = %item.status,
            "letter item accepted by letter API"
        );
        Ok(())
    }
}
