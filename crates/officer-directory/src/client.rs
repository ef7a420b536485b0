//! HTTP client for the officer directory.

use crate::types::{ApiErrorBody, CompanyFilingCheck, OfficerJson, OfficerListJson};
use async_trait::async_trait;
use request_orchestrator::{DirectoryError, Officer, OfficerDirectory, OfficerList};
use std::time::Duration;

/// Default request timeout.
const TIMEOUT_SECS: u64 = 30;

/// Page size used when listing eligible officers for an eligibility check.
const ELIGIBLE_OFFICERS_PAGE_SIZE: u32 = 15;

/// Client for the officer directory API.
#[derive(Clone, Debug)]
pub struct DirectoryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a new client for the directory at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Eligible officers for a company, paged. A directory 404 means the
    /// company has none and returns `None`.
    pub async fn get_officers(
        &self,
        company_number: &str,
        start_index: u32,
        items_per_page: u32,
    ) -> Result<Option<OfficerListJson>, DirectoryError> {
        let path = format!(
            "/emergency-auth-code/company/{company_number}/eligible-officers\
             ?start_index={start_index}&items_per_page={items_per_page}"
        );
        self.get_optional(&path).await
    }

    /// A single eligible officer, or `None` on a directory 404.
    pub async fn get_officer_detail(
        &self,
        company_number: &str,
        officer_id: &str,
    ) -> Result<Option<OfficerJson>, DirectoryError> {
        let path = format!(
            "/emergency-auth-code/company/{company_number}/eligible-officers/{officer_id}"
        );
        self.get_optional(&path).await
    }

    /// The company's e-filing status for the directory's configured period.
    pub async fn get_filing_status(
        &self,
        company_number: &str,
    ) -> Result<CompanyFilingCheck, DirectoryError> {
        let path = format!("/emergency-auth-code/company/{company_number}/efiling-status");
        let response = self.send(&path).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.classify(status.as_u16(), response).await);
        }

        response
            .json::<CompanyFilingCheck>()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }

    /// GET a path where 404 is a well-formed "not known" answer.
    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, DirectoryError> {
        let response = self.send(path).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(self.classify(status.as_u16(), response).await);
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| DirectoryError::Malformed(e.to_string()))
    }

    async fn send(&self, path: &str) -> Result<reqwest::Response, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))
    }

    /// Classify a non-2xx response, logging whatever error body the
    /// directory attached.
    async fn classify(&self, status: u16, response: reqwest::Response) -> DirectoryError {
        let body = response.text().await.unwrap_or_default();
        classify_error(status, &body)
    }
}

/// Map a non-2xx directory status to a [`DirectoryError`].
fn classify_error(status: u16, body: &str) -> DirectoryError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    tracing::error!(
        status,
        directory_status = %parsed.status,
        message = %parsed.message,
        path = %parsed.path,
        "error response from directory"
    );

    match status {
        400 => DirectoryError::BadRequest,
        500..=599 => DirectoryError::InternalServerError,
        _ => DirectoryError::Unexpected(status),
    }
}

#[async_trait]
impl OfficerDirectory for DirectoryClient {
    async fn list_eligible_officers(
        &self,
        company_number: &str,
    ) -> Result<Option<OfficerList>, DirectoryError> {
        Ok(self
            .get_officers(company_number, 0, ELIGIBLE_OFFICERS_PAGE_SIZE)
            .await?
            .map(Into::into))
    }

    async fn get_officer(
        &self,
        company_number: &str,
        officer_id: &str,
    ) -> Result<Option<Officer>, DirectoryError> {
        Ok(self
            .get_officer_detail(company_number, officer_id)
            .await?
            .map(Into::into))
    }

    async fn check_recent_filing(&self, company_number: &str) -> Result<bool, DirectoryError> {
        let check = self.get_filing_status(company_number).await?;
        Ok(check.efiling_found_in_period)
    }
}
