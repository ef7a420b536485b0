//! Collaborator seams driven by the orchestrator.
//!
//! Implementations live in their own crates (`request-store`,
//! `officer-directory`, `letter-dispatch`) and are injected as
//! `Arc<dyn …>` handles, constructed once at process start.

use crate::error::{DirectoryError, DispatchError, StoreError};
use crate::models::{
    AuthCodeRequest, LetterInstruction, LetterType, Officer, OfficerDetails, OfficerList,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Persistence for auth code request resources and the auth-code register.
///
/// Each operation is independently atomic; the orchestrator does not assume
/// cross-call transactions.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persist a freshly created resource.
    async fn insert(&self, request: &AuthCodeRequest) -> Result<(), StoreError>;

    /// Point lookup by resource id.
    async fn get(&self, id: &str) -> Result<Option<AuthCodeRequest>, StoreError>;

    /// Set the four officer fields on a pending resource, atomically.
    async fn update_officer(&self, id: &str, officer: &OfficerDetails) -> Result<(), StoreError>;

    /// Transition a resource to `submitted`, conditional on it still being
    /// `pending`. Returns whether a row actually transitioned; `false` means
    /// a concurrent submit won the race.
    async fn update_status_submitted(
        &self,
        id: &str,
        letter_type: LetterType,
        submitted_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Whether a `submitted` request exists for this company inside the
    /// window.
    async fn has_recent_corporate_submission(
        &self,
        company_number: &str,
        window: Duration,
    ) -> Result<bool, StoreError>;

    /// Number of `submitted` requests created by this user's email inside
    /// the window.
    async fn count_recent_user_submissions(
        &self,
        email: &str,
        window: Duration,
    ) -> Result<u32, StoreError>;

    /// Whether the company currently holds an active auth code.
    async fn company_has_active_auth_code(&self, company_number: &str)
        -> Result<bool, StoreError>;

    /// Ensure an (inactive) auth-code row exists for the company. Backend
    /// letter processing expects the row to be present.
    async fn upsert_empty_auth_code(&self, company_number: &str) -> Result<(), StoreError>;
}

/// Read access to the external officer directory.
///
/// A well-formed 404 from the directory surfaces as `Ok(None)`; every other
/// non-2xx response is a [`DirectoryError`].
#[async_trait]
pub trait OfficerDirectory: Send + Sync {
    /// Eligible officers for a company, or None when the directory knows of
    /// none.
    async fn list_eligible_officers(
        &self,
        company_number: &str,
    ) -> Result<Option<OfficerList>, DirectoryError>;

    /// A single eligible officer with residential address detail.
    async fn get_officer(
        &self,
        company_number: &str,
        officer_id: &str,
    ) -> Result<Option<Officer>, DirectoryError>;

    /// Whether the company has e-filed within the directory's configured
    /// period.
    async fn check_recent_filing(&self, company_number: &str) -> Result<bool, DirectoryError>;
}

/// Downstream dispatch of the finished letter instruction and the
/// confirmation email.
#[async_trait]
pub trait LetterDispatcher: Send + Sync {
    /// Send the letter instruction. The idempotency key (the request id) is
    /// stable across retries so a repeated call is safe downstream.
    async fn send_letter_instruction(
        &self,
        instruction: &LetterInstruction,
        idempotency_key: &str,
    ) -> Result<(), DispatchError>;

    /// Send the post-submission confirmation email.
    async fn send_confirmation_email(&self, recipient: &str) -> Result<(), DispatchError>;
}
