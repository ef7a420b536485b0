//! The request lifecycle orchestrator.

use crate::collaborators::{LetterDispatcher, OfficerDirectory, RequestStore};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::models::{
    AuthCodeRequest, LetterInstruction, LetterType, NewRequest, Officer, RequestStatus,
    UserDetails,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Throttle windows applied by the eligibility gate.
///
/// # Fields
///
/// - `corporate_window`: how far back a `submitted` request for the same
///   company blocks a new one (default: 3 days)
/// - `user_window`: the rolling window for per-user submission counting
///   (default: 24 hours)
/// - `user_limit`: submissions per user allowed inside `user_window`
///   (default: 3)
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub corporate_window: Duration,
    pub user_window: Duration,
    pub user_limit: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            corporate_window: Duration::days(3),
            user_window: Duration::hours(24),
            user_limit: 3,
        }
    }
}

/// Orchestrates the auth code request lifecycle.
///
/// Owns creation, eligibility validation, officer attachment and submission,
/// calling the store, directory and dispatcher in a fixed order and enforcing
/// the resource invariants between calls.
pub struct RequestOrchestrator {
    store: Arc<dyn RequestStore>,
    directory: Arc<dyn OfficerDirectory>,
    dispatcher: Arc<dyn LetterDispatcher>,
    throttle: ThrottleConfig,
}

impl RequestOrchestrator {
    /// Create an orchestrator with default throttle windows.
    pub fn new(
        store: Arc<dyn RequestStore>,
        directory: Arc<dyn OfficerDirectory>,
        dispatcher: Arc<dyn LetterDispatcher>,
    ) -> Self {
        Self::with_throttle(store, directory, dispatcher, ThrottleConfig::default())
    }

    /// Create an orchestrator with explicit throttle windows.
    pub fn with_throttle(
        store: Arc<dyn RequestStore>,
        directory: Arc<dyn OfficerDirectory>,
        dispatcher: Arc<dyn LetterDispatcher>,
        throttle: ThrottleConfig,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            throttle,
        }
    }

    /// Create a new auth code request.
    ///
    /// Runs the eligibility gate (corporate throttle, user throttle, filing
    /// history — in that order, first failure wins), resolves the officer if
    /// one was supplied, and persists the new `pending` resource.
    pub async fn create_request(
        &self,
        input: &NewRequest,
        user: &UserDetails,
    ) -> OrchestratorResult<AuthCodeRequest> {
        if input.company_number.is_empty() {
            return Err(OrchestratorError::InvalidInput(
                "company number missing from request".to_string(),
            ));
        }

        self.check_eligibility(&input.company_number, &user.email)
            .await?;

        let officer = match &input.officer_id {
            Some(officer_id) => {
                let officer = self
                    .resolve_officer(&input.company_number, officer_id, "resolving officer")
                    .await?;
                Some(officer.details())
            }
            None => {
                // No officer chosen yet; the company must still have at least
                // one eligible officer for the request to be worth creating.
                let officers = self
                    .directory
                    .list_eligible_officers(&input.company_number)
                    .await
                    .map_err(|e| OrchestratorError::directory("listing eligible officers", e))?;
                match officers {
                    Some(list) if !list.items.is_empty() => None,
                    _ => {
                        return Err(OrchestratorError::NotFound(
                            "company has no eligible officers".to_string(),
                        ))
                    }
                }
            }
        };

        let resource = AuthCodeRequest::new(input, user.clone(), officer);
        self.store
            .insert(&resource)
            .await
            .map_err(|e| OrchestratorError::store("inserting request", e))?;

        info!(
            request_id = %resource.id,
            company_number = %resource.company_number,
            "auth code request created"
        );

        Ok(resource)
    }

    /// Attach an officer to a pending request.
    ///
    /// All four officer fields are set together from the directory's answer.
    /// This step never dispatches anything.
    pub async fn attach_officer(
        &self,
        request_id: &str,
        company_number: &str,
        officer_id: &str,
    ) -> OrchestratorResult<AuthCodeRequest> {
        let mut resource = self.load_pending(request_id, company_number).await?;

        let officer = self
            .resolve_officer(company_number, officer_id, "resolving officer")
            .await?;
        let details = officer.details();

        self.store
            .update_officer(&resource.id, &details)
            .await
            .map_err(|e| OrchestratorError::store("updating officer", e))?;

        info!(
            request_id = %resource.id,
            company_number = %company_number,
            officer_id = %details.id,
            "officer attached to auth code request"
        );

        resource.officer = Some(details);
        Ok(resource)
    }

    /// Submit a pending request, dispatching the letter instruction exactly
    /// once.
    ///
    /// Step order is fixed: derive the letter type, re-resolve the officer,
    /// dispatch the letter, persist `submitted`, then a best-effort
    /// confirmation email. A failure aborts all later steps but earlier
    /// persisted state is kept, so the caller can retry the submission.
    pub async fn submit(
        &self,
        request_id: &str,
        company_number: &str,
        user: &UserDetails,
    ) -> OrchestratorResult<AuthCodeRequest> {
        let resource = self.load_pending(request_id, company_number).await?;

        let officer = resource.officer.as_ref().ok_or_else(|| {
            OrchestratorError::InvalidInput("officer details not supplied".to_string())
        })?;

        // The letter type depends on whether the company already holds an
        // active code at this moment, not at creation time.
        let has_auth_code = self
            .store
            .company_has_active_auth_code(company_number)
            .await
            .map_err(|e| OrchestratorError::store("checking auth code register", e))?;
        if !has_auth_code {
            self.store
                .upsert_empty_auth_code(company_number)
                .await
                .map_err(|e| OrchestratorError::store("upserting auth code placeholder", e))?;
        }
        let letter_type = LetterType::for_company(has_auth_code);

        // The officer may have become ineligible since attachment, so the
        // stored id is resolved again for the current address.
        let current = self
            .resolve_officer(company_number, &officer.id, "resolving officer for dispatch")
            .await?;

        let instruction = LetterInstruction {
            email: user.email.clone(),
            company_number: company_number.to_string(),
            addressee: current.display_name(),
            address: current.usual_residential_address.clone(),
            letter_type,
        };

        info!(
            request_id = %resource.id,
            company_number = %company_number,
            letter_type = letter_type.as_str(),
            "dispatching letter instruction"
        );

        self.dispatcher
            .send_letter_instruction(&instruction, &resource.id)
            .await
            .map_err(|e| OrchestratorError::dispatch("sending letter instruction", e))?;

        let submitted_at = Utc::now();
        let transitioned = self
            .store
            .update_status_submitted(&resource.id, letter_type, submitted_at)
            .await
            .map_err(|e| OrchestratorError::store("updating status", e))?;
        if !transitioned {
            warn!(request_id = %resource.id, "submitted-status write lost a race");
            return Err(OrchestratorError::Conflict(
                "request was submitted concurrently".to_string(),
            ));
        }

        // Already committed; an email failure must not fail the submission.
        if let Err(e) = self.dispatcher.send_confirmation_email(&user.email).await {
            error!(request_id = %resource.id, error = %e, "confirmation email failed");
        } else {
            info!(request_id = %resource.id, "confirmation email sent");
        }

        let mut resource = resource;
        resource.status = RequestStatus::Submitted;
        resource.letter_type = Some(letter_type);
        resource.submitted_at = Some(submitted_at);
        Ok(resource)
    }

    /// Point read of a request resource.
    pub async fn get_request(&self, request_id: &str) -> OrchestratorResult<AuthCodeRequest> {
        self.store
            .get(request_id)
            .await
            .map_err(|e| OrchestratorError::store("reading request", e))?
            .ok_or_else(|| OrchestratorError::NotFound("auth code request not found".to_string()))
    }

    /// The eligibility gate, evaluated in fixed order with the first failure
    /// winning: corporate throttle, then user throttle, then filing history.
    async fn check_eligibility(
        &self,
        company_number: &str,
        email: &str,
    ) -> OrchestratorResult<()> {
        let corporate_hit = self
            .store
            .has_recent_corporate_submission(company_number, self.throttle.corporate_window)
            .await
            .map_err(|e| OrchestratorError::store("checking corporate submissions", e))?;
        if corporate_hit {
            info!(company_number = %company_number, "request already submitted for company");
            return Err(OrchestratorError::Forbidden(
                "request not permitted: a request was already submitted for this company"
                    .to_string(),
            ));
        }

        let user_count = self
            .store
            .count_recent_user_submissions(email, self.throttle.user_window)
            .await
            .map_err(|e| OrchestratorError::store("checking user submissions", e))?;
        if user_count >= self.throttle.user_limit {
            info!(email = %email, submissions = user_count, "user submission limit reached");
            return Err(OrchestratorError::Forbidden(
                "request not permitted: user submission limit exceeded".to_string(),
            ));
        }

        let filed_recently = self
            .directory
            .check_recent_filing(company_number)
            .await
            .map_err(|e| OrchestratorError::directory("checking filing history", e))?;
        if filed_recently {
            info!(company_number = %company_number, "recent filings found for company");
            return Err(OrchestratorError::Forbidden(
                "request not permitted: recent filing found for this company".to_string(),
            ));
        }

        Ok(())
    }

    /// Load a resource and verify it is writable: present, owned by the
    /// supplied company number, and still `pending`.
    async fn load_pending(
        &self,
        request_id: &str,
        company_number: &str,
    ) -> OrchestratorResult<AuthCodeRequest> {
        let resource = self
            .store
            .get(request_id)
            .await
            .map_err(|e| OrchestratorError::store("reading request", e))?
            .ok_or_else(|| {
                OrchestratorError::NotFound("auth code request not found".to_string())
            })?;

        if resource.company_number != company_number {
            return Err(OrchestratorError::InvalidState(
                "company number does not match the request".to_string(),
            ));
        }
        if resource.status == RequestStatus::Submitted {
            return Err(OrchestratorError::InvalidState(
                "request already submitted".to_string(),
            ));
        }

        Ok(resource)
    }

    /// Look up a single officer, mapping a directory 404 to `NotFound`.
    async fn resolve_officer(
        &self,
        company_number: &str,
        officer_id: &str,
        step: &'static str,
    ) -> OrchestratorResult<Officer> {
        self.directory
            .get_officer(company_number, officer_id)
            .await
            .map_err(|e| OrchestratorError::directory(step, e))?
            .ok_or_else(|| OrchestratorError::NotFound("no officer found".to_string()))
    }
}
