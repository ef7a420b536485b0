//! Test harness for orchestrator tests.
//!
//! Provides:
//! - MockStore: in-memory request store with scripted throttle answers
//! - MockDirectory: scripted officer directory
//! - MockDispatcher: records dispatched letters and emails
//! - Harness: wires the three mocks into a RequestOrchestrator

use crate::collaborators::{LetterDispatcher, OfficerDirectory, RequestStore};
use crate::error::{DirectoryError, DispatchError, StoreError};
use crate::models::{
    AuthCodeRequest, LetterInstruction, LetterType, NewRequest, Officer, OfficerDetails,
    OfficerList, RequestStatus, ResidentialAddress, UserDetails,
};
use crate::orchestrator::RequestOrchestrator;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory request store with scripted throttle answers.
#[derive(Default)]
pub struct MockStore {
    pub requests: Mutex<HashMap<String, AuthCodeRequest>>,
    /// Companies that report a submitted request inside the corporate window.
    pub recent_corporate_submissions: Mutex<HashSet<String>>,
    /// Per-email submitted-request counts inside the user window.
    pub user_submission_counts: Mutex<HashMap<String, u32>>,
    /// Companies holding an active auth code.
    pub active_auth_codes: Mutex<HashSet<String>>,
    pub upserted_auth_codes: Mutex<Vec<String>>,
    pub corporate_checks: AtomicUsize,
    pub user_checks: AtomicUsize,
    /// When set, the corporate throttle query fails with a store error.
    pub fail_corporate_check: AtomicBool,
    /// When set, the conditional submitted-status write reports no row
    /// transitioned (a concurrent submit won).
    pub reject_status_update: AtomicBool,
}

#[async_trait]
impl RequestStore for MockStore {
    async fn insert(&self, request: &AuthCodeRequest) -> Result<(), StoreError> {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<AuthCodeRequest>, StoreError> {
        Ok(self.requests.lock().unwrap().get(id).cloned())
    }

    async fn update_officer(&self, id: &str, officer: &OfficerDetails) -> Result<(), StoreError> {
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .get_mut(id)
            .ok_or_else(|| StoreError::Query("no such request".to_string()))?;
        request.officer = Some(officer.clone());
        Ok(())
    }

    async fn update_status_submitted(
        &self,
        id: &str,
        letter_type: LetterType,
        submitted_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if self.reject_status_update.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .get_mut(id)
            .ok_or_else(|| StoreError::Query("no such request".to_string()))?;
        if request.status == RequestStatus::Submitted {
            return Ok(false);
        }
        request.status = RequestStatus::Submitted;
        request.letter_type = Some(letter_type);
        request.submitted_at = Some(submitted_at);
        Ok(true)
    }

    async fn has_recent_corporate_submission(
        &self,
        company_number: &str,
        _window: Duration,
    ) -> Result<bool, StoreError> {
        self.corporate_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_corporate_check.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store offline".to_string()));
        }
        Ok(self
            .recent_corporate_submissions
            .lock()
            .unwrap()
            .contains(company_number))
    }

    async fn count_recent_user_submissions(
        &self,
        email: &str,
        _window: Duration,
    ) -> Result<u32, StoreError> {
        self.user_checks.fetch_add(1, Ordering::SeqCst);
        Ok(*self
            .user_submission_counts
            .lock()
            .unwrap()
            .get(email)
            .unwrap_or(&0))
    }

    async fn company_has_active_auth_code(
        &self,
        company_number: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .active_auth_codes
            .lock()
            .unwrap()
            .contains(company_number))
    }

    async fn upsert_empty_auth_code(&self, company_number: &str) -> Result<(), StoreError> {
        self.upserted_auth_codes
            .lock()
            .unwrap()
            .push(company_number.to_string());
        Ok(())
    }
}

/// Scripted officer directory.
#[derive(Default)]
pub struct MockDirectory {
    /// Officers keyed by (company number, officer id).
    pub officers: Mutex<HashMap<(String, String), Officer>>,
    /// Companies with at least one eligible officer listed.
    pub eligible: Mutex<HashMap<String, Vec<Officer>>>,
    /// Companies with recent e-filing activity.
    pub recent_filings: Mutex<HashSet<String>>,
    pub filing_checks: AtomicUsize,
    pub officer_lookups: AtomicUsize,
    /// When set, the filing check fails with a directory error.
    pub fail_filing_check: AtomicBool,
}

#[async_trait]
impl OfficerDirectory for MockDirectory {
    async fn list_eligible_officers(
        &self,
        company_number: &str,
    ) -> Result<Option<OfficerList>, DirectoryError> {
        Ok(self
            .eligible
            .lock()
            .unwrap()
            .get(company_number)
            .map(|items| OfficerList {
                total_results: items.len(),
                items: items.clone(),
            }))
    }

    async fn get_officer(
        &self,
        company_number: &str,
        officer_id: &str,
    ) -> Result<Option<Officer>, DirectoryError> {
        self.officer_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .officers
            .lock()
            .unwrap()
            .get(&(company_number.to_string(), officer_id.to_string()))
            .cloned())
    }

    async fn check_recent_filing(&self, company_number: &str) -> Result<bool, DirectoryError> {
        self.filing_checks.fetch_add(1, Ordering::SeqCst);
        if self.fail_filing_check.load(Ordering::SeqCst) {
            return Err(DirectoryError::InternalServerError);
        }
        Ok(self
            .recent_filings
            .lock()
            .unwrap()
            .contains(company_number))
    }
}

/// Records dispatched letters and confirmation emails.
#[derive(Default)]
pub struct MockDispatcher {
    pub letters: Mutex<Vec<(LetterInstruction, String)>>,
    pub emails: Mutex<Vec<String>>,
    pub fail_dispatch: AtomicBool,
    pub fail_email: AtomicBool,
}

impl MockDispatcher {
    pub fn letter_count(&self) -> usize {
        self.letters.lock().unwrap().len()
    }
}

#[async_trait]
impl LetterDispatcher for MockDispatcher {
    async fn send_letter_instruction(
        &self,
        instruction: &LetterInstruction,
        idempotency_key: &str,
    ) -> Result<(), DispatchError> {
        if self.fail_dispatch.load(Ordering::SeqCst) {
            return Err(DispatchError::UnexpectedStatus(503));
        }
        self.letters
            .lock()
            .unwrap()
            .push((instruction.clone(), idempotency_key.to_string()));
        Ok(())
    }

    async fn send_confirmation_email(&self, recipient: &str) -> Result<(), DispatchError> {
        if self.fail_email.load(Ordering::SeqCst) {
            return Err(DispatchError::Transport("email endpoint down".to_string()));
        }
        self.emails.lock().unwrap().push(recipient.to_string());
        Ok(())
    }
}

/// Wires the three mocks into an orchestrator.
pub struct Harness {
    pub store: Arc<MockStore>,
    pub directory: Arc<MockDirectory>,
    pub dispatcher: Arc<MockDispatcher>,
    pub orchestrator: RequestOrchestrator,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MockStore::default());
        let directory = Arc::new(MockDirectory::default());
        let dispatcher = Arc::new(MockDispatcher::default());
        let orchestrator = RequestOrchestrator::new(
            store.clone(),
            directory.clone(),
            dispatcher.clone(),
        );
        Self {
            store,
            directory,
            dispatcher,
            orchestrator,
        }
    }

    pub fn user() -> UserDetails {
        UserDetails {
            id: "user-1".to_string(),
            email: "someone@example.com".to_string(),
            forename: "Ada".to_string(),
            surname: "Lovelace".to_string(),
        }
    }

    pub fn officer(id: &str) -> Officer {
        Officer {
            id: id.to_string(),
            forename: "Grace".to_string(),
            surname: "Hopper".to_string(),
            usual_residential_address: ResidentialAddress {
                id: format!("ura-{id}"),
                address_line_1: "1 Test Street".to_string(),
                locality: "Testtown".to_string(),
                postcode: "TT1 1TT".to_string(),
                country: "United Kingdom".to_string(),
                ..ResidentialAddress::default()
            },
        }
    }

    /// Register an officer as known to the directory for a company.
    pub fn register_officer(&self, company_number: &str, officer: &Officer) {
        self.directory.officers.lock().unwrap().insert(
            (company_number.to_string(), officer.id.clone()),
            officer.clone(),
        );
        self.directory
            .eligible
            .lock()
            .unwrap()
            .entry(company_number.to_string())
            .or_default()
            .push(officer.clone());
    }

    /// Seed a pending resource directly into the store.
    pub fn seed_pending_request(
        &self,
        company_number: &str,
        officer: Option<OfficerDetails>,
    ) -> AuthCodeRequest {
        let input = NewRequest {
            company_number: company_number.to_string(),
            company_name: "Test Company Ltd".to_string(),
            officer_id: None,
        };
        let resource = AuthCodeRequest::new(&input, Self::user(), officer);
        self.store
            .requests
            .lock()
            .unwrap()
            .insert(resource.id.clone(), resource.clone());
        resource
    }
}
