//! The orchestrator-facing store implementation.

use crate::{queries, AsyncDatabase, DatabaseError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use request_orchestrator::{
    AuthCodeRequest, LetterType, OfficerDetails, RequestStore, StoreError,
};

/// [`RequestStore`] backed by the SQLite executor.
#[derive(Clone)]
pub struct SqliteRequestStore {
    db: AsyncDatabase,
}

impl SqliteRequestStore {
    pub fn new(db: AsyncDatabase) -> Self {
        Self { db }
    }
}

/// Classify executor faults at the trait boundary.
fn into_store_error(e: DatabaseError) -> StoreError {
    match e {
        DatabaseError::Connection(msg) => StoreError::Connection(msg),
        other => StoreError::Query(other.to_string()),
    }
}

#[async_trait]
impl RequestStore for SqliteRequestStore {
    async fn insert(&self, request: &AuthCodeRequest) -> Result<(), StoreError> {
        let request = request.clone();
        self.db
            .call(move |conn| queries::insert_request(conn, &request))
            .await
            .map_err(into_store_error)
    }

    async fn get(&self, id: &str) -> Result<Option<AuthCodeRequest>, StoreError> {
        let id = id.to_string();
        self.db
            .call(move |conn| queries::get_request(conn, &id))
            .await
            .map_err(into_store_error)
    }

    async fn update_officer(&self, id: &str, officer: &OfficerDetails) -> Result<(), StoreError> {
        let id = id.to_string();
        let officer = officer.clone();
        let updated = self
            .db
            .call(move |conn| queries::update_request_officer(conn, &id, &officer))
            .await
            .map_err(into_store_error)?;
        if !updated {
            return Err(StoreError::Query(
                "no request row updated for officer attach".to_string(),
            ));
        }
        Ok(())
    }

    async fn update_status_submitted(
        &self,
        id: &str,
        letter_type: LetterType,
        submitted_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let id = id.to_string();
        self.db
            .call(move |conn| {
                queries::update_request_status_submitted(conn, &id, letter_type, submitted_at)
            })
            .await
            .map_err(into_store_error)
    }

    async fn has_recent_corporate_submission(
        &self,
        company_number: &str,
        window: Duration,
    ) -> Result<bool, StoreError> {
        let company_number = company_number.to_string();
        let cutoff = Utc::now() - window;
        self.db
            .call(move |conn| {
                queries::has_corporate_submission_since(conn, &company_number, cutoff)
            })
            .await
            .map_err(into_store_error)
    }

    async fn count_recent_user_submissions(
        &self,
        email: &str,
        window: Duration,
    ) -> Result<u32, StoreError> {
        let email = email.to_string();
        let cutoff = Utc::now() - window;
        self.db
            .call(move |conn| queries::count_user_submissions_since(conn, &email, cutoff))
            .await
            .map_err(into_store_error)
    }

    async fn company_has_active_auth_code(
        &self,
        company_number: &str,
    ) -> Result<bool, StoreError> {
        let company_number = company_number.to_string();
        self.db
            .call(move |conn| queries::company_has_active_auth_code(conn, &company_number))
            .await
            .map_err(into_store_error)
    }

    async fn upsert_empty_auth_code(&self, company_number: &str) -> Result<(), StoreError> {
        let company_number = company_number.to_string();
        self.db
            .call(move |conn| queries::upsert_empty_auth_code(conn, &company_number))
            .await
            .map_err(into_store_error)
    }
}
