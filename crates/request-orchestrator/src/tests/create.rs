//! Creation and eligibility-gate scenarios.

use super::harness::Harness;
use crate::error::OrchestratorError;
use crate::models::{NewRequest, RequestStatus};
use std::sync::atomic::Ordering;

fn new_request(company_number: &str, officer_id: Option<&str>) -> NewRequest {
    NewRequest {
        company_number: company_number.to_string(),
        company_name: "Test Company Ltd".to_string(),
        officer_id: officer_id.map(str::to_string),
    }
}

#[tokio::test]
async fn test_create_with_no_prior_activity_yields_pending_resource() {
    let harness = Harness::new();
    harness.register_officer("87654321", &Harness::officer("12345678"));

    let resource = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap();

    assert_eq!(resource.status, RequestStatus::Pending);
    assert_eq!(resource.company_number, "87654321");
    assert!(resource.officer.is_none());
    assert!(resource.submitted_at.is_none());
    assert_eq!(harness.dispatcher.letter_count(), 0);
    assert!(harness
        .store
        .requests
        .lock()
        .unwrap()
        .contains_key(&resource.id));
}

#[tokio::test]
async fn test_create_missing_company_number_rejected_before_any_lookup() {
    let harness = Harness::new();

    let err = harness
        .orchestrator
        .create_request(&new_request("", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::InvalidInput(_)));
    assert_eq!(harness.store.corporate_checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_rejected_when_company_submitted_recently() {
    let harness = Harness::new();
    harness
        .store
        .recent_corporate_submissions
        .lock()
        .unwrap()
        .insert("87654321".to_string());

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Forbidden(_)));
    // First failure wins: the later gate checks are never consulted.
    assert_eq!(harness.store.user_checks.load(Ordering::SeqCst), 0);
    assert_eq!(harness.directory.filing_checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_rejected_when_user_limit_reached() {
    let harness = Harness::new();
    harness
        .store
        .user_submission_counts
        .lock()
        .unwrap()
        .insert("someone@example.com".to_string(), 3);

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Forbidden(_)));
    assert_eq!(harness.directory.filing_checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_allowed_just_below_user_limit() {
    let harness = Harness::new();
    harness.register_officer("87654321", &Harness::officer("12345678"));
    harness
        .store
        .user_submission_counts
        .lock()
        .unwrap()
        .insert("someone@example.com".to_string(), 2);

    let resource = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap();

    assert_eq!(resource.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_create_rejected_when_recent_filing_found() {
    let harness = Harness::new();
    harness
        .directory
        .recent_filings
        .lock()
        .unwrap()
        .insert("87654321".to_string());

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Forbidden(_)));
    // Gate order: both throttle checks ran before the filing check.
    assert_eq!(harness.store.corporate_checks.load(Ordering::SeqCst), 1);
    assert_eq!(harness.store.user_checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_store_fault_during_gate_is_internal_not_forbidden() {
    let harness = Harness::new();
    harness
        .store
        .fail_corporate_check
        .store(true, Ordering::SeqCst);

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Store { .. }));
}

#[tokio::test]
async fn test_create_directory_fault_during_gate_is_internal_not_forbidden() {
    let harness = Harness::new();
    harness
        .directory
        .fail_filing_check
        .store(true, Ordering::SeqCst);

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Directory { .. }));
}

#[tokio::test]
async fn test_create_with_officer_id_embeds_officer_fields() {
    let harness = Harness::new();
    harness.register_officer("87654321", &Harness::officer("12345678"));

    let resource = harness
        .orchestrator
        .create_request(&new_request("87654321", Some("12345678")), &Harness::user())
        .await
        .unwrap();

    let officer = resource.officer.expect("officer embedded at creation");
    assert_eq!(officer.id, "12345678");
    assert_eq!(officer.ura_id, "ura-12345678");
    assert_eq!(officer.forename, "Grace");
    assert_eq!(officer.surname, "Hopper");
}

#[tokio::test]
async fn test_create_with_unknown_officer_is_not_found() {
    let harness = Harness::new();

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", Some("missing")), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::NotFound(_)));
    assert!(harness.store.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_officer_requires_an_eligible_officer() {
    let harness = Harness::new();

    let err = harness
        .orchestrator
        .create_request(&new_request("87654321", None), &Harness::user())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::NotFound(_)));
    assert!(harness.store.requests.lock().unwrap().is_empty());
}
