//! Dependency wiring for the service.
//!
//! All collaborators are constructed here, once, and handed to the
//! orchestrator by reference — nothing reads configuration or reaches for a
//! client ambiently after startup.

use crate::config::Config;
use letter_dispatch::{DispatchService, EmailClient, LetterApiClient};
use officer_directory::DirectoryClient;
use request_orchestrator::RequestOrchestrator;
use request_store::{AsyncDatabase, SqliteRequestStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Build the orchestrator and every collaborator it drives.
pub async fn build_orchestrator(config: &Config) -> anyhow::Result<RequestOrchestrator> {
    config.validate()?;

    let db = AsyncDatabase::open(Path::new(&config.database_path)).await?;
    let store = Arc::new(SqliteRequestStore::new(db));

    let directory = Arc::new(DirectoryClient::new(config.directory_api_url.clone()));

    let letter_client = LetterApiClient::new(
        config.letter_api_url.clone(),
        config.letter_api_path.clone(),
    );
    let email_client = EmailClient::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
        config.portal_url.clone(),
    );
    let dispatcher = Arc::new(DispatchService::new(letter_client, email_client));

    info!(
        database_path = %config.database_path,
        directory_api_url = %config.directory_api_url,
        letter_api_url = %config.letter_api_url,
        "auth code request service wired"
    );

    Ok(RequestOrchestrator::new(store, directory, dispatcher))
}
