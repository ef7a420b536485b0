//! Database migrations.
//!
//! Migrations are run in order and tracked in the `migrations` table.

use crate::DatabaseResult;
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> DatabaseResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    info!(current_version, target_version = CURRENT_VERSION, "Running migrations");

    if current_version < 1 {
        migrate_v1_auth_code_requests(conn)?;
    }
    if current_version < 2 {
        migrate_v2_auth_code_register(conn)?;
    }

    info!("Migrations complete");
    Ok(())
}

fn record_migration(conn: &Connection, version: i32, name: &str) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![version, name],
    )?;
    debug!(version, name, "Migration applied");
    Ok(())
}

/// V1: the auth code request resource table.
fn migrate_v1_auth_code_requests(conn: &Connection) -> DatabaseResult<()> {
    info!("Applying migration v1: auth code requests");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS auth_code_requests (
            id TEXT PRIMARY KEY,
            company_number TEXT NOT NULL,
            company_name TEXT NOT NULL,
            officer_id TEXT,
            officer_ura_id TEXT,
            officer_forename TEXT,
            officer_surname TEXT,
            status TEXT NOT NULL,
            letter_type TEXT,
            created_at TEXT NOT NULL,
            submitted_at TEXT,
            created_by_id TEXT NOT NULL,
            created_by_email TEXT NOT NULL,
            created_by_forename TEXT NOT NULL,
            created_by_surname TEXT NOT NULL,
            kind TEXT NOT NULL,
            etag TEXT NOT NULL,
            self_link TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_requests_company_status
            ON auth_code_requests(company_number, status);
        CREATE INDEX IF NOT EXISTS idx_requests_email_status
            ON auth_code_requests(created_by_email, status);
        ",
    )?;

    record_migration(conn, 1, "auth_code_requests")
}

/// V2: the per-company auth-code register consulted at submission.
fn migrate_v2_auth_code_register(conn: &Connection) -> DatabaseResult<()> {
    info!("Applying migration v2: auth code register");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS auth_codes (
            company_number TEXT PRIMARY KEY,
            is_active INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        );
        ",
    )?;

    record_migration(conn, 2, "auth_code_register")
}
