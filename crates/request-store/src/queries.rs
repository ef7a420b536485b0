//! Standalone query functions that work with any Connection.
//!
//! Each function takes a `&Connection` as its first parameter so the same
//! code serves the async executor and direct test connections. Timestamps
//! are stored as RFC 3339 strings in UTC, which keeps string comparison
//! consistent with chronological order.

use crate::DatabaseResult;
use chrono::{DateTime, Utc};
use request_orchestrator::{
    AuthCodeRequest, LetterType, OfficerDetails, RequestStatus, ResourceLinks, UserDetails,
};
use rusqlite::{params, Connection, Row};

/// Insert a freshly created request resource.
pub fn insert_request(conn: &Connection, request: &AuthCodeRequest) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO auth_code_requests (
            id, company_number, company_name,
            officer_id, officer_ura_id, officer_forename, officer_surname,
            status, letter_type, created_at, submitted_at,
            created_by_id, created_by_email, created_by_forename, created_by_surname,
            kind, etag, self_link
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            request.id,
            request.company_number,
            request.company_name,
            request.officer.as_ref().map(|o| o.id.as_str()),
            request.officer.as_ref().map(|o| o.ura_id.as_str()),
            request.officer.as_ref().map(|o| o.forename.as_str()),
            request.officer.as_ref().map(|o| o.surname.as_str()),
            request.status.as_str(),
            request.letter_type.map(|t| t.as_str()),
            request.created_at.to_rfc3339(),
            request.submitted_at.map(|t| t.to_rfc3339()),
            request.created_by.id,
            request.created_by.email,
            request.created_by.forename,
            request.created_by.surname,
            request.kind,
            request.etag,
            request.links.self_link,
        ],
    )?;
    Ok(())
}

/// Get a request by id.
pub fn get_request(conn: &Connection, id: &str) -> DatabaseResult<Option<AuthCodeRequest>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, company_number, company_name,
                officer_id, officer_ura_id, officer_forename, officer_surname,
                status, letter_type, created_at, submitted_at,
                created_by_id, created_by_email, created_by_forename, created_by_surname,
                kind, etag, self_link
         FROM auth_code_requests WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], request_from_row);

    match result {
        Ok(request) => Ok(Some(request)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Set the four officer fields on a request, atomically.
///
/// Returns whether a row was updated.
pub fn update_request_officer(
    conn: &Connection,
    id: &str,
    officer: &OfficerDetails,
) -> DatabaseResult<bool> {
    let count = conn.execute(
        "UPDATE auth_code_requests
         SET officer_id = ?2, officer_ura_id = ?3, officer_forename = ?4, officer_surname = ?5
         WHERE id = ?1",
        params![id, officer.id, officer.ura_id, officer.forename, officer.surname],
    )?;
    Ok(count > 0)
}

/// Transition a request to `submitted`, conditional on it still being
/// `pending`.
///
/// Returns whether a row transitioned; `false` means the request was
/// absent or a concurrent submit already won.
pub fn update_request_status_submitted(
    conn: &Connection,
    id: &str,
    letter_type: LetterType,
    submitted_at: DateTime<Utc>,
) -> DatabaseResult<bool> {
    let count = conn.execute(
        "UPDATE auth_code_requests
         SET status = 'submitted', letter_type = ?2, submitted_at = ?3
         WHERE id = ?1 AND status = 'pending'",
        params![id, letter_type.as_str(), submitted_at.to_rfc3339()],
    )?;
    Ok(count > 0)
}

/// Whether a submitted request exists for the company since the cutoff.
pub fn has_corporate_submission_since(
    conn: &Connection,
    company_number: &str,
    cutoff: DateTime<Utc>,
) -> DatabaseResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM auth_code_requests
         WHERE company_number = ?1 AND status = 'submitted' AND submitted_at >= ?2",
    )?;
    let count: i64 = stmt.query_row(params![company_number, cutoff.to_rfc3339()], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

/// Number of submitted requests created by the email since the cutoff.
pub fn count_user_submissions_since(
    conn: &Connection,
    email: &str,
    cutoff: DateTime<Utc>,
) -> DatabaseResult<u32> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM auth_code_requests
         WHERE created_by_email = ?1 AND status = 'submitted' AND submitted_at >= ?2",
    )?;
    let count: i64 = stmt.query_row(params![email, cutoff.to_rfc3339()], |row| row.get(0))?;
    Ok(count as u32)
}

/// Whether the company holds an active auth code.
pub fn company_has_active_auth_code(
    conn: &Connection,
    company_number: &str,
) -> DatabaseResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT COUNT(*) FROM auth_codes WHERE company_number = ?1 AND is_active = 1",
    )?;
    let count: i64 = stmt.query_row(params![company_number], |row| row.get(0))?;
    Ok(count > 0)
}

/// Ensure an auth-code row exists for the company, inactive when new.
///
/// An existing row (active or not) is left untouched.
pub fn upsert_empty_auth_code(conn: &Connection, company_number: &str) -> DatabaseResult<()> {
    conn.execute(
        "INSERT INTO auth_codes (company_number, is_active, updated_at)
         VALUES (?1, 0, ?2)
         ON CONFLICT(company_number) DO NOTHING",
        params![company_number, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn request_from_row(row: &Row<'_>) -> rusqlite::Result<AuthCodeRequest> {
    let officer = match (
        row.get::<_, Option<String>>(3)?,
        row.get::<_, Option<String>>(4)?,
        row.get::<_, Option<String>>(5)?,
        row.get::<_, Option<String>>(6)?,
    ) {
        (Some(id), Some(ura_id), Some(forename), Some(surname)) => Some(OfficerDetails {
            id,
            ura_id,
            forename,
            surname,
        }),
        _ => None,
    };

    Ok(AuthCodeRequest {
        id: row.get(0)?,
        company_number: row.get(1)?,
        company_name: row.get(2)?,
        officer,
        status: RequestStatus::from_str(&row.get::<_, String>(7)?),
        letter_type: row
            .get::<_, Option<String>>(8)?
            .map(|s| LetterType::from_str(&s)),
        created_at: parse_datetime(row.get::<_, String>(9)?),
        submitted_at: row.get::<_, Option<String>>(10)?.map(parse_datetime),
        created_by: UserDetails {
            id: row.get(11)?,
            email: row.get(12)?,
            forename: row.get(13)?,
            surname: row.get(14)?,
        },
        kind: row.get(15)?,
        etag: row.get(16)?,
        links: ResourceLinks {
            self_link: row.get(17)?,
        },
    })
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
