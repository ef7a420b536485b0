//! Domain model types for the auth code request resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource kind constant, carried on every persisted request.
pub const REQUEST_KIND: &str = "emergency-auth-code-request";

/// Format of the resource's self link.
const SELF_LINK_FORMAT: &str = "/emergency-auth-code-service/auth-code-requests";

/// Identity of the user a request is created on behalf of.
///
/// Captured from the (upstream-authenticated) session at creation and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: String,
    pub email: String,
    pub forename: String,
    pub surname: String,
}

/// Request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Submitted,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "submitted" => Self::Submitted,
            _ => Self::Pending,
        }
    }
}

/// Letter type, derived at submission from whether the company already holds
/// an active auth code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterType {
    Apply,
    Reminder,
}

impl LetterType {
    /// Derive the letter type for a company.
    pub fn for_company(has_active_auth_code: bool) -> Self {
        if has_active_auth_code {
            Self::Reminder
        } else {
            Self::Apply
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Reminder => "reminder",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "reminder" => Self::Reminder,
            _ => Self::Apply,
        }
    }
}

/// The four officer fields attached to a request.
///
/// Always set or absent together; partial officer identity is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerDetails {
    pub id: String,
    /// Usual-residential-address identifier.
    pub ura_id: String,
    pub forename: String,
    pub surname: String,
}

impl OfficerDetails {
    /// Display name for the letter addressee line.
    pub fn display_name(&self) -> String {
        if self.forename.is_empty() {
            self.surname.clone()
        } else {
            format!("{} {}", self.forename, self.surname)
        }
    }
}

/// Links object of the resource representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// The orchestrated auth code request resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCodeRequest {
    pub id: String,
    pub company_number: String,
    pub company_name: String,
    pub officer: Option<OfficerDetails>,
    pub status: RequestStatus,
    pub letter_type: Option<LetterType>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_by: UserDetails,
    pub kind: String,
    pub etag: String,
    pub links: ResourceLinks,
}

impl AuthCodeRequest {
    /// Build a new `pending` resource ready for insertion.
    ///
    /// Allocates the id and etag, stamps `created_at` and wires the self
    /// link. `submitted_at` and `letter_type` stay unset until submission.
    pub fn new(input: &NewRequest, created_by: UserDetails, officer: Option<OfficerDetails>) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        let self_link = format!("{SELF_LINK_FORMAT}/{id}");

        Self {
            id,
            company_number: input.company_number.clone(),
            company_name: input.company_name.clone(),
            officer,
            status: RequestStatus::Pending,
            letter_type: None,
            created_at: Utc::now(),
            submitted_at: None,
            created_by,
            kind: REQUEST_KIND.to_string(),
            etag: generate_etag(),
            links: ResourceLinks { self_link },
        }
    }
}

/// Input for creating a new request.
///
/// `company_name` is resolved by the caller (company profile lookups live
/// upstream of this service). `officer_id` may be supplied up front or
/// attached later while the request is `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRequest {
    pub company_number: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub officer_id: Option<String>,
}

/// A company officer as resolved from the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Officer {
    pub id: String,
    pub forename: String,
    pub surname: String,
    pub usual_residential_address: ResidentialAddress,
}

impl Officer {
    /// Display name for the letter addressee line.
    pub fn display_name(&self) -> String {
        if self.forename.is_empty() {
            self.surname.clone()
        } else {
            format!("{} {}", self.forename, self.surname)
        }
    }

    /// The four fields persisted onto a request.
    pub fn details(&self) -> OfficerDetails {
        OfficerDetails {
            id: self.id.clone(),
            ura_id: self.usual_residential_address.id.clone(),
            forename: self.forename.clone(),
            surname: self.surname.clone(),
        }
    }
}

/// An officer's usual residential address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentialAddress {
    pub id: String,
    pub po_box: String,
    pub premises: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub locality: String,
    pub region: String,
    pub postcode: String,
    pub country: String,
}

/// Page of eligible officers for a company.
#[derive(Debug, Clone)]
pub struct OfficerList {
    pub items: Vec<Officer>,
    pub total_results: usize,
}

/// The letter instruction handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterInstruction {
    pub email: String,
    pub company_number: String,
    /// Addressee line for the letter envelope.
    pub addressee: String,
    pub address: ResidentialAddress,
    pub letter_type: LetterType,
}

/// Generate an opaque etag for a newly created resource.
fn generate_etag() -> String {
    let bytes: [u8; 20] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
