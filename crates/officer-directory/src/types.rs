//! Wire types for directory responses.

use request_orchestrator::{Officer, OfficerList, ResidentialAddress};
use serde::Deserialize;

/// Page of eligible officers for a company.
#[derive(Debug, Clone, Deserialize)]
pub struct OfficerListJson {
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub start_index: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub items: Vec<OfficerJson>,
}

/// A single eligible officer.
#[derive(Debug, Clone, Deserialize)]
pub struct OfficerJson {
    pub id: String,
    #[serde(default)]
    pub forename: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub officer_role: String,
    #[serde(default)]
    pub date_of_birth: DateOfBirthJson,
    #[serde(default)]
    pub appointed_on: String,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub country_of_residence: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub usual_residential_address: AddressJson,
}

/// Month and year of an officer's date of birth.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateOfBirthJson {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub year: String,
}

/// An officer's address as returned by the directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressJson {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub po_box: String,
    #[serde(default)]
    pub premises: String,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

/// Whether a filing has happened against the company in the directory's
/// configured period.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFilingCheck {
    pub efiling_found_in_period: bool,
}

/// Error body the directory attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: String,
}

impl From<AddressJson> for ResidentialAddress {
    fn from(address: AddressJson) -> Self {
        Self {
            id: address.id,
            po_box: address.po_box,
            premises: address.premises,
            address_line_1: address.address_line_1,
            address_line_2: address.address_line_2,
            locality: address.locality,
            region: address.region,
            postcode: address.postcode,
            country: address.country,
        }
    }
}

impl From<OfficerJson> for Officer {
    fn from(officer: OfficerJson) -> Self {
        Self {
            id: officer.id,
            forename: officer.forename,
            surname: officer.surname,
            usual_residential_address: officer.usual_residential_address.into(),
        }
    }
}

impl From<OfficerListJson> for OfficerList {
    fn from(list: OfficerListJson) -> Self {
        Self {
            total_results: list.total_results as usize,
            items: list.items.into_iter().map(Into::into).collect(),
        }
    }
}
