//! Client for the external officer directory API.
//!
//! The directory answers three questions about a company: which officers
//! are eligible to receive an auth code letter, the full detail (including
//! residential address) of one officer, and whether the company has e-filed
//! recently. A well-formed 404 means "not known" and surfaces as `None`;
//! every other non-2xx response is classified into a
//! [`request_orchestrator::DirectoryError`].

mod client;
mod types;

pub use client::DirectoryClient;
pub use types::{
    AddressJson, CompanyFilingCheck, DateOfBirthJson, OfficerJson, OfficerListJson,
};
