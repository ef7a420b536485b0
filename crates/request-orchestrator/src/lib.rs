//! Auth code request lifecycle orchestration.
//!
//! This crate owns the `AuthCodeRequest` resource: it creates it, validates
//! eligibility, attaches an officer, and submits it exactly once. The three
//! collaborators it drives (request store, officer directory, letter
//! dispatcher) are trait seams implemented elsewhere and injected at
//! construction.
//!
//! # Core Invariants
//!
//! 1. **Create-Once**: a request is created exactly once, `pending`.
//! 2. **Submit-Once**: a second submission of a `submitted` request is
//!    rejected before any collaborator is called.
//! 3. **Atomic Officer**: the four officer fields are set together or not
//!    at all.
//! 4. **Dispatch-Then-Commit**: the letter instruction is sent before the
//!    `submitted` status is persisted; a failed dispatch leaves the resource
//!    `pending` and retryable.
//!
//! # Lifecycle
//!
//! ```text
//! create_request -> pending --(attach_officer, 0..1)--> pending
//!                                                          |
//!                                          submit          v
//!                                       [terminal] <-- submitted
//! ```

pub mod collaborators;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod representation;

#[cfg(test)]
mod tests;

pub use collaborators::{LetterDispatcher, OfficerDirectory, RequestStore};
pub use error::{
    DirectoryError, DispatchError, OrchestratorError, OrchestratorResult, StoreError,
};
pub use models::{
    AuthCodeRequest, LetterInstruction, LetterType, NewRequest, Officer, OfficerDetails,
    OfficerList, RequestStatus, ResidentialAddress, ResourceLinks, UserDetails,
};
pub use orchestrator::{RequestOrchestrator, ThrottleConfig};
pub use representation::RequestRepresentation;
