//! Error types for the request lifecycle.
//!
//! `OrchestratorError` is the closed taxonomy every lifecycle operation
//! returns; callers pattern-match it to decide transport-level mapping.
//! The three collaborator error enums are produced by the store / directory /
//! dispatcher implementations at their interface boundary and wrapped here
//! with the step that failed.

use thiserror::Error;

/// Fault reported by the request store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A query or write failed.
    #[error("query failed: {0}")]
    Query(String),

    /// The underlying connection or executor is unavailable.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Fault reported by the officer directory client.
///
/// Non-2xx directory responses are classified here; a well-formed 404 is not
/// an error and surfaces as `None` from the lookup itself.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The directory rejected the request as malformed (400).
    #[error("directory rejected the request as malformed")]
    BadRequest,

    /// The directory reported an internal failure (5xx).
    #[error("directory reported an internal server error")]
    InternalServerError,

    /// Any other non-2xx status.
    #[error("unexpected status {0} from directory")]
    Unexpected(u16),

    /// The response body could not be read or parsed.
    #[error("failed reading directory response: {0}")]
    Malformed(String),

    /// Transport-level failure (connect, timeout).
    #[error("transport failure calling directory: {0}")]
    Transport(String),
}

/// Fault reported by the letter dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The downstream API answered with a non-success status.
    #[error("unexpected status {0} from letter API")]
    UnexpectedStatus(u16),

    /// Transport-level failure (connect, timeout).
    #[error("transport failure calling letter API: {0}")]
    Transport(String),

    /// The outgoing payload could not be encoded.
    #[error("failed encoding dispatch payload: {0}")]
    Encoding(String),
}

/// Errors returned by every orchestrator operation.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Malformed or missing required input.
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// A throttle or filing-history rule rejected the request.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource, officer, or officer list absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource is not in a state that permits the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A concurrent writer won the race for the same transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The officer directory failed mid-operation.
    #[error("directory failure while {step}: {source}")]
    Directory {
        step: &'static str,
        #[source]
        source: DirectoryError,
    },

    /// The letter dispatcher failed mid-operation.
    #[error("dispatch failure while {step}: {source}")]
    Dispatch {
        step: &'static str,
        #[source]
        source: DispatchError,
    },

    /// The request store failed mid-operation.
    #[error("store failure while {step}: {source}")]
    Store {
        step: &'static str,
        #[source]
        source: StoreError,
    },
}

impl OrchestratorError {
    pub(crate) fn store(step: &'static str, source: StoreError) -> Self {
        Self::Store { step, source }
    }

    pub(crate) fn directory(step: &'static str, source: DirectoryError) -> Self {
        Self::Directory { step, source }
    }

    pub(crate) fn dispatch(step: &'static str, source: DispatchError) -> Self {
        Self::Dispatch { step, source }
    }
}

/// Result type alias using OrchestratorError.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
