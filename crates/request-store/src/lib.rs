//! SQLite persistence for the auth code request service.
//!
//! This crate provides:
//! - Async SQLite executor with a dedicated thread
//! - Database migrations
//! - Query helpers for the request table and the auth-code register
//! - [`SqliteRequestStore`], the [`request_orchestrator::RequestStore`]
//!   implementation handed to the orchestrator
//!
//! # Architecture
//!
//! The `AsyncDatabase` uses a single dedicated thread for all SQLite
//! operations. Queries are sent through a channel and executed in FIFO
//! order, keeping the Tokio runtime free for other async work.
//!
//! ```ignore
//! let db = AsyncDatabase::open(path).await?;
//! let store = SqliteRequestStore::new(db);
//! let request = store.get("…").await?;
//! ```

mod error;
mod executor;
mod migrations;
pub mod queries;
mod store;

pub use error::{DatabaseError, DatabaseResult};
pub use executor::AsyncDatabase;
pub use migrations::run_migrations;
pub use store::SqliteRequestStore;
