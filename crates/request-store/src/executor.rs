//! Async SQLite executor using a dedicated background thread.
//!
//! All SQLite work for the request store runs on a single thread, fed
//! through a channel; callers await results without blocking the Tokio
//! runtime. SQLite serializes writes anyway, so one thread is optimal, and
//! FIFO execution keeps query latency predictable. Only SQL should run
//! inside `call()` — mapping and validation happen outside.

use crate::{migrations, DatabaseError, DatabaseResult};
use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::info;

/// Convert a tokio_rusqlite::Error to DatabaseError.
fn from_tokio_rusqlite(e: tokio_rusqlite::Error) -> DatabaseError {
    match e {
        tokio_rusqlite::Error::Rusqlite(e) => DatabaseError::Sqlite(e),
        tokio_rusqlite::Error::Close(_) => {
            DatabaseError::Connection("Connection closed".to_string())
        }
        other => DatabaseError::Connection(other.to_string()),
    }
}

/// Async SQLite database with a dedicated executor thread.
#[derive(Clone)]
pub struct AsyncDatabase {
    conn: Connection,
}

impl AsyncDatabase {
    /// Open a database at the given path.
    ///
    /// Creates the file if absent, enables WAL mode and the usual
    /// performance pragmas, runs pending migrations and starts the
    /// executor thread.
    pub async fn open(path: &Path) -> DatabaseResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path.to_string_lossy().to_string();
        info!(path = %path_str, "Opening request store database");

        let conn = Connection::open(&path_str)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        conn.call(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA foreign_keys = ON;
                PRAGMA temp_store = MEMORY;
                PRAGMA busy_timeout = 5000;
                ",
            )?;
            Ok(())
        })
        .await
        .map_err(from_tokio_rusqlite)?;

        conn.call(|conn| Ok(migrations::run_migrations(conn)))
            .await
            .map_err(from_tokio_rusqlite)??;

        Ok(Self { conn })
    }

    /// Open an in-memory database. Used by tests and local tooling.
    pub async fn open_in_memory() -> DatabaseResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        conn.call(|conn| Ok(migrations::run_migrations(conn)))
            .await
            .map_err(from_tokio_rusqlite)??;

        Ok(Self { conn })
    }

    /// Run a closure against the connection on the executor thread.
    pub async fn call<F, T>(&self, f: F) -> DatabaseResult<T>
    where
        F: FnOnce(&mut rusqlite::Connection) -> DatabaseResult<T> + Send + 'static,
        T: Send + 'static,
    {
        self.conn
            .call(move |conn| Ok(f(conn)))
            .await
            .map_err(from_tokio_rusqlite)?
    }
}
