//! SQLite persistence layer (C2): one table per collection in spec §3,
//! a split writer/reader connection pool, versioned migrations, and an
//! async [`IStorageBackend`](cortex_core::traits::IStorageBackend) impl
//! built by wrapping the synchronous rusqlite calls in
//! `tokio::task::spawn_blocking`.

mod backend;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod vector;

pub use backend::SqliteBackend;

use cortex_core::errors::{CortexError, StorageError};

/// Wrap a rusqlite/serde error string as a [`StorageError::Backend`].
pub(crate) fn to_storage_err(message: impl Into<String>) -> CortexError {
    StorageError::Backend {
        message: message.into(),
    }
    .into()
}
