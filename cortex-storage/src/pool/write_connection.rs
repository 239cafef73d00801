//! The single writer connection. SQLite allows only one writer at a time;
//! serializing through one connection avoids `SQLITE_BUSY` under WAL.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use cortex_core::errors::CortexResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> CortexResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> CortexResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure against the writer connection. Synchronous; callers
    /// that need to expose this across an `async` boundary wrap the call
    /// in `tokio::task::spawn_blocking`.
    pub fn with_conn_sync<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: FnOnce(&Connection) -> CortexResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }

    /// Like [`Self::with_conn_sync`] but with mutable access, for closures
    /// that open an explicit transaction.
    pub fn with_conn_mut<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: FnOnce(&mut Connection) -> CortexResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&mut guard)
    }
}
