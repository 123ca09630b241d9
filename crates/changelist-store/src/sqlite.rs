//! SQLite implementation of the Changelist trait.
//!
//! Rows are keyed by the same ordering keys the directory backend uses for
//! file names, so `ORDER BY key` is creation order. Unlike the directory
//! backend this one holds a connection, and `close` releases it.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use changelist_core::{decode_change, encode_change, Change, Clock, KeyGenerator, TufChange};

use crate::diagnostics::{Diagnostics, TracingDiagnostics, Warning};
use crate::error::{ChangelistError, Result};
use crate::migration;
use crate::traits::Changelist;

/// SQLite-backed changelist.
///
/// Thread-safe via internal Mutex. After `close`, every operation fails
/// with [`ChangelistError::Closed`] and `list` returns nothing.
pub struct SqliteChangelist<C = TufChange> {
    /// The connection; `None` once closed.
    conn: Mutex<Option<Connection>>,
    keys: KeyGenerator,
    diagnostics: Arc<dyn Diagnostics>,
    _change: PhantomData<fn() -> C>,
}

impl<C> SqliteChangelist<C> {
    /// Open a changelist database at the given path.
    ///
    /// Creates the file and runs migrations if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            keys: KeyGenerator::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            _change: PhantomData,
        }
    }

    /// Send warnings to `diagnostics` instead of `tracing`.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Generate ordering keys from `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.keys = KeyGenerator::new(clock);
        self
    }

    /// Lock the connection slot. A poisoned lock surfaces as a database
    /// error instead of a panic.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|e| {
            ChangelistError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {e}")),
            ))
        })
    }

    /// Execute an operation on the open connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.lock_conn()?;
        let conn = guard.as_ref().ok_or(ChangelistError::Closed)?;
        f(conn)
    }
}

impl<C> Changelist for SqliteChangelist<C>
where
    C: Change + Serialize + DeserializeOwned,
{
    type Change = C;

    fn add(&self, change: &C) -> Result<()> {
        let body = encode_change(change)?;
        let key = self.keys.next_key();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO changes (key, body) VALUES (?1, ?2)",
                params![key.as_str(), body],
            )?;
            Ok(())
        })?;

        debug!(%key, action = change.action(), scope = change.scope(), "staged change");
        Ok(())
    }

    fn list(&self) -> Vec<C> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, body FROM changes ORDER BY key")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        });

        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                debug!(error = %e, "changelist unreadable, listing as empty");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|(key, body)| match decode_change(&body) {
                Ok(change) => Some(change),
                Err(e) => {
                    self.diagnostics.warn(&Warning::Decode {
                        entry: key,
                        reason: e.to_string(),
                    });
                    None
                }
            })
            .collect()
    }

    fn clear(&self, archive: Option<&str>) -> Result<()> {
        if let Some(archive) = archive {
            debug!(archive, "archive hint ignored");
        }

        let removed = self.with_conn(|conn| Ok(conn.execute("DELETE FROM changes", [])?))?;
        debug!(removed, "cleared changelist");
        Ok(())
    }

    fn close(&self) -> Result<()> {
        match self.lock_conn()?.take() {
            Some(conn) => conn.close().map_err(|(_, e)| ChangelistError::Database(e)),
            None => Ok(()),
        }
    }
}
