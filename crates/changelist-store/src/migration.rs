//! Schema versioning for the SQLite changelist.
//!
//! The schema version lives in SQLite's own `user_version` header field,
//! so no bookkeeping table is needed. `MIGRATIONS[i]` takes the schema
//! from version `i` to `i + 1`.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{ChangelistError, Result};

const MIGRATIONS: &[&str] = &[
    // v1: staged changes. The ordering key already carries the creation
    // time, so there is no separate timestamp column.
    "CREATE TABLE changes (
        key  TEXT PRIMARY KEY,
        body BLOB NOT NULL
    );",
];

/// Schema version this build writes.
pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`SCHEMA_VERSION`].
///
/// Safe to call on an up-to-date database. A database written by a newer
/// build is rejected rather than modified.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    let found: u32 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if found > SCHEMA_VERSION {
        return Err(ChangelistError::Migration(format!(
            "schema version {found} is newer than {SCHEMA_VERSION}"
        )));
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    for sql in &MIGRATIONS[found as usize..] {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    debug!(from = found, to = SCHEMA_VERSION, "migrated changelist schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_version(conn: &Connection) -> u32 {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_fresh_database_gets_current_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        assert_eq!(user_version(&conn), SCHEMA_VERSION);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'changes'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_migrate_twice_keeps_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute("INSERT INTO changes (key, body) VALUES ('k', x'00')", [])
            .unwrap();

        migrate(&mut conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM changes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();

        assert!(matches!(
            migrate(&mut conn),
            Err(ChangelistError::Migration(_))
        ));
        // Left untouched.
        assert_eq!(user_version(&conn), SCHEMA_VERSION + 1);
    }
}
