//! Schema upgrades keyed on `PRAGMA user_version`.
//!
//! A fresh file starts at version 0. Each entry of [`UPGRADES`] lifts the
//! database by one version inside its own transaction.

use super::{PersistResult, PersistenceError, schema};
use rusqlite::Connection;
use tracing::info;

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// `UPGRADES[n]` takes a database from version `n` to `n + 1`.
const UPGRADES: &[&str] = &[schema::CARDS_V1_SQL];

/// Version recorded in the database header.
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Bring `conn` up to [`SCHEMA_VERSION`].
///
/// Files written by a newer build are refused rather than downgraded.
///
/// # Errors
///
/// Returns an error if an upgrade fails or the file is newer than this build.
pub fn upgrade(conn: &mut Connection) -> PersistResult<u32> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (to, sql) in (1..).zip(UPGRADES).skip_while(|(to, _)| *to <= found) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", to)?;
        tx.commit()?;
        info!(from = to - 1, to, "upgraded card database schema");
    }

    Ok(SCHEMA_VERSION)
}
