//! SQLite-backed [`CardRepository`].
//!
//! Connection defaults follow the rest of the stack:
//! - `journal_mode = WAL` so a reader never blocks on a writer
//! - `busy_timeout = 5s` to ride out a second `sc` process
//! - `foreign_keys = ON`

use super::{CardRepository, PersistResult, PersistenceError, migrations};
use crate::identity::Identity;
use crate::model::card::{Card, CardId, Status};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Busy timeout used for card database connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CARD_SELECT_SQL: &str = "SELECT
    card_id,
    title,
    notes,
    status,
    due_at_us
FROM cards";

/// Card repository over one SQLite database file.
#[derive(Debug)]
pub struct SqliteCardRepository {
    conn: Connection,
}

impl SqliteCardRepository {
    /// Open (or create) the card database at `path`, apply runtime pragmas,
    /// and upgrade the schema to the current version.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or opening,
    /// configuring, or upgrading the database fails.
    pub fn open(path: &Path) -> PersistResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened card database");
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot create or upgrade the database.
    pub fn open_in_memory() -> PersistResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> PersistResult<Self> {
        configure_connection(&conn)?;
        migrations::upgrade(&mut conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

struct RawCard {
    card_id: String,
    title: String,
    notes: Option<String>,
    status: String,
    due_at_us: i64,
}

impl RawCard {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            card_id: row.get(0)?,
            title: row.get(1)?,
            notes: row.get(2)?,
            status: row.get(3)?,
            due_at_us: row.get(4)?,
        })
    }

    fn into_card(self) -> PersistResult<Card> {
        let status = Status::from_str(&self.status).map_err(|err| PersistenceError::Corrupt {
            card_id: self.card_id.clone(),
            reason: err.to_string(),
        })?;
        let due_at = DateTime::<Utc>::from_timestamp_micros(self.due_at_us).ok_or_else(|| {
            PersistenceError::Corrupt {
                card_id: self.card_id.clone(),
                reason: format!("due_at_us out of range: {}", self.due_at_us),
            }
        })?;

        Ok(Card {
            id: CardId::new_unchecked(self.card_id),
            title: self.title,
            notes: self.notes,
            status,
            due_at,
        })
    }
}

impl CardRepository for SqliteCardRepository {
    fn load_all(&self, owner: &Identity) -> PersistResult<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE owner_id = ?1 ORDER BY card_seq ASC"))?;
        let rows = stmt.query_map(params![owner.as_str()], RawCard::from_row)?;

        let mut cards = Vec::new();
        for row in rows {
            cards.push(row?.into_card()?);
        }
        debug!(owner = %owner, count = cards.len(), "loaded cards");
        Ok(cards)
    }

    fn create(&self, owner: &Identity, card: &Card) -> PersistResult<Card> {
        let now_us = Utc::now().timestamp_micros();
        self.conn.execute(
            "INSERT INTO cards (
                card_id,
                owner_id,
                title,
                notes,
                status,
                due_at_us,
                created_at_us,
                updated_at_us
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                card.id.as_str(),
                owner.as_str(),
                card.title,
                card.notes,
                card.status.as_str(),
                card.due_at.timestamp_micros(),
                now_us,
            ],
        )?;
        Ok(card.clone())
    }

    fn save(&self, owner: &Identity, card: &Card) -> PersistResult<()> {
        let changed = self.conn.execute(
            "UPDATE cards
             SET title = ?3, notes = ?4, status = ?5, due_at_us = ?6, updated_at_us = ?7
             WHERE card_id = ?1 AND owner_id = ?2",
            params![
                card.id.as_str(),
                owner.as_str(),
                card.title,
                card.notes,
                card.status.as_str(),
                card.due_at.timestamp_micros(),
                Utc::now().timestamp_micros(),
            ],
        )?;

        if changed == 0 {
            return Err(PersistenceError::MissingRecord {
                id: card.id.clone(),
            });
        }
        Ok(())
    }

    fn delete(&self, owner: &Identity, id: &CardId) -> PersistResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM cards WHERE card_id = ?1 AND owner_id = ?2",
            params![id.as_str(), owner.as_str()],
        )?;

        if changed == 0 {
            return Err(PersistenceError::MissingRecord { id: id.clone() });
        }
        Ok(())
    }
}
