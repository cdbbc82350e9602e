//! Persistence collaborator contract and its SQLite implementation.
//!
//! The in-memory store never talks to storage directly; the session service
//! calls a [`CardRepository`] first and only touches the store once the write
//! has been acknowledged.

pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteCardRepository;

use crate::error::ErrorCode;
use crate::identity::Identity;
use crate::model::card::{Card, CardId};

/// Failure reported by a [`CardRepository`].
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// SQLite rejected the statement.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be decoded back into a card.
    #[error("corrupt card record {card_id}: {reason}")]
    Corrupt { card_id: String, reason: String },

    /// The file was written by a newer build.
    #[error("card database schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// The record to save or delete is not in storage for this owner.
    #[error("card {id} is not stored for this user")]
    MissingRecord { id: CardId },
}

impl PersistenceError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Sqlite(_) | Self::MissingRecord { .. } => ErrorCode::StorageWriteFailed,
            Self::Io(_) | Self::UnsupportedSchema { .. } => ErrorCode::StorageOpenFailed,
            Self::Corrupt { .. } => ErrorCode::CorruptRecord,
        }
    }
}

pub type PersistResult<T> = Result<T, PersistenceError>;

/// Persistence service for cards, scoped per owner.
pub trait CardRepository {
    /// All cards of `owner`, in creation order.
    fn load_all(&self, owner: &Identity) -> PersistResult<Vec<Card>>;

    /// Store a new card and return it as persisted.
    fn create(&self, owner: &Identity, card: &Card) -> PersistResult<Card>;

    /// Overwrite the stored fields of an existing card.
    fn save(&self, owner: &Identity, card: &Card) -> PersistResult<()>;

    /// Remove a card permanently.
    fn delete(&self, owner: &Identity, id: &CardId) -> PersistResult<()>;
}

impl<R: CardRepository + ?Sized> CardRepository for &R {
    fn load_all(&self, owner: &Identity) -> PersistResult<Vec<Card>> {
        (**self).load_all(owner)
    }

    fn create(&self, owner: &Identity, card: &Card) -> PersistResult<Card> {
        (**self).create(owner, card)
    }

    fn save(&self, owner: &Identity, card: &Card) -> PersistResult<()> {
        (**self).save(owner, card)
    }

    fn delete(&self, owner: &Identity, id: &CardId) -> PersistResult<()> {
        (**self).delete(owner, id)
    }
}
