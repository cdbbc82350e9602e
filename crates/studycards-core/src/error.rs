use crate::model::card::{CardId, InvalidTransition};
use crate::persist::PersistenceError;
use crate::validate::ValidationError;
use std::fmt;

/// Machine-readable error codes for scripts and front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    IdentityMissing,
    CardNotFound,
    InvalidStateTransition,
    DuplicateCardId,
    ValidationFailed,
    InvalidDueDate,
    CorruptRecord,
    StorageOpenFailed,
    StorageWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::IdentityMissing => "E1004",
            Self::CardNotFound => "E2001",
            Self::InvalidStateTransition => "E2002",
            Self::DuplicateCardId => "E2003",
            Self::ValidationFailed => "E2006",
            Self::InvalidDueDate => "E2007",
            Self::CorruptRecord => "E3003",
            Self::StorageOpenFailed => "E5001",
            Self::StorageWriteFailed => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::IdentityMissing => "No user identity",
            Self::CardNotFound => "Card not found",
            Self::InvalidStateTransition => "Invalid status transition",
            Self::DuplicateCardId => "Duplicate card ID",
            Self::ValidationFailed => "Required field left blank",
            Self::InvalidDueDate => "Invalid due date",
            Self::CorruptRecord => "Corrupt stored card",
            Self::StorageOpenFailed => "Card database could not be opened",
            Self::StorageWriteFailed => "Card database write failed",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in studycards/config.toml and retry."),
            Self::IdentityMissing => Some("Pass --user or set STUDYCARDS_USER."),
            Self::CardNotFound => Some("Run `sc list` to see current card IDs."),
            Self::InvalidStateTransition => Some(
                "Follow backlog -> in_progress -> done, or use `sc edit --status` to correct.",
            ),
            Self::DuplicateCardId => None,
            Self::ValidationFailed => Some("Fill in the marked fields and save again."),
            Self::InvalidDueDate => {
                Some("Use RFC 3339, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD`, or `+3d` / `+4h`.")
            }
            Self::CorruptRecord => Some("Inspect the card database; the row failed to decode."),
            Self::StorageOpenFailed => Some("Check the --db path and its directory permissions."),
            Self::StorageWriteFailed => {
                Some("Nothing was changed locally. Retry; check disk space and permissions.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure of a card operation. None of these are fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// A mutating operation referenced an id the store does not hold.
    #[error("card not found: {id}")]
    NotFound { id: CardId },

    /// A required field was blank at save time.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle action was not allowed from the card's current status.
    #[error("{id}: {source}")]
    InvalidTransition {
        id: CardId,
        #[source]
        source: InvalidTransition,
    },

    /// An insert or reload carried an id that is already present.
    #[error("duplicate card id: {id}")]
    DuplicateId { id: CardId },

    /// The persistence collaborator rejected the write.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CardError {
    pub fn not_found(id: &CardId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::CardNotFound,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            Self::DuplicateId { .. } => ErrorCode::DuplicateCardId,
            Self::Persistence(err) => err.code(),
        }
    }

    /// Persistence failures may succeed on retry; everything else needs
    /// different input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Remediation hint suitable for a one-line suggestion.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.code()
            .hint()
            .unwrap_or_else(|| self.code().message())
            .to_string()
    }
}
