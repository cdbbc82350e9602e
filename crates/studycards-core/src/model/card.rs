use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Prefix shared by every card identifier.
pub const CARD_ID_PREFIX: &str = "sc-";

/// Number of hex characters following [`CARD_ID_PREFIX`].
const CARD_ID_HEX_LEN: usize = 10;

/// Stable identifier for one card. Assigned by the store, never changed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Generate a fresh random identifier (`sc-` + 10 hex chars).
    #[must_use]
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{CARD_ID_PREFIX}{}", &raw[..CARD_ID_HEX_LEN]))
    }

    /// Wrap an identifier read back from storage or typed by a user.
    ///
    /// No format check is applied; unknown ids simply fail lookups.
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The three lifecycle states of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Backlog,
    InProgress,
    Done,
}

impl Status {
    /// Every status, in board column order.
    pub const ALL: [Self; 3] = [Self::Backlog, Self::InProgress, Self::Done];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Column heading used by human-facing views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }

    /// `true` for backlog and in-progress cards.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Done)
    }
}

/// One study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub due_at: DateTime<Utc>,
}

impl Card {
    /// Build a card from a draft, defaulting `due_at` to `created_at`.
    #[must_use]
    pub fn from_draft(id: CardId, draft: CardDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            notes: draft.notes,
            status: draft.status,
            due_at: draft.due_at.unwrap_or(created_at),
        }
    }

    /// Merge a patch into this card. The id is never touched.
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
    }

    /// Copy of this card with `patch` applied.
    #[must_use]
    pub fn patched(&self, patch: CardPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// A card that has not been given an id yet (the edit form's output).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDraft {
    pub title: String,
    pub notes: Option<String>,
    pub status: Status,
    pub due_at: Option<DateTime<Utc>>,
}

impl CardDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

/// Partial update. `None` fields are left untouched; `notes: Some(None)`
/// clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub status: Option<Status>,
    pub due_at: Option<DateTime<Utc>>,
}

impl CardPatch {
    #[must_use]
    pub const fn status(status: Status) -> Self {
        Self {
            title: None,
            notes: None,
            status: Some(status),
            due_at: None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.notes.is_none() && self.status.is_none() && self.due_at.is_none()
    }
}

/// Forward lifecycle actions exposed as first-class operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// `backlog -> in_progress`.
    Start,
    /// any open status `-> done`.
    Complete,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
        }
    }

    #[must_use]
    pub const fn target(self) -> Status {
        match self {
            Self::Start => Status::InProgress,
            Self::Complete => Status::Done,
        }
    }

    /// Check whether this action may run on a card currently in `from`.
    ///
    /// Valid transitions:
    /// - `backlog -> in_progress` (start)
    /// - `backlog -> done` (complete)
    /// - `in_progress -> done` (complete)
    ///
    /// Backward moves only happen through a plain status edit.
    pub const fn check(self, from: Status) -> Result<Status, InvalidTransition> {
        let allowed = match self {
            Self::Start => matches!(from, Status::Backlog),
            Self::Complete => from.is_open(),
        };

        if allowed {
            Ok(self.target())
        } else {
            Err(InvalidTransition {
                from,
                action: self,
                reason: match self {
                    Self::Start => "only backlog cards can be started",
                    Self::Complete => "card is already done",
                },
            })
        }
    }
}

/// Error returned when a lifecycle action is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: Status,
    pub action: Action,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot {} a card in '{}': {}",
            self.action, self.from, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "in_progress" | "doing" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}
