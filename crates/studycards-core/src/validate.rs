//! Save-time field validation for the edit form.
//!
//! The store itself accepts blank titles and notes; these rules run in front
//! of it, before anything is written.

use crate::model::card::Card;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A card field that validation can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Notes,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more required fields were blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required field(s) left blank: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<Field>,
}

impl ValidationError {
    #[must_use]
    pub const fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn flags(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which fields must be non-blank at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default = "default_true")]
    pub require_title: bool,
    #[serde(default)]
    pub require_notes: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            require_title: true,
            require_notes: false,
        }
    }
}

impl ValidationRules {
    /// Accept everything (the earliest form behaviour).
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            require_title: false,
            require_notes: false,
        }
    }

    /// Title and notes both required.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            require_title: true,
            require_notes: true,
        }
    }

    /// Check a candidate card, reporting every blank required field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing each offending field.
    pub fn check(&self, card: &Card) -> Result<(), ValidationError> {
        let mut fields = Vec::new();

        if self.require_title && is_blank(&card.title) {
            fields.push(Field::Title);
        }
        if self.require_notes && card.notes.as_deref().is_none_or(is_blank) {
            fields.push(Field::Notes);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(fields))
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

const fn default_true() -> bool {
    true
}
