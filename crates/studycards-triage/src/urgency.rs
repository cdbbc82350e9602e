//! Urgency bands derived from a card's status and time left until it is due.
//!
//! | status        | days remaining | band       |
//! |---------------|----------------|------------|
//! | `done`        | any            | completed  |
//! | `in_progress` | `> 15`         | normal     |
//! | `in_progress` | `(7, 15]`      | warning    |
//! | `in_progress` | `[0, 7]`       | urgent     |
//! | `in_progress` | `< 0`          | overdue    |
//! | `backlog`     | `> 15`         | normal     |
//! | `backlog`     | `[0, 15]`      | warning    |
//! | `backlog`     | `< 0`          | overdue    |

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use studycards_core::model::{Card, Status};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Width of the due-soon window, in days.
pub const DUE_SOON_DAYS: f64 = 15.0;

/// In-progress cards due within this many days are `urgent`.
pub const URGENT_DAYS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBand {
    Normal,
    Warning,
    Urgent,
    Overdue,
    Completed,
}

impl UrgencyBand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Urgent => "urgent",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fractional days from `now` until `due_at`, at millisecond resolution.
///
/// Negative once the due instant has passed. Not rounded.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn days_remaining<Tz: TimeZone>(due_at: DateTime<Utc>, now: &DateTime<Tz>) -> f64 {
    let delta = due_at.signed_duration_since(now.clone());
    delta.num_milliseconds() as f64 / MS_PER_DAY
}

/// Band for a status and a precomputed [`days_remaining`] value.
#[must_use]
pub fn band_for(status: Status, days: f64) -> UrgencyBand {
    match status {
        Status::Done => UrgencyBand::Completed,
        Status::InProgress => {
            if days > DUE_SOON_DAYS {
                UrgencyBand::Normal
            } else if days > URGENT_DAYS {
                UrgencyBand::Warning
            } else if days >= 0.0 {
                UrgencyBand::Urgent
            } else {
                UrgencyBand::Overdue
            }
        }
        Status::Backlog => {
            if days > DUE_SOON_DAYS {
                UrgencyBand::Normal
            } else if days >= 0.0 {
                UrgencyBand::Warning
            } else {
                UrgencyBand::Overdue
            }
        }
    }
}

/// Classify `card` relative to `now`. Pure: same inputs, same band.
#[must_use]
pub fn classify<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> UrgencyBand {
    band_for(card.status, days_remaining(card.due_at, now))
}

/// Backlog cards that are due within the window or already late get an
/// attention marker in list views.
#[must_use]
pub fn needs_attention<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> bool {
    card.status == Status::Backlog && days_remaining(card.due_at, now) <= DUE_SOON_DAYS
}
