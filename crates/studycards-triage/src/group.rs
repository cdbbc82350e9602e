//! Calendar grouping for the "upcoming" view.
//!
//! Dates are compared in the time zone of the reference instant, so the same
//! card can be "tomorrow" for one user and "today" for another.
//!
//! - `today`: due on the same calendar date as `now`
//! - `tomorrow`: due on the calendar date after `now`'s
//! - `next_7_days`: anything else due at most 7 days after `now`
//!
//! Done cards and cards further out are left out. Cards that are already
//! overdue from an earlier date satisfy the `next_7_days` test as well; that
//! is kept unless [`BucketPolicy::include_overdue`] is switched off.

use crate::urgency::days_remaining;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use studycards_core::model::Card;

/// Upper bound, in days, of the `next_7_days` bucket.
pub const UPCOMING_DAYS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Today,
    Tomorrow,
    Next7Days,
}

impl Bucket {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Next7Days => "Next 7 days",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketPolicy {
    /// Let overdue cards from earlier dates fall into `next_7_days`.
    pub include_overdue: bool,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            include_overdue: true,
        }
    }
}

impl BucketPolicy {
    #[must_use]
    pub const fn excluding_overdue() -> Self {
        Self {
            include_overdue: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBuckets {
    pub today: Vec<Card>,
    pub tomorrow: Vec<Card>,
    pub next_7_days: Vec<Card>,
}

impl DateBuckets {
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &[Card] {
        match bucket {
            Bucket::Today => &self.today,
            Bucket::Tomorrow => &self.tomorrow,
            Bucket::Next7Days => &self.next_7_days,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.today.len() + self.tomorrow.len() + self.next_7_days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[Card])> {
        [Bucket::Today, Bucket::Tomorrow, Bucket::Next7Days]
            .into_iter()
            .map(|bucket| (bucket, self.get(bucket)))
            .filter(|(_, cards)| !cards.is_empty())
    }

    fn push(&mut self, bucket: Bucket, card: Card) {
        match bucket {
            Bucket::Today => self.today.push(card),
            Bucket::Tomorrow => self.tomorrow.push(card),
            Bucket::Next7Days => self.next_7_days.push(card),
        }
    }
}

/// Bucket for a single card, or `None` if it belongs in no bucket.
#[must_use]
pub fn bucket_for<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>, policy: BucketPolicy) -> Option<Bucket> {
    if !card.status.is_open() {
        return None;
    }

    let today = now.date_naive();
    let due_date = card.due_at.with_timezone(&now.timezone()).date_naive();
    if due_date == today {
        return Some(Bucket::Today);
    }
    // next calendar date, not now + 24h: DST days are 23 or 25 hours long
    if today.succ_opt() == Some(due_date) {
        return Some(Bucket::Tomorrow);
    }

    let days = days_remaining(card.due_at, now);
    if days > UPCOMING_DAYS || (days < 0.0 && !policy.include_overdue) {
        return None;
    }
    Some(Bucket::Next7Days)
}

/// Group open cards by due date relative to `now`. Input order is kept
/// inside each bucket.
#[must_use]
pub fn group_by_date<Tz: TimeZone>(cards: &[Card], now: &DateTime<Tz>, policy: BucketPolicy) -> DateBuckets {
    let mut buckets = DateBuckets::default();
    for card in cards {
        if let Some(bucket) = bucket_for(card, now, policy) {
            buckets.push(bucket, card.clone());
        }
    }
    buckets
}
