#![forbid(unsafe_code)]
//! studycards-triage library.
//!
//! Pure functions over card snapshots: urgency bands, the due-soon filter,
//! calendar buckets and the status board. The reference time is always
//! passed in, never read from the clock. Lifecycle transitions go through a
//! [`CardMutator`](studycards_core::store::CardMutator).
//!
//! # Conventions
//!
//! - **Errors**: Transitions return `studycards_core::error::CardError`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod board;
pub mod due;
pub mod group;
pub mod transition;
pub mod urgency;
pub mod view;

pub use board::Board;
pub use due::{due_soon, due_soon_count, is_due_soon};
pub use group::{Bucket, BucketPolicy, DateBuckets, bucket_for, group_by_date};
pub use transition::{advance_to_in_progress, mark_done};
pub use urgency::{UrgencyBand, classify, days_remaining, needs_attention};
pub use view::{ClassifiedCard, TriageCache, TriageView};
