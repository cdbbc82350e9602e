//! studycards-core library.
//!
//! Card model, the in-memory store, save-time validation, and the SQLite
//! persistence layer. Triage (urgency, due-soon, grouping) lives in
//! `studycards-triage` and only reads from here.
//!
//! # Conventions
//!
//! - **Errors**: Card operations return [`CardError`]; config loading uses
//!   `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod validate;

pub use error::CardError;
pub use store::{CardMutator, CardStore};
