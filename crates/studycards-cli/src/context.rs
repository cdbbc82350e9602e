//! Per-invocation state shared by every command handler.

use crate::identity;
use crate::output::{CliError, OutputMode, card_failure, render_error};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use studycards_core::config::CardsConfig;
use studycards_core::error::ErrorCode;
use studycards_core::model::CardId;
use studycards_core::persist::SqliteCardRepository;
use studycards_core::service::CardService;
use studycards_triage::BucketPolicy;
use tracing::debug;

pub type Service = CardService<SqliteCardRepository>;

#[derive(Debug)]
pub struct Context {
    pub output: OutputMode,
    pub config: CardsConfig,
    pub db_path: PathBuf,
    pub user_flag: Option<String>,
}

/// Reference time for triage and relative due dates.
pub fn now() -> DateTime<Local> {
    Local::now()
}

impl Context {
    pub const fn bucket_policy(&self) -> BucketPolicy {
        BucketPolicy {
            include_overdue: self.config.triage.overdue_in_upcoming,
        }
    }

    /// Resolve the user, open the database and load their cards.
    ///
    /// # Errors
    ///
    /// Renders and returns an error if no identity is available or the
    /// database cannot be opened or read.
    pub fn open_service(&self) -> anyhow::Result<Service> {
        let owner = identity::require_identity(self.user_flag.as_deref()).map_err(|e| {
            self.fail(&CliError::with_details(
                &e.message,
                e.code.hint().unwrap_or_default(),
                e.code.code(),
            ));
            anyhow::Error::new(e)
        })?;

        let repo = SqliteCardRepository::open(&self.db_path).map_err(|e| {
            let code = ErrorCode::StorageOpenFailed;
            self.fail(&CliError::with_details(
                format!("cannot open {}: {e}", self.db_path.display()),
                code.hint().unwrap_or_default(),
                code.code(),
            ));
            anyhow::Error::new(e)
        })?;
        debug!(db = %self.db_path.display(), user = %owner, "card database ready");

        CardService::load(repo, owner, self.config.validation)
            .map_err(|e| card_failure(self.output, e))
    }

    fn fail(&self, error: &CliError) {
        if let Err(render_err) = render_error(self.output, error) {
            tracing::warn!(error = %render_err, "failed to render error");
        }
    }
}

/// Normalize a user-typed id: trims whitespace and adds the `sc-` prefix
/// when it was left off.
pub fn card_id(raw: &str) -> CardId {
    let trimmed = raw.trim();
    if trimmed.starts_with(studycards_core::model::card::CARD_ID_PREFIX) {
        CardId::new_unchecked(trimmed)
    } else {
        CardId::new_unchecked(format!(
            "{}{trimmed}",
            studycards_core::model::card::CARD_ID_PREFIX
        ))
    }
}
