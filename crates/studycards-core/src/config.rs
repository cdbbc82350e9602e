use crate::validate::ValidationRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the database location.
pub const DB_ENV_VAR: &str = "STUDYCARDS_DB";

const DEFAULT_DB_FILE: &str = "cards.sqlite3";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardsConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub triage: TriageConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Let cards that are already overdue show up in the "next 7 days"
    /// bucket of the upcoming view.
    #[serde(default = "default_true")]
    pub overdue_in_upcoming: bool,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            overdue_in_upcoming: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Config plus every value resolved from flags and environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: CardsConfig,
    pub db_path: PathBuf,
    pub resolved_output: String,
}

/// Default config file location: `<config_dir>/studycards/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("studycards/config.toml"))
}

/// Load the config at `path`, or the default location when `None`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<CardsConfig> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        return Ok(CardsConfig::default());
    };

    if !path.exists() {
        return Ok(CardsConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CardsConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve config, database path and output mode.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or no database
/// location can be determined.
pub fn resolve_config(
    config_path: Option<&Path>,
    cli_db: Option<&Path>,
    cli_json: bool,
) -> Result<EffectiveConfig> {
    let config = load_config(config_path)?;

    let env_db = env::var_os(DB_ENV_VAR).map(PathBuf::from);
    let db_path = resolve_db_path(cli_db, env_db, config.storage.path.clone())?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, config.output.clone(), env_format);

    Ok(EffectiveConfig {
        config,
        db_path,
        resolved_output,
    })
}

fn resolve_db_path(
    cli_db: Option<&Path>,
    env_db: Option<PathBuf>,
    config_db: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = cli_db {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_db.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if let Some(path) = config_db {
        return Ok(path);
    }

    dirs::data_dir()
        .map(|dir| dir.join("studycards").join(DEFAULT_DB_FILE))
        .context("no data directory available; pass --db or set STUDYCARDS_DB")
}

fn resolve_output(cli_json: bool, user_output: Option<String>, env_format: Option<String>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}
