//! User identity resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `STUDYCARDS_USER` env > `USER` env (TTY only).
//! Every command needs an identity because cards are stored per user.

use std::env;
use std::io::IsTerminal;
use studycards_core::error::ErrorCode;
use studycards_core::identity::Identity;

/// Errors from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct IdentityError {
    pub message: String,
    pub code: ErrorCode,
}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    fn is_tty(&self) -> bool {
        std::io::stdin().is_terminal()
    }
}

fn resolve_user_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(user) = cli_flag.filter(|u| !u.trim().is_empty()) {
        return Some(user.to_string());
    }

    if let Some(val) = env.get("STUDYCARDS_USER") {
        return Some(val);
    }

    // USER is only trusted for interactive sessions
    if env.is_tty() {
        return env.get("USER");
    }

    None
}

fn require_identity_with(
    cli_flag: Option<&str>,
    env: &dyn EnvReader,
) -> Result<Identity, IdentityError> {
    resolve_user_with(cli_flag, env)
        .and_then(|raw| Identity::new(raw).ok())
        .ok_or_else(|| IdentityError {
            message: "User identity required. Set --user or STUDYCARDS_USER.".to_string(),
            code: ErrorCode::IdentityMissing,
        })
}

/// Resolve the signed-in user following the chain:
///
/// 1. `--user` CLI flag
/// 2. `STUDYCARDS_USER` environment variable
/// 3. `USER` environment variable (only if stdin is a TTY)
///
/// # Errors
///
/// Returns [`IdentityError`] when no source yields a non-blank name.
pub fn require_identity(cli_flag: Option<&str>) -> Result<Identity, IdentityError> {
    require_identity_with(cli_flag, &RealEnv)
}
