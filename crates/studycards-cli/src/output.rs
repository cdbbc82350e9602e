//! How `sc` writes results and failures.
//!
//! Results go to stdout and failures to stderr. `--format` picks the mode;
//! without it, `main` passes down the name already settled from `--json`,
//! `FORMAT`, the config file and whether stdout is a terminal.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use studycards_core::error::CardError;

/// Rendering style for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections, markers and local times for a person at a terminal.
    Pretty,
    /// Tab-separated rows for `cut`, `awk` and friends.
    Text,
    /// Pretty-printed JSON documents.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Text,
        }
    }
}

pub fn resolve_output_mode(format_flag: Option<OutputMode>, resolved: &str) -> OutputMode {
    format_flag.unwrap_or_else(|| OutputMode::from_name(resolved))
}

/// Heading underlined to the width of a card line.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}\n{}", "-".repeat(72))
}

/// `Key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// A failure as shown to the user. JSON output nests it under `"error"`.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// `E####` code from [`studycards_core::error::ErrorCode`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
            ..Self::new(message)
        }
    }
}

impl From<&CardError> for CliError {
    fn from(err: &CardError) -> Self {
        Self::with_details(err.to_string(), err.suggestion(), err.code().code())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a CliError,
}

#[derive(Serialize)]
struct Ack<'a> {
    ok: bool,
    message: &'a str,
}

fn write_json(out: &mut dyn Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn write_value<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_json(out, value),
        OutputMode::Text => text_fn(value, out),
        OutputMode::Pretty => pretty_fn(value, out),
    }
}

/// Write `value` to stdout: serialized in JSON mode, otherwise through the
/// renderer for the mode.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    write_value(&mut io::stdout().lock(), mode, value, text_fn, pretty_fn)?;
    Ok(())
}

/// [`render_mode`] with one renderer for both human modes.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl Fn(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    render_mode(mode, value, &human_fn, &human_fn)
}

fn write_success(out: &mut dyn Write, mode: OutputMode, message: &str) -> io::Result<()> {
    let ack = Ack { ok: true, message };
    let human = |ack: &Ack<'_>, w: &mut dyn Write| writeln!(w, "✓ {}", ack.message);
    write_value(out, mode, &ack, human, human)
}

/// One-line confirmation on stdout, or `{"ok": true, ...}` in JSON mode.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    write_success(&mut io::stdout().lock(), mode, message)?;
    Ok(())
}

fn write_error(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> io::Result<()> {
    if mode.is_json() {
        return write_json(out, &ErrorBody { error });
    }
    writeln!(out, "error: {}", error.message)?;
    if let Some(suggestion) = &error.suggestion {
        writeln!(out, "  suggestion: {suggestion}")?;
    }
    Ok(())
}

/// Write `error` to stderr.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    write_error(&mut io::stderr().lock(), mode, error)?;
    Ok(())
}

/// Report a failed card operation and return it for `?`.
pub fn card_failure(mode: OutputMode, err: CardError) -> anyhow::Error {
    if let Err(render_err) = render_error(mode, &CliError::from(&err)) {
        tracing::warn!(error = %render_err, "failed to render error");
    }
    anyhow::Error::new(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use studycards_core::model::{Action, CardId, Status};

    fn written(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn format_flag_wins_over_resolved_value() {
        assert_eq!(
            resolve_output_mode(Some(OutputMode::Text), "json"),
            OutputMode::Text
        );
    }

    #[test]
    fn resolved_value_used_without_flag() {
        assert_eq!(resolve_output_mode(None, "json"), OutputMode::Json);
        assert_eq!(resolve_output_mode(None, "pretty"), OutputMode::Pretty);
        assert_eq!(resolve_output_mode(None, "text"), OutputMode::Text);
        assert!(resolve_output_mode(None, "json").is_json());
    }

    #[test]
    fn cli_error_from_card_error_carries_code_and_hint() {
        let err = CardError::InvalidTransition {
            id: CardId::new_unchecked("sc-1"),
            source: Action::Start.check(Status::Done).unwrap_err(),
        };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2002"));
        assert!(cli.message.contains("sc-1"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn json_error_is_nested_under_error() {
        let err = CliError::with_details("card not found: sc-x", "Run `sc list`", "E2001");
        let text = written(|w| write_error(w, OutputMode::Json, &err));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"]["error_code"], "E2001");
        assert_eq!(value["error"]["message"], "card not found: sc-x");
    }

    #[test]
    fn text_error_without_suggestion_is_one_line() {
        let text = written(|w| write_error(w, OutputMode::Text, &CliError::new("boom")));
        assert_eq!(text, "error: boom\n");
    }

    #[test]
    fn each_human_mode_uses_its_own_renderer() {
        let text_fn = |n: &u32, w: &mut dyn Write| writeln!(w, "{n}");
        let pretty_fn = |n: &u32, w: &mut dyn Write| writeln!(w, "count: {n}");

        assert_eq!(
            written(|w| write_value(w, OutputMode::Text, &3, text_fn, pretty_fn)),
            "3\n"
        );
        assert_eq!(
            written(|w| write_value(w, OutputMode::Pretty, &3, text_fn, pretty_fn)),
            "count: 3\n"
        );
        assert_eq!(
            written(|w| write_value(w, OutputMode::Json, &3, text_fn, pretty_fn)),
            "3\n"
        );
    }

    #[test]
    fn success_is_a_check_line_or_an_ok_document() {
        assert_eq!(
            written(|w| write_success(w, OutputMode::Pretty, "Cancelled.")),
            "✓ Cancelled.\n"
        );

        let json = written(|w| write_success(w, OutputMode::Json, "Cancelled."));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["message"], "Cancelled.");
    }
}
