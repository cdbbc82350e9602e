pub mod add;
pub mod completions;
pub mod delete;
pub mod done;
pub mod due;
pub mod edit;
pub mod list;
pub mod show;
pub mod start;

use crate::context::{self, Context};
use crate::due_input::parse_due;
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error};
use chrono::{DateTime, Local, Utc};
use std::io::{self, IsTerminal, Write};
use studycards_core::error::ErrorCode;
use studycards_triage::{ClassifiedCard, UrgencyBand};

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// `!` for cards that need attention, blank otherwise.
const fn marker(card: &ClassifiedCard) -> &'static str {
    if card.needs_attention { "!" } else { " " }
}

fn days_label(card: &ClassifiedCard) -> String {
    match card.band {
        UrgencyBand::Completed => "done".to_string(),
        UrgencyBand::Overdue => format!("{:.1}d late", -card.days_remaining),
        _ => format!("{:.1}d left", card.days_remaining),
    }
}

/// Tab-separated row: id, status, band, due (RFC 3339), title.
pub fn write_card_row(w: &mut dyn Write, card: &ClassifiedCard) -> io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}",
        card.card.id,
        card.card.status,
        card.band,
        card.card.due_at.to_rfc3339(),
        card.card.title
    )
}

/// One-line human summary with the attention marker.
pub fn write_card_line(w: &mut dyn Write, card: &ClassifiedCard) -> io::Result<()> {
    writeln!(
        w,
        "{} {:<14} {:<32} {:<11} {}  {:<8} {}",
        marker(card),
        card.card.id.as_str(),
        card.card.title,
        card.card.status.label(),
        local_time(card.card.due_at),
        card.band.as_str(),
        days_label(card)
    )
}

/// Full human detail view of one card.
pub fn write_card_detail(w: &mut dyn Write, card: &ClassifiedCard) -> io::Result<()> {
    pretty_section(w, &format!("{} {}", card.card.id, card.card.title))?;
    pretty_kv(w, "Status", card.card.status.label())?;
    pretty_kv(w, "Due", local_time(card.card.due_at))?;
    pretty_kv(w, "Urgency", format!("{} ({})", card.band, days_label(card)))?;
    if card.due_soon {
        pretty_kv(w, "Due soon", "yes")?;
    }
    if card.needs_attention {
        pretty_kv(w, "Attention", "backlog card close to or past its due date")?;
    }
    if let Some(notes) = card.card.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        writeln!(w)?;
        writeln!(w, "{notes}")?;
    }
    Ok(())
}

/// Resolve `--due` against the current local time.
///
/// # Errors
///
/// Renders and returns an error when the value cannot be parsed.
pub fn due_from_flag(ctx: &Context, raw: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    parse_due(raw, &context::now()).map(Some).map_err(|e| {
        let code = ErrorCode::InvalidDueDate;
        if let Err(render_err) = render_error(
            ctx.output,
            &CliError::with_details(e.to_string(), code.hint().unwrap_or_default(), code.code()),
        ) {
            tracing::warn!(error = %render_err, "failed to render error");
        }
        anyhow::Error::new(e)
    })
}

/// Ask a yes/no question on stderr. JSON mode and non-interactive sessions
/// answer yes.
pub fn confirm(mode: OutputMode, prompt: &str) -> io::Result<bool> {
    if mode.is_json() || !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Ok(true);
    }

    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
