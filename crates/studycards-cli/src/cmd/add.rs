//! `sc add`: create a card.

use crate::cmd::{due_from_flag, write_card_detail, write_card_row};
use crate::context::{self, Context};
use crate::output::{card_failure, render_mode};
use clap::Args;
use studycards_core::model::{CardDraft, Status};
use studycards_triage::ClassifiedCard;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Card title.
    pub title: String,

    /// Free-form notes.
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Initial status: backlog, in_progress, done.
    #[arg(short, long, default_value = "backlog")]
    pub status: Status,

    /// Due date: RFC 3339, `YYYY-MM-DD HH:MM`, `YYYY-MM-DD`, or `+3d` / `+4h`.
    /// Defaults to now.
    #[arg(short, long)]
    pub due: Option<String>,
}

pub fn run_add(args: &AddArgs, ctx: &Context) -> anyhow::Result<()> {
    let due_at = due_from_flag(ctx, args.due.as_deref())?;
    let mut service = ctx.open_service()?;

    let mut draft = CardDraft::new(args.title.clone()).with_status(args.status);
    draft.notes.clone_from(&args.notes);
    draft.due_at = due_at;

    let card = service
        .add(draft)
        .map_err(|e| card_failure(ctx.output, e))?;
    let classified = ClassifiedCard::new(card, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| {
            writeln!(w, "✓ Added {}", c.card.id)?;
            write_card_detail(w, c)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AddArgs,
    }

    #[test]
    fn add_args_defaults() {
        let w = Wrapper::parse_from(["test", "Irregular verbs"]);
        assert_eq!(w.args.title, "Irregular verbs");
        assert_eq!(w.args.status, Status::Backlog);
        assert!(w.args.notes.is_none());
        assert!(w.args.due.is_none());
    }

    #[test]
    fn add_args_accept_status_aliases() {
        let w = Wrapper::parse_from(["test", "x", "--status", "in-progress", "--due", "+3d"]);
        assert_eq!(w.args.status, Status::InProgress);
        assert_eq!(w.args.due.as_deref(), Some("+3d"));
    }

    #[test]
    fn add_args_reject_unknown_status() {
        assert!(Wrapper::try_parse_from(["test", "x", "--status", "archived"]).is_err());
    }
}
