//! `sc edit`: change a card's fields, including moving it back a column.

use crate::cmd::{due_from_flag, write_card_detail, write_card_row};
use crate::context::{self, Context, card_id};
use crate::output::{CliError, card_failure, render_error, render_mode};
use clap::Args;
use studycards_core::model::{CardPatch, Status};
use studycards_triage::ClassifiedCard;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Card ID (the `sc-` prefix is optional).
    pub id: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Replace the notes.
    #[arg(short, long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,

    /// Remove the notes.
    #[arg(long)]
    pub clear_notes: bool,

    /// Set the status directly. Unlike `start`/`done`, any move is allowed.
    #[arg(short, long)]
    pub status: Option<Status>,

    /// New due date (same forms as `sc add --due`).
    #[arg(short, long)]
    pub due: Option<String>,
}

impl EditArgs {
    fn patch(&self, ctx: &Context) -> anyhow::Result<CardPatch> {
        let notes = if self.clear_notes {
            Some(None)
        } else {
            self.notes.clone().map(Some)
        };

        Ok(CardPatch {
            title: self.title.clone(),
            notes,
            status: self.status,
            due_at: due_from_flag(ctx, self.due.as_deref())?,
        })
    }
}

pub fn run_edit(args: &EditArgs, ctx: &Context) -> anyhow::Result<()> {
    let patch = args.patch(ctx)?;
    if patch.is_empty() {
        render_error(
            ctx.output,
            &CliError::new(
                "nothing to change: pass --title, --notes, --clear-notes, --status or --due",
            ),
        )?;
        anyhow::bail!("nothing to change");
    }

    let mut service = ctx.open_service()?;
    let id = card_id(&args.id);
    let card = service
        .update(&id, patch)
        .map_err(|e| card_failure(ctx.output, e))?;
    let classified = ClassifiedCard::new(card, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| {
            writeln!(w, "✓ Updated {}", c.card.id)?;
            write_card_detail(w, c)
        },
    )
}
