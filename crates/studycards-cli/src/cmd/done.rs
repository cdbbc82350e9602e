//! `sc done`: complete an open card.

use crate::cmd::{confirm, write_card_detail, write_card_row};
use crate::context::{self, Context, card_id};
use crate::output::{card_failure, render_mode, render_success};
use clap::Args;
use studycards_core::error::CardError;
use studycards_triage::{ClassifiedCard, mark_done};

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Card ID (the `sc-` prefix is optional).
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run_done(args: &DoneArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut service = ctx.open_service()?;
    let id = card_id(&args.id);

    if !args.yes {
        let title = service
            .get(&id)
            .map(|card| card.title.clone())
            .ok_or_else(|| card_failure(ctx.output, CardError::not_found(&id)))?;
        if !confirm(ctx.output, &format!("Mark '{title}' as done?"))? {
            return render_success(ctx.output, "Cancelled.");
        }
    }

    let card = mark_done(&mut service, &id).map_err(|e| card_failure(ctx.output, e))?;
    let classified = ClassifiedCard::new(card, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| {
            writeln!(w, "✓ Completed {}", c.card.id)?;
            write_card_detail(w, c)
        },
    )
}
