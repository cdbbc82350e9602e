//! `sc show`: one card in full.

use crate::cmd::{write_card_detail, write_card_row};
use crate::context::{self, Context, card_id};
use crate::output::{card_failure, render_mode};
use clap::Args;
use studycards_core::error::CardError;
use studycards_triage::ClassifiedCard;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Card ID (the `sc-` prefix is optional).
    pub id: String,
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.open_service()?;
    let id = card_id(&args.id);
    let card = service
        .get(&id)
        .cloned()
        .ok_or_else(|| card_failure(ctx.output, CardError::not_found(&id)))?;
    let classified = ClassifiedCard::new(card, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| write_card_detail(w, c),
    )
}
