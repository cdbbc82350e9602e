//! `sc delete`: remove a card permanently.

use crate::cmd::{confirm, write_card_row};
use crate::context::{self, Context, card_id};
use crate::output::{card_failure, render_mode, render_success};
use clap::Args;
use studycards_core::error::CardError;
use studycards_triage::ClassifiedCard;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Card ID (the `sc-` prefix is optional).
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub force: bool,
}

pub fn run_delete(args: &DeleteArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut service = ctx.open_service()?;
    let id = card_id(&args.id);

    let title = service
        .get(&id)
        .map(|card| card.title.clone())
        .ok_or_else(|| card_failure(ctx.output, CardError::not_found(&id)))?;
    if !args.force && !confirm(ctx.output, &format!("Delete card '{title}'?"))? {
        return render_success(ctx.output, "Cancelled.");
    }

    let removed = service.remove(&id).map_err(|e| card_failure(ctx.output, e))?;
    let classified = ClassifiedCard::new(removed, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| writeln!(w, "✓ Deleted {} ({})", c.card.id, c.card.title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: DeleteArgs,
    }

    #[test]
    fn delete_args_parse() {
        let w = Wrapper::parse_from(["test", "abc", "--force"]);
        assert_eq!(w.args.id, "abc");
        assert!(w.args.force);
    }
}
