//! `sc start`: move a backlog card to in progress.

use crate::cmd::{write_card_detail, write_card_row};
use crate::context::{self, Context, card_id};
use crate::output::{card_failure, render_mode};
use clap::Args;
use studycards_triage::{ClassifiedCard, advance_to_in_progress};

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Card ID (the `sc-` prefix is optional).
    pub id: String,
}

pub fn run_start(args: &StartArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut service = ctx.open_service()?;
    let id = card_id(&args.id);
    let card = advance_to_in_progress(&mut service, &id).map_err(|e| card_failure(ctx.output, e))?;
    let classified = ClassifiedCard::new(card, &context::now());

    render_mode(
        ctx.output,
        &classified,
        |c, w| write_card_row(w, c),
        |c, w| {
            writeln!(w, "✓ Started {}", c.card.id)?;
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
        args: StartArgs,
    }

    #[test]
    fn start_args_parse() {
        let w = Wrapper::parse_from(["test", "sc-0123456789"]);
        assert_eq!(w.args.id, "sc-0123456789");
    }
}
