//! `sc list`: every card of the signed-in user, annotated with urgency.

use crate::cmd::{write_card_line, write_card_row};
use crate::context::{self, Context};
use crate::output::{pretty_section, render_mode};
use clap::Args;
use serde::Serialize;
use studycards_core::model::Status;
use studycards_triage::{Board, ClassifiedCard};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only show cards with this status.
    #[arg(short, long)]
    pub status: Option<Status>,

    /// Group cards into backlog / in progress / done columns.
    #[arg(long)]
    pub board: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    cards: Vec<ClassifiedCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Board>,
}

pub fn run_list(args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.open_service()?;
    let now = context::now();

    let cards: Vec<_> = service
        .store()
        .cards()
        .iter()
        .filter(|card| args.status.is_none_or(|status| card.status == status))
        .cloned()
        .collect();
    tracing::debug!(count = cards.len(), filter = ?args.status, "listing cards");

    let output = ListOutput {
        board: args.board.then(|| Board::from_cards(&cards)),
        cards: cards
            .into_iter()
            .map(|card| ClassifiedCard::new(card, &now))
            .collect(),
    };

    render_mode(
        ctx.output,
        &output,
        |out, w| {
            for card in &out.cards {
                write_card_row(w, card)?;
            }
            Ok(())
        },
        |out, w| {
            if out.cards.is_empty() {
                return writeln!(w, "No cards.");
            }

            if out.board.is_none() {
                for card in &out.cards {
                    write_card_line(w, card)?;
                }
                return Ok(());
            }

            for status in Status::ALL {
                let column: Vec<_> = out.cards.iter().filter(|c| c.card.status == status).collect();
                pretty_section(w, &format!("{} ({})", status.label(), column.len()))?;
                for card in column {
                    write_card_line(w, card)?;
                }
                writeln!(w)?;
            }
            Ok(())
        },
    )
}
