//! `sc due`: what needs studying soon, grouped by calendar day.

use crate::cmd::{write_card_line, write_card_row};
use crate::context::{self, Context};
use crate::output::{pretty_section, render, render_mode};
use clap::Args;
use serde::Serialize;
use studycards_triage::{BucketPolicy, ClassifiedCard, DateBuckets, TriageView};

#[derive(Args, Debug, Default)]
pub struct DueArgs {
    /// Print only the number of due-soon cards.
    #[arg(short, long, conflicts_with = "flat")]
    pub count: bool,

    /// List due-soon cards in one block instead of grouping by day.
    #[arg(long)]
    pub flat: bool,

    /// Keep cards from earlier days out of the "Next 7 days" group.
    #[arg(long)]
    pub exclude_overdue: bool,
}

#[derive(Debug, Serialize)]
struct CountOutput {
    due_soon_count: usize,
}

#[derive(Debug, Serialize)]
struct DueOutput {
    due_soon_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckets: Option<DateBuckets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_soon: Option<Vec<ClassifiedCard>>,
}

pub fn run_due(args: &DueArgs, ctx: &Context) -> anyhow::Result<()> {
    let service = ctx.open_service()?;
    let now = context::now();
    let policy = if args.exclude_overdue {
        BucketPolicy::excluding_overdue()
    } else {
        ctx.bucket_policy()
    };
    let view = TriageView::compute(service.store().cards(), &now, policy);
    tracing::debug!(
        due_soon = view.due_soon_count,
        bucketed = view.buckets.len(),
        "computed due view"
    );

    if args.count {
        let output = CountOutput {
            due_soon_count: view.due_soon_count,
        };
        return render(ctx.output, &output, |out, w| {
            writeln!(w, "{}", out.due_soon_count)
        });
    }

    let output = if args.flat {
        DueOutput {
            due_soon_count: view.due_soon_count,
            buckets: None,
            due_soon: Some(view.due_soon().cloned().collect()),
        }
    } else {
        DueOutput {
            due_soon_count: view.due_soon_count,
            buckets: Some(view.buckets),
            due_soon: None,
        }
    };

    render_mode(
        ctx.output,
        &output,
        |out, w| {
            if let Some(cards) = &out.due_soon {
                for card in cards {
                    write_card_row(w, card)?;
                }
            }
            if let Some(buckets) = &out.buckets {
                for (bucket, cards) in buckets.iter() {
                    for card in cards {
                        write!(w, "{}\t", bucket.label())?;
                        write_card_row(w, &ClassifiedCard::new(card.clone(), &now))?;
                    }
                }
            }
            Ok(())
        },
        |out, w| {
            writeln!(w, "Due soon: {}", out.due_soon_count)?;
            writeln!(w)?;

            if let Some(cards) = &out.due_soon {
                for card in cards {
                    write_card_line(w, card)?;
                }
                return Ok(());
            }

            let Some(buckets) = &out.buckets else {
                return Ok(());
            };
            if buckets.is_empty() {
                return writeln!(w, "Nothing due in the next 7 days.");
            }
            for (bucket, cards) in buckets.iter() {
                pretty_section(w, &format!("{} ({})", bucket.label(), cards.len()))?;
                for card in cards {
                    write_card_line(w, &ClassifiedCard::new(card.clone(), &now))?;
                }
                writeln!(w)?;
            }
            Ok(())
        },
    )
}
