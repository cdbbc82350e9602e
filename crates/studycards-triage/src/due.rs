//! Due-soon filter behind the badge count and the "due soon" list.

use crate::urgency::{DUE_SOON_DAYS, days_remaining};
use chrono::{DateTime, TimeZone};
use studycards_core::model::Card;

/// Open card due between now and [`DUE_SOON_DAYS`] from now, inclusive.
///
/// Overdue and done cards are never due soon.
#[must_use]
pub fn is_due_soon<Tz: TimeZone>(card: &Card, now: &DateTime<Tz>) -> bool {
    card.status.is_open() && (0.0..=DUE_SOON_DAYS).contains(&days_remaining(card.due_at, now))
}

/// Due-soon subset of `cards`, in input order.
#[must_use]
pub fn due_soon<'a, Tz: TimeZone>(cards: &'a [Card], now: &DateTime<Tz>) -> Vec<&'a Card> {
    cards.iter().filter(|card| is_due_soon(card, now)).collect()
}

#[must_use]
pub fn due_soon_count<Tz: TimeZone>(cards: &[Card], now: &DateTime<Tz>) -> usize {
    cards.iter().filter(|card| is_due_soon(card, now)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use studycards_core::model::{CardDraft, CardId, Status};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
    }

    fn card(id: &str, status: Status, due_in: Duration) -> Card {
        Card::from_draft(
            CardId::new_unchecked(id),
            CardDraft::new(id).with_status(status).due(now() + due_in),
            now(),
        )
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        assert!(is_due_soon(&card("a", Status::Backlog, Duration::zero()), &now()));
        assert!(is_due_soon(&card("b", Status::InProgress, Duration::days(15)), &now()));
        assert!(!is_due_soon(
            &card("c", Status::Backlog, Duration::days(15) + Duration::milliseconds(1)),
            &now()
        ));
        assert!(!is_due_soon(&card("d", Status::Backlog, -Duration::milliseconds(1)), &now()));
    }

    #[test]
    fn filter_keeps_order_and_drops_done() {
        let cards = vec![
            card("late", Status::Backlog, -Duration::days(1)),
            card("soon", Status::InProgress, Duration::days(2)),
            card("done", Status::Done, Duration::days(2)),
            card("later", Status::Backlog, Duration::days(30)),
            card("next", Status::Backlog, Duration::days(10)),
        ];

        let ids: Vec<_> = due_soon(&cards, &now())
            .into_iter()
            .map(|card| card.id.as_str())
            .collect();
        assert_eq!(ids, vec!["soon", "next"]);
        assert_eq!(due_soon_count(&cards, &now()), 2);
    }

    #[test]
    fn empty_input_counts_zero() {
        assert!(due_soon(&[], &now()).is_empty());
        assert_eq!(due_soon_count(&[], &now()), 0);
    }
}
