//! Status board: one column per lifecycle state.

use serde::{Deserialize, Serialize};
use studycards_core::model::{Card, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub backlog: Vec<Card>,
    pub in_progress: Vec<Card>,
    pub done: Vec<Card>,
}

impl Board {
    /// Partition `cards` by status, preserving order within each column.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut board = Self::default();
        for card in cards {
            board.column_mut(card.status).push(card.clone());
        }
        board
    }

    #[must_use]
    pub fn column(&self, status: Status) -> &[Card] {
        match status {
            Status::Backlog => &self.backlog,
            Status::InProgress => &self.in_progress,
            Status::Done => &self.done,
        }
    }

    /// `(status, count)` for every column, in board order.
    #[must_use]
    pub fn counts(&self) -> [(Status, usize); 3] {
        Status::ALL.map(|status| (status, self.column(status).len()))
    }

    const fn column_mut(&mut self, status: Status) -> &mut Vec<Card> {
        match status {
            Status::Backlog => &mut self.backlog,
            Status::InProgress => &mut self.in_progress,
            Status::Done => &mut self.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studycards_core::model::{CardDraft, CardId};

    fn card(id: &str, status: Status) -> Card {
        Card::from_draft(
            CardId::new_unchecked(id),
            CardDraft::new(id).with_status(status),
            Utc::now(),
        )
    }

    #[test]
    fn partitions_and_keeps_order() {
        let cards = vec![
            card("a", Status::Done),
            card("b", Status::Backlog),
            card("c", Status::InProgress),
            card("d", Status::Backlog),
        ];
        let board = Board::from_cards(&cards);

        let ids = |status| {
            board
                .column(status)
                .iter()
                .map(|card| card.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(Status::Backlog), vec!["b", "d"]);
        assert_eq!(ids(Status::InProgress), vec!["c"]);
        assert_eq!(ids(Status::Done), vec!["a"]);
        assert_eq!(
            board.counts(),
            [(Status::Backlog, 2), (Status::InProgress, 1), (Status::Done, 1)]
        );
    }
}
