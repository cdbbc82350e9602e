//! In-memory card store: the session's single source of truth.
//!
//! Cards are kept in insertion order. Every mutation bumps [`CardStore::revision`]
//! and is announced to subscribers after it has been applied, so anything
//! derived from an earlier snapshot can tell it is stale.

use crate::error::CardError;
use crate::model::card::{Card, CardDraft, CardId, CardPatch};
use chrono::{SubsecRound, Utc};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Handle returned by [`CardStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added { id: CardId, revision: u64 },
    Updated { id: CardId, revision: u64 },
    Removed { id: CardId, revision: u64 },
    Reloaded { count: usize, revision: u64 },
}

impl StoreEvent {
    #[must_use]
    pub const fn revision(&self) -> u64 {
        match self {
            Self::Added { revision, .. }
            | Self::Updated { revision, .. }
            | Self::Removed { revision, .. }
            | Self::Reloaded { revision, .. } => *revision,
        }
    }
}

type Observer = Box<dyn FnMut(&StoreEvent)>;

/// Anything that can look up a card and apply a patch to it.
///
/// Implemented by the bare [`CardStore`] and by the persisting
/// [`CardService`](crate::service::CardService), so lifecycle actions can be
/// driven against either.
pub trait CardMutator {
    fn card(&self, id: &CardId) -> Option<&Card>;

    /// # Errors
    ///
    /// Returns [`CardError::NotFound`] for an unknown id, or whatever the
    /// implementation's write path can fail with.
    fn apply(&mut self, id: &CardId, patch: CardPatch) -> Result<Card, CardError>;
}

#[derive(Default)]
pub struct CardStore {
    cards: Vec<Card>,
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for CardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardStore")
            .field("cards", &self.cards)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic mutation counter. Starts at 0.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.get(id).is_some()
    }

    /// Owned, insertion-ordered snapshot. Changing it does not touch the store.
    #[must_use]
    pub fn list(&self) -> Vec<Card> {
        self.cards.clone()
    }

    /// Borrowed view of the same sequence [`list`](Self::list) returns.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Build a card with a fresh id without inserting it.
    ///
    /// The default due date is cut to whole microseconds, the precision the
    /// card database keeps.
    #[must_use]
    pub fn mint(&self, draft: CardDraft) -> Card {
        Card::from_draft(self.fresh_id(), draft, Utc::now().trunc_subsecs(6))
    }

    /// Assign an id and append the card.
    pub fn add(&mut self, draft: CardDraft) -> Card {
        let card = self.mint(draft);
        self.push(card.clone());
        card
    }

    /// Append a card that already carries an id.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, card: Card) -> Result<(), CardError> {
        if self.contains(&card.id) {
            return Err(CardError::DuplicateId { id: card.id });
        }
        self.push(card);
        Ok(())
    }

    /// Merge `patch` into the card with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::NotFound`] if no card has `id`.
    pub fn update(&mut self, id: &CardId, patch: CardPatch) -> Result<Card, CardError> {
        let card = self
            .cards
            .iter_mut()
            .find(|card| &card.id == id)
            .ok_or_else(|| CardError::not_found(id))?;
        card.apply(patch);
        let updated = card.clone();

        self.revision += 1;
        info!(card = %id, revision = self.revision, "card updated");
        self.notify(&StoreEvent::Updated {
            id: id.clone(),
            revision: self.revision,
        });
        Ok(updated)
    }

    /// Delete the card with `id` permanently.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::NotFound`] if no card has `id`.
    pub fn remove(&mut self, id: &CardId) -> Result<Card, CardError> {
        let index = self
            .cards
            .iter()
            .position(|card| &card.id == id)
            .ok_or_else(|| CardError::not_found(id))?;
        let removed = self.cards.remove(index);

        self.revision += 1;
        info!(card = %id, revision = self.revision, "card removed");
        self.notify(&StoreEvent::Removed {
            id: id.clone(),
            revision: self.revision,
        });
        Ok(removed)
    }

    /// Replace the whole contents, e.g. after loading from persistence.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::DuplicateId`] (and leaves the store untouched)
    /// if `cards` repeats an id.
    pub fn hydrate(&mut self, cards: Vec<Card>) -> Result<(), CardError> {
        if let Some(id) = first_duplicate(&cards) {
            return Err(CardError::DuplicateId { id: id.clone() });
        }

        self.cards = cards;
        self.revision += 1;
        debug!(count = self.cards.len(), revision = self.revision, "store hydrated");
        self.notify(&StoreEvent::Reloaded {
            count: self.cards.len(),
            revision: self.revision,
        });
        Ok(())
    }

    /// Register a callback invoked after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn push(&mut self, card: Card) {
        let id = card.id.clone();
        self.cards.push(card);
        self.revision += 1;
        info!(card = %id, revision = self.revision, "card added");
        self.notify(&StoreEvent::Added {
            id,
            revision: self.revision,
        });
    }

    fn fresh_id(&self) -> CardId {
        loop {
            let id = CardId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }
}

fn first_duplicate(cards: &[Card]) -> Option<&CardId> {
    let mut seen = HashSet::with_capacity(cards.len());
    cards
        .iter()
        .map(|card| &card.id)
        .find(|id| !seen.insert(*id))
}

impl CardMutator for CardStore {
    fn card(&self, id: &CardId) -> Option<&Card> {
        self.get(id)
    }

    fn apply(&mut self, id: &CardId, patch: CardPatch) -> Result<Card, CardError> {
        self.update(id, patch)
    }
}
