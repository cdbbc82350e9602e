//! Session service: the in-memory store paired with its repository.
//!
//! Every write is pessimistic. The candidate card is validated, handed to the
//! [`CardRepository`], and the store is only mutated once storage has
//! accepted it. A rejected write leaves the store at its last good state.

use crate::error::CardError;
use crate::identity::Identity;
use crate::model::card::{Card, CardDraft, CardId, CardPatch};
use crate::persist::CardRepository;
use crate::store::{CardMutator, CardStore, StoreEvent, SubscriptionId};
use crate::validate::ValidationRules;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct CardService<R: CardRepository> {
    repo: R,
    owner: Identity,
    rules: ValidationRules,
    store: CardStore,
}

impl<R: CardRepository> CardService<R> {
    /// Load every card of `owner` from `repo` into a fresh store.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Persistence`] if loading fails, or
    /// [`CardError::DuplicateId`] if storage returned the same id twice.
    #[instrument(skip(repo, owner, rules), fields(owner = %owner))]
    pub fn load(repo: R, owner: Identity, rules: ValidationRules) -> Result<Self, CardError> {
        let mut service = Self {
            repo,
            owner,
            rules,
            store: CardStore::new(),
        };
        service.reload()?;
        Ok(service)
    }

    /// Replace the store contents with what storage currently holds.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load). The store is untouched on failure.
    pub fn reload(&mut self) -> Result<(), CardError> {
        let cards = self.repo.load_all(&self.owner)?;
        debug!(count = cards.len(), "reloading store from repository");
        self.store.hydrate(cards)
    }

    #[must_use]
    pub const fn owner(&self) -> &Identity {
        &self.owner
    }

    #[must_use]
    pub const fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Read-only access to the backing store.
    #[must_use]
    pub const fn store(&self) -> &CardStore {
        &self.store
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.store.get(id)
    }

    #[must_use]
    pub fn list(&self) -> Vec<Card> {
        self.store.list()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Validate, persist and insert a new card.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Validation`] for blank required fields or
    /// [`CardError::Persistence`] if storage rejects the card.
    #[instrument(skip(self, draft), fields(owner = %self.owner))]
    pub fn add(&mut self, draft: CardDraft) -> Result<Card, CardError> {
        let card = self.store.mint(draft);
        self.check(&card)?;

        let persisted = self.repo.create(&self.owner, &card).inspect_err(|err| {
            warn!(card = %card.id, error = %err, "create rejected by storage");
        })?;
        self.store.insert(persisted.clone())?;
        Ok(persisted)
    }

    /// Validate, persist and merge `patch` into the card with `id`.
    ///
    /// Validation only runs when the patch touches a text field, so status
    /// and due-date moves still work on cards saved under looser rules.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::NotFound`], [`CardError::Validation`], or
    /// [`CardError::Persistence`].
    #[instrument(skip(self, patch), fields(owner = %self.owner))]
    pub fn update(&mut self, id: &CardId, patch: CardPatch) -> Result<Card, CardError> {
        let current = self.store.get(id).ok_or_else(|| CardError::not_found(id))?;
        let touches_text = patch.title.is_some() || patch.notes.is_some();
        let candidate = current.patched(patch.clone());
        if touches_text {
            self.check(&candidate)?;
        }

        self.repo.save(&self.owner, &candidate).inspect_err(|err| {
            warn!(card = %id, error = %err, "save rejected by storage");
        })?;
        self.store.update(id, patch)
    }

    /// Delete the card with `id` from storage and then from the store.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::NotFound`] or [`CardError::Persistence`].
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub fn remove(&mut self, id: &CardId) -> Result<Card, CardError> {
        if !self.store.contains(id) {
            return Err(CardError::not_found(id));
        }

        self.repo.delete(&self.owner, id).inspect_err(|err| {
            warn!(card = %id, error = %err, "delete rejected by storage");
        })?;
        self.store.remove(id)
    }

    fn check(&self, card: &Card) -> Result<(), CardError> {
        self.rules.check(card).map_err(|err| {
            warn!(card = %card.id, error = %err, "validation failed");
            CardError::from(err)
        })
    }
}

impl<R: CardRepository> CardMutator for CardService<R> {
    fn card(&self, id: &CardId) -> Option<&Card> {
        self.store.get(id)
    }

    fn apply(&mut self, id: &CardId, patch: CardPatch) -> Result<Card, CardError> {
        self.update(id, patch)
    }
}
