//! Forward lifecycle moves: start a backlog card, complete an open one.
//!
//! Guards run before anything is written. A rejected move returns
//! [`CardError::InvalidTransition`] and leaves the card as it was. Moving a
//! card backwards is a plain status edit, not a transition.

use studycards_core::error::CardError;
use studycards_core::model::{Action, Card, CardId, CardPatch};
use studycards_core::store::CardMutator;
use tracing::{info, warn};

/// Patch that performs `action` on `card`, if the guard allows it.
///
/// # Errors
///
/// Returns [`CardError::InvalidTransition`] if `card` is not in a status
/// `action` can start from.
pub fn plan(card: &Card, action: Action) -> Result<CardPatch, CardError> {
    action
        .check(card.status)
        .map(CardPatch::status)
        .map_err(|source| CardError::InvalidTransition {
            id: card.id.clone(),
            source,
        })
}

/// Look up `id`, check the guard for `action`, and apply it through `target`.
///
/// # Errors
///
/// Returns [`CardError::NotFound`], [`CardError::InvalidTransition`], or any
/// error from the mutator's write path.
pub fn transition<M: CardMutator + ?Sized>(
    target: &mut M,
    id: &CardId,
    action: Action,
) -> Result<Card, CardError> {
    let card = target.card(id).ok_or_else(|| CardError::not_found(id))?;
    let from = card.status;
    let patch = plan(card, action).inspect_err(|err| {
        warn!(card = %id, %action, error = %err, "transition rejected");
    })?;

    let updated = target.apply(id, patch)?;
    info!(card = %id, %from, to = %updated.status, "card moved");
    Ok(updated)
}

/// `backlog -> in_progress`.
///
/// # Errors
///
/// See [`transition`].
pub fn advance_to_in_progress<M: CardMutator + ?Sized>(
    target: &mut M,
    id: &CardId,
) -> Result<Card, CardError> {
    transition(target, id, Action::Start)
}

/// Any open status `-> done`.
///
/// # Errors
///
/// See [`transition`].
pub fn mark_done<M: CardMutator + ?Sized>(target: &mut M, id: &CardId) -> Result<Card, CardError> {
    transition(target, id, Action::Complete)
}
