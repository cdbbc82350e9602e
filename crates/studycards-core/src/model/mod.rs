pub mod card;

pub use card::{Action, Card, CardDraft, CardId, CardPatch, InvalidTransition, ParseEnumError, Status};
