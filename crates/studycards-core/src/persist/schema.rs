//! SQLite layout of a card database.
//!
//! One `cards` row per card. `card_seq` is the creation order that listings
//! follow, and every query is scoped by `owner_id`.

/// Schema version 1: the cards table and its per-owner indexes.
pub const CARDS_V1_SQL: &str = r"
CREATE TABLE cards (
    card_seq INTEGER PRIMARY KEY AUTOINCREMENT,
    card_id TEXT NOT NULL UNIQUE,
    owner_id TEXT NOT NULL CHECK (length(trim(owner_id)) > 0),
    title TEXT NOT NULL,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'backlog' CHECK (status IN ('backlog', 'in_progress', 'done')),
    due_at_us INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE INDEX idx_cards_owner_seq ON cards(owner_id, card_seq);
CREATE INDEX idx_cards_owner_due ON cards(owner_id, due_at_us);
";

/// Index names the listing and `due` queries rely on.
pub const CARD_INDEXES: &[&str] = &["idx_cards_owner_seq", "idx_cards_owner_due"];
