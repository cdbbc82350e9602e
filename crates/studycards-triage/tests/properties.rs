//! Property tests for classification, due-soon and grouping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use studycards_core::model::{Card, CardDraft, CardId, Status};
use studycards_core::store::CardStore;
use studycards_triage::{
    BucketPolicy, UrgencyBand, advance_to_in_progress, classify, due_soon, group_by_date,
    is_due_soon,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
}

fn card(id: usize, status: Status, offset_ms: i64) -> Card {
    Card::from_draft(
        CardId::new_unchecked(format!("sc-{id:010}")),
        CardDraft::new(format!("card {id}"))
            .with_status(status)
            .due(now() + Duration::milliseconds(offset_ms)),
        now(),
    )
}

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Backlog),
        Just(Status::InProgress),
        Just(Status::Done)
    ]
}

/// About +/- 60 days around the reference time.
fn offset_ms() -> impl Strategy<Value = i64> {
    -5_184_000_000_i64..5_184_000_000_i64
}

fn snapshot() -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec((status(), offset_ms()), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(id, (status, offset))| card(id, status, offset))
            .collect()
    })
}

proptest! {
    #[test]
    fn classification_is_pure(status in status(), offset in offset_ms()) {
        let c = card(0, status, offset);
        prop_assert_eq!(classify(&c, &now()), classify(&c.clone(), &now()));
    }

    #[test]
    fn due_soon_never_contains_done_or_overdue(cards in snapshot()) {
        for c in due_soon(&cards, &now()) {
            prop_assert_ne!(c.status, Status::Done);
            prop_assert_ne!(classify(c, &now()), UrgencyBand::Overdue);
        }
    }

    #[test]
    fn overdue_open_cards_are_overdue_and_not_due_soon(
        status in prop_oneof![Just(Status::Backlog), Just(Status::InProgress)],
        late_ms in 1_i64..5_184_000_000_i64,
    ) {
        let c = card(0, status, -late_ms);
        prop_assert_eq!(classify(&c, &now()), UrgencyBand::Overdue);
        prop_assert!(!is_due_soon(&c, &now()));
    }

    #[test]
    fn done_cards_never_get_a_bucket(offset in offset_ms()) {
        let cards = vec![card(0, Status::Done, offset)];
        prop_assert!(group_by_date(&cards, &now(), BucketPolicy::default()).is_empty());
    }

    #[test]
    fn buckets_are_disjoint_and_ordered(cards in snapshot()) {
        let buckets = group_by_date(&cards, &now(), BucketPolicy::default());
        let mut seen = std::collections::HashSet::new();
        for (_, members) in buckets.iter() {
            for c in members {
                prop_assert!(seen.insert(c.id.clone()), "card {} in two buckets", c.id);
            }
            let positions: Vec<_> = members
                .iter()
                .map(|m| cards.iter().position(|c| c.id == m.id))
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn fifteen_days_out_is_warning_for_open_cards() {
    let fifteen = Duration::days(15).num_milliseconds();
    let backlog = card(0, Status::Backlog, fifteen);
    let started = card(1, Status::InProgress, fifteen);

    assert_eq!(classify(&backlog, &now()), UrgencyBand::Warning);
    assert!(is_due_soon(&backlog, &now()));

    assert_eq!(classify(&started, &now()), UrgencyBand::Warning);
    assert!(is_due_soon(&started, &now()));

    let later = card(2, Status::InProgress, fifteen + 1);
    assert_eq!(classify(&later, &now()), UrgencyBand::Normal);
    assert!(!is_due_soon(&later, &now()));
}

#[test]
fn grouping_matches_reference_scenario() {
    let cards = vec![
        card(0, Status::Backlog, Duration::hours(2).num_milliseconds()),
        card(1, Status::Backlog, Duration::hours(26).num_milliseconds()),
        card(2, Status::InProgress, Duration::days(5).num_milliseconds()),
        card(3, Status::Done, Duration::hours(2).num_milliseconds()),
    ];

    let buckets = group_by_date(&cards, &now(), BucketPolicy::default());
    assert_eq!(buckets.today, vec![cards[0].clone()]);
    assert_eq!(buckets.tomorrow, vec![cards[1].clone()]);
    assert_eq!(buckets.next_7_days, vec![cards[2].clone()]);
}

#[test]
fn starting_a_done_card_leaves_the_store_alone() {
    let mut store = CardStore::new();
    let done = store.add(CardDraft::new("finished").with_status(Status::Done));
    let before = store.list();

    assert!(advance_to_in_progress(&mut store, &done.id).is_err());
    assert_eq!(store.list(), before);
}
