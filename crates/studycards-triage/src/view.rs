//! Everything the list screens show, computed in one pass, plus a cache
//! keyed on the store revision so repeated reads between mutations are free.

use crate::board::Board;
use crate::due::is_due_soon;
use crate::group::{BucketPolicy, DateBuckets, group_by_date};
use crate::urgency::{UrgencyBand, band_for, days_remaining, needs_attention};
use chrono::{DateTime, Offset, TimeZone, Utc};
use serde::Serialize;
use studycards_core::model::Card;
use studycards_core::store::CardStore;
use tracing::debug;

/// A card with its triage annotations relative to one reference time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedCard {
    #[serde(flatten)]
    pub card: Card,
    pub band: UrgencyBand,
    pub days_remaining: f64,
    pub due_soon: bool,
    pub needs_attention: bool,
}

impl ClassifiedCard {
    #[must_use]
    pub fn new<Tz: TimeZone>(card: Card, now: &DateTime<Tz>) -> Self {
        let days = days_remaining(card.due_at, now);
        Self {
            band: band_for(card.status, days),
            days_remaining: days,
            due_soon: is_due_soon(&card, now),
            needs_attention: needs_attention(&card, now),
            card,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageView {
    pub now: DateTime<Utc>,
    pub cards: Vec<ClassifiedCard>,
    pub due_soon_count: usize,
    pub buckets: DateBuckets,
    pub board: Board,
}

impl TriageView {
    #[must_use]
    pub fn compute<Tz: TimeZone>(cards: &[Card], now: &DateTime<Tz>, policy: BucketPolicy) -> Self {
        let classified: Vec<_> = cards
            .iter()
            .map(|card| ClassifiedCard::new(card.clone(), now))
            .collect();
        let due_soon_count = classified.iter().filter(|c| c.due_soon).count();

        Self {
            now: now.with_timezone(&Utc),
            due_soon_count,
            buckets: group_by_date(cards, now, policy),
            board: Board::from_cards(cards),
            cards: classified,
        }
    }

    /// Due-soon cards, in store order.
    pub fn due_soon(&self) -> impl Iterator<Item = &ClassifiedCard> {
        self.cards.iter().filter(|c| c.due_soon)
    }

    /// Cards whose band is `band`, in store order.
    pub fn in_band(&self, band: UrgencyBand) -> impl Iterator<Item = &ClassifiedCard> {
        self.cards.iter().filter(move |c| c.band == band)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    now: DateTime<Utc>,
    utc_offset_secs: i32,
    policy: BucketPolicy,
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    view: TriageView,
}

/// Memoizes the [`TriageView`] for one store.
///
/// The view is rebuilt when the store revision, the reference time, its
/// UTC offset, or the bucket policy changes.
#[derive(Debug, Default)]
pub struct TriageCache {
    entry: Option<CacheEntry>,
    recomputes: u64,
}

impl TriageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<Tz: TimeZone>(
        &mut self,
        store: &CardStore,
        now: &DateTime<Tz>,
        policy: BucketPolicy,
    ) -> &TriageView {
        let key = CacheKey {
            revision: store.revision(),
            now: now.with_timezone(&Utc),
            utc_offset_secs: now.offset().fix().local_minus_utc(),
            policy,
        };

        let entry = match self.entry.take() {
            Some(entry) if entry.key == key => entry,
            _ => {
                self.recomputes += 1;
                debug!(revision = key.revision, cards = store.len(), "recomputing triage view");
                CacheEntry {
                    key,
                    view: TriageView::compute(store.cards(), now, policy),
                }
            }
        };
        &self.entry.insert(entry).view
    }

    /// `true` when the cached view no longer matches `revision`.
    #[must_use]
    pub fn is_stale(&self, revision: u64) -> bool {
        self.entry
            .as_ref()
            .is_none_or(|entry| entry.key.revision != revision)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of times a view has been built.
    #[must_use]
    pub const fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use studycards_core::model::{CardDraft, CardPatch, Status};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
    }

    fn seeded() -> CardStore {
        let mut store = CardStore::new();
        store.add(CardDraft::new("soon").due(now() + Duration::days(2)));
        store.add(
            CardDraft::new("started")
                .with_status(Status::InProgress)
                .due(now() + Duration::days(15)),
        );
        store.add(
            CardDraft::new("late")
                .with_status(Status::InProgress)
                .due(now() - Duration::days(1)),
        );
        store.add(
            CardDraft::new("finished")
                .with_status(Status::Done)
                .due(now() + Duration::hours(1)),
        );
        store
    }

    #[test]
    fn view_bundles_every_derived_list() {
        let store = seeded();
        let view = TriageView::compute(store.cards(), &now(), BucketPolicy::default());

        let bands: Vec<_> = view.cards.iter().map(|c| c.band).collect();
        assert_eq!(
            bands,
            vec![
                UrgencyBand::Warning,
                UrgencyBand::Warning,
                UrgencyBand::Overdue,
                UrgencyBand::Completed
            ]
        );
        assert_eq!(view.due_soon_count, 2);
        let soon: Vec<_> = view.due_soon().map(|c| c.card.title.as_str()).collect();
        assert_eq!(soon, vec!["soon", "started"]);
        assert!(view.cards[0].needs_attention);
        assert_eq!(view.in_band(UrgencyBand::Overdue).count(), 1);
        assert_eq!(view.board.done.len(), 1);
        assert_eq!(view.buckets.next_7_days.len(), 2);
    }

    #[test]
    fn cache_reuses_view_until_store_changes() {
        let mut store = seeded();
        let mut cache = TriageCache::new();

        assert!(cache.is_stale(store.revision()));
        assert_eq!(cache.view(&store, &now(), BucketPolicy::default()).due_soon_count, 2);
        assert_eq!(cache.view(&store, &now(), BucketPolicy::default()).due_soon_count, 2);
        assert_eq!(cache.recomputes(), 1);
        assert!(!cache.is_stale(store.revision()));

        let first = store.cards()[0].id.clone();
        store.update(&first, CardPatch::status(Status::Done)).unwrap();
        assert!(cache.is_stale(store.revision()));

        assert_eq!(cache.view(&store, &now(), BucketPolicy::default()).due_soon_count, 1);
        assert_eq!(cache.recomputes(), 2);
    }

    #[test]
    fn cache_rebuilds_for_new_reference_time_or_zone() {
        let store = seeded();
        let mut cache = TriageCache::new();

        cache.view(&store, &now(), BucketPolicy::default());
        cache.view(&store, &(now() + Duration::minutes(1)), BucketPolicy::default());
        assert_eq!(cache.recomputes(), 2);

        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        cache.view(
            &store,
            &(now() + Duration::minutes(1)).with_timezone(&tokyo),
            BucketPolicy::default(),
        );
        assert_eq!(cache.recomputes(), 3);

        cache.view(
            &store,
            &(now() + Duration::minutes(1)).with_timezone(&tokyo),
            BucketPolicy::excluding_overdue(),
        );
        assert_eq!(cache.recomputes(), 4);

        cache.invalidate();
        assert!(cache.is_stale(store.revision()));
    }

    #[test]
    fn classified_cards_serialize_flat() {
        let store = seeded();
        let view = TriageView::compute(store.cards(), &now(), BucketPolicy::default());
        let json = serde_json::to_value(&view.cards[1]).unwrap();

        assert_eq!(json["title"], "started");
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["band"], "warning");
        assert_eq!(json["due_soon"], true);
    }
}
