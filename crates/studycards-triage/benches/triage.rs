use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use studycards_core::model::{Card, CardDraft, CardId, Status};
use studycards_triage::{BucketPolicy, TriageView, due_soon_count, group_by_date};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap()
}

/// Deterministic snapshot spread over +/- 30 days with all three statuses.
fn snapshot(size: usize) -> Vec<Card> {
    (0..size)
        .map(|i| {
            let status = Status::ALL[i % Status::ALL.len()];
            let hours = i64::try_from(i * 37 % 1_440).unwrap() - 720;
            Card::from_draft(
                CardId::new_unchecked(format!("sc-{i:010}")),
                CardDraft::new(format!("card {i}"))
                    .with_status(status)
                    .due(now() + Duration::hours(hours)),
                now(),
            )
        })
        .collect()
}

fn bench_triage(c: &mut Criterion) {
    let mut group = c.benchmark_group("triage.snapshot");

    for size in SIZES {
        let cards = snapshot(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("due_soon_count", size), &cards, |b, cards| {
            b.iter(|| black_box(due_soon_count(cards, &now())));
        });

        group.bench_with_input(BenchmarkId::new("group_by_date", size), &cards, |b, cards| {
            b.iter(|| black_box(group_by_date(cards, &now(), BucketPolicy::default())));
        });

        group.bench_with_input(BenchmarkId::new("view", size), &cards, |b, cards| {
            b.iter(|| black_box(TriageView::compute(cards, &now(), BucketPolicy::default())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_triage);
criterion_main!(benches);
