use chrono::{TimeZone, Utc};
use studycards_core::error::CardError;
use studycards_core::identity::Identity;
use studycards_core::model::{CardDraft, CardPatch, Status};
use studycards_core::persist::SqliteCardRepository;
use studycards_core::service::CardService;
use studycards_core::validate::ValidationRules;
use tempfile::TempDir;

fn owner(name: &str) -> Identity {
    Identity::new(name).expect("valid identity")
}

#[test]
fn crud_round_trip_survives_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let db = dir.path().join("cards.sqlite3");
    let due = Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap();

    let (kept, dropped) = {
        let repo = SqliteCardRepository::open(&db).expect("open db");
        let mut svc = CardService::load(repo, owner("ana"), ValidationRules::default())
            .expect("load empty db");

        let kept = svc
            .add(CardDraft::new("Irregular verbs").with_notes("ser, ir").due(due))
            .expect("add kept");
        let dropped = svc.add(CardDraft::new("Scratch")).expect("add dropped");

        svc.update(&kept.id, CardPatch::status(Status::InProgress))
            .expect("start kept");
        svc.remove(&dropped.id).expect("remove dropped");
        (kept, dropped)
    };

    let repo = SqliteCardRepository::open(&db).expect("reopen db");
    let mut svc =
        CardService::load(repo, owner("ana"), ValidationRules::default()).expect("reload");

    let listed = svc.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kept.id);
    assert_eq!(listed[0].status, Status::InProgress);
    assert_eq!(listed[0].due_at, due);
    assert_eq!(listed[0].notes.as_deref(), Some("ser, ir"));

    let err = svc
        .update(&dropped.id, CardPatch::status(Status::Done))
        .unwrap_err();
    assert!(matches!(err, CardError::NotFound { .. }));
}

#[test]
fn add_then_list_has_one_backlog_card() {
    let repo = SqliteCardRepository::open_in_memory().expect("memory db");
    let mut svc = CardService::load(&repo, owner("ana"), ValidationRules::default()).unwrap();

    svc.add(CardDraft::new("X")).unwrap();

    let listed = svc.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "X");
    assert_eq!(listed[0].status, Status::Backlog);
}

#[test]
fn two_users_share_a_database_without_seeing_each_other() {
    let repo = SqliteCardRepository::open_in_memory().expect("memory db");

    let mut ana = CardService::load(&repo, owner("ana"), ValidationRules::default()).unwrap();
    ana.add(CardDraft::new("ana's card")).unwrap();

    let bo = CardService::load(&repo, owner("bo"), ValidationRules::default()).unwrap();
    assert!(bo.list().is_empty());
    assert_eq!(ana.list().len(), 1);
}

#[test]
fn validation_failure_writes_nothing() {
    let repo = SqliteCardRepository::open_in_memory().expect("memory db");
    let mut svc = CardService::load(&repo, owner("ana"), ValidationRules::strict()).unwrap();

    assert!(matches!(
        svc.add(CardDraft::new("Title only")),
        Err(CardError::Validation(_))
    ));

    let fresh = CardService::load(&repo, owner("ana"), ValidationRules::strict()).unwrap();
    assert!(fresh.list().is_empty());
}

#[test]
fn default_due_date_reloads_unchanged() {
    let repo = SqliteCardRepository::open_in_memory().expect("memory db");
    let added = {
        let mut svc = CardService::load(&repo, owner("ana"), ValidationRules::default()).unwrap();
        svc.add(CardDraft::new("no due date")).unwrap()
    };

    let svc = CardService::load(&repo, owner("ana"), ValidationRules::default()).unwrap();
    assert_eq!(svc.list(), [added]);
}
