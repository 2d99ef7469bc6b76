//! Integration tests for the PetService → engines → store pipeline.
//!
//! Each test seeds a raw record, drives one service call, and asserts on
//! the exact patch written and the events emitted.

use kempigotchi::app::commands::AppCommand;
use kempigotchi::app::events::AppEvent;
use kempigotchi::app::ports::{Lookup, PetStore, StoreError};
use kempigotchi::app::service::{Outcome, PetService, View};
use kempigotchi::adapters::identity::StaticIdentity;
use kempigotchi::adapters::memory_store::MemoryStore;
use kempigotchi::config::PetConfig;
use kempigotchi::error::Error;
use kempigotchi::pet::{Interaction, Stage, Stat};
use serde_json::{Value, json};

use crate::mock_ports::{MIN, RecordingSink, T, record, seeded, signed_in, stored, user};

fn service() -> PetService {
    PetService::new(PetConfig::default()).unwrap()
}

/// A healthy egg laid at `T`, every field populated.
fn healthy_egg() -> Value {
    json!({
        "health": 100,
        "energy": 100,
        "happiness": 100,
        "stage": "egg",
        "title": "Pingu",
        "eggTime": T,
        "lastUpdated": T,
        "actions": 5,
        "lastActionRefresh": T
    })
}

/// `healthy_egg` fully grown, so growth leaves it alone.
fn settled_adult() -> Value {
    with(
        healthy_egg(),
        json!({ "stage": "adult", "babyTime": T, "adultTime": T }),
    )
}

fn with(mut doc: Value, patch: Value) -> Value {
    if let (Some(dst), Some(src)) = (doc.as_object_mut(), patch.as_object()) {
        for (k, v) in src {
            dst.insert(k.clone(), v.clone());
        }
    }
    doc
}

// ── Decay ─────────────────────────────────────────────────────

#[test]
fn decay_writes_only_the_changed_fields() {
    let mut svc = service();
    let mut store = seeded(settled_adult());
    let mut sink = RecordingSink::new();

    let out = svc
        .tick(T + 12_000, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert!(matches!(out, Outcome::Persisted(ack) if ack.fields == 4));

    let patch = store.last_patch().unwrap();
    assert_eq!(patch.health, Some(json!(98)));
    assert_eq!(patch.energy, Some(json!(98)));
    assert_eq!(patch.happiness, Some(json!(98)));
    assert_eq!(patch.last_updated, Some(json!(T + 12_000)));
    assert_eq!(patch.stage, None);

    assert!(sink.has(|e| matches!(e, AppEvent::Decayed { by: 2, .. })));
}

#[test]
fn partial_interval_writes_nothing() {
    let mut svc = service();
    let mut store = seeded(settled_adult());
    let mut sink = RecordingSink::new();

    let out = svc
        .tick(T + 4_999, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert_eq!(out, Outcome::Unchanged);
    assert_eq!(store.patch_count(), 0);
    assert!(sink.events.is_empty());
}

#[test]
fn starved_baby_dies_with_other_stats_untouched() {
    let mut svc = service();
    let mut store = seeded(with(
        healthy_egg(),
        json!({
            "health": 0,
            "energy": 50,
            "happiness": 50,
            "stage": "baby",
            "babyTime": T,
            "lastUpdated": T + 4_000
        }),
    ));
    let mut sink = RecordingSink::new();

    svc.tick(T + 5_000, &signed_in(), &mut store, &mut sink)
        .unwrap();

    let patch = store.last_patch().unwrap();
    assert_eq!(patch.stage, Some(json!("dead")));
    assert_eq!(patch.field_count(), 1);
    assert_eq!(stored(&store).energy, Some(json!(50)));
    assert!(sink.has(|e| *e
        == AppEvent::StageChanged {
            from: Stage::Baby,
            to: Stage::Dead
        }));
}

#[test]
fn healthy_egg_hatches_but_is_too_weak_to_mature() {
    let mut svc = service();
    let mut store = seeded(with(
        healthy_egg(),
        json!({ "health": 70, "energy": 70, "happiness": 70, "lastUpdated": T + 300_000 }),
    ));
    let mut sink = RecordingSink::new();

    svc.tick(T + 300_001, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("baby")));
    assert_eq!(rec.baby_time, Some(json!(T + 300_001)));
    assert_eq!(rec.adult_time, None);

    // Same instant again: nothing left to do.
    let again = svc
        .tick(T + 300_001, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert_eq!(again, Outcome::Unchanged);
}

#[test]
fn baby_without_adult_time_matures_on_the_next_tick() {
    let mut svc = service();
    let mut store = seeded(with(
        healthy_egg(),
        json!({ "stage": "baby", "health": 90, "energy": 90, "babyTime": T, "lastUpdated": T + 1_000 }),
    ));
    let mut sink = RecordingSink::new();

    svc.tick(T + 2_000, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("adult")));
    assert_eq!(rec.adult_time, Some(json!(T + 2_000)));
    assert_eq!(rec.baby_time, Some(json!(T)), "entry times are never rewritten");
}

#[test]
fn fresh_egg_grows_up_on_its_first_tick() {
    let mut svc = service();
    let mut store = MemoryStore::new();
    let mut sink = RecordingSink::new();

    svc.tick(T, &signed_in(), &mut store, &mut sink).unwrap();

    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("adult")));
    assert_eq!(rec.egg_time, Some(json!(T)));
    assert_eq!(rec.baby_time, Some(json!(T)));
    assert_eq!(rec.adult_time, Some(json!(T)));
    assert!(sink.has(|e| matches!(e, AppEvent::Created(_))));
    assert!(sink.has(|e| *e
        == AppEvent::StageChanged {
            from: Stage::Egg,
            to: Stage::Adult
        }));

    assert_eq!(
        svc.tick(T, &signed_in(), &mut store, &mut sink).unwrap(),
        Outcome::Unchanged
    );
}

#[test]
fn dead_pet_keeps_decaying_until_revived() {
    let mut svc = service();
    let mut store = seeded(with(
        settled_adult(),
        json!({ "stage": "dead", "health": 0, "energy": 88 }),
    ));
    let mut sink = RecordingSink::new();

    svc.tick(T + MIN, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("dead")));
    assert_eq!(rec.energy, Some(json!(76)));
    assert_eq!(rec.last_updated, Some(json!(T + MIN)));
    assert!(!sink.has(|e| matches!(e, AppEvent::StageChanged { .. })));
}

#[test]
fn missing_last_updated_leaves_record_alone() {
    let mut svc = service();
    let mut doc = healthy_egg();
    doc.as_object_mut().unwrap().remove("lastUpdated");
    let mut store = seeded(doc);
    let mut sink = RecordingSink::new();

    let out = svc
        .tick(T + 60 * MIN, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert_eq!(out, Outcome::Unchanged);
    assert_eq!(store.patch_count(), 0);
}

// ── Action economy ────────────────────────────────────────────

#[test]
fn exhausted_pool_rejects_without_writing() {
    let mut svc = service();
    let mut store = seeded(with(healthy_egg(), json!({ "actions": 0 })));
    let mut sink = RecordingSink::new();

    let out = svc
        .handle_command(AppCommand::Feed, T + 1_000, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert!(matches!(out, Outcome::Rejected(_)));
    assert_eq!(store.patch_count(), 0);
    assert_eq!(stored(&store).actions, Some(json!(0)));

    let notice = svc.notice(T + 1_000).unwrap();
    assert_eq!(notice.message, "no actions available");
    assert!(svc.notice(T + 4_000).is_none());
    assert!(sink.has(|e| matches!(e, AppEvent::ActionRejected(_))));
}

#[test]
fn restore_grants_one_action_per_whole_interval() {
    let mut svc = service();
    let mut store = seeded(with(healthy_egg(), json!({ "actions": 2 })));
    let mut sink = RecordingSink::new();

    svc.restore_actions(T + 25 * MIN, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let rec = stored(&store);
    assert_eq!(rec.actions, Some(json!(4)));
    assert_eq!(rec.last_action_refresh, Some(json!(T + 25 * MIN)));
    assert!(sink.has(|e| *e
        == AppEvent::ActionsRestored {
            restored: 2,
            actions: 4
        }));
}

#[test]
fn feed_spends_an_action_and_boosts_energy() {
    let mut svc = service();
    let mut store = seeded(with(healthy_egg(), json!({ "energy": 50 })));
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::Feed, T + 1_000, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let patch = store.last_patch().unwrap();
    assert_eq!(patch.energy, Some(json!(60)));
    assert_eq!(patch.actions, Some(json!(4)));
    assert_eq!(patch.last_updated, Some(json!(T + 1_000)));
    assert_eq!(patch.last_action_refresh, None, "anchor already set");
    assert!(sink.has(|e| *e
        == AppEvent::Interacted {
            interaction: Interaction::Feed,
            stat: Stat::Energy,
            value: 60,
            actions_left: 4
        }));
}

#[test]
fn play_and_clean_target_their_stats() {
    let mut svc = service();
    let mut store = seeded(with(
        healthy_egg(),
        json!({ "health": 30, "happiness": 95 }),
    ));
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::Play, T, &signed_in(), &mut store, &mut sink)
        .unwrap();
    svc.handle_command(AppCommand::Clean, T, &signed_in(), &mut store, &mut sink)
        .unwrap();

    let rec = stored(&store);
    assert_eq!(rec.happiness, Some(json!(100)), "clamped at max");
    assert_eq!(rec.health, Some(json!(40)));
    assert_eq!(rec.actions, Some(json!(3)));
}

#[test]
fn first_action_sets_missing_anchor() {
    let mut svc = service();
    let mut doc = healthy_egg();
    doc.as_object_mut().unwrap().remove("lastActionRefresh");
    let mut store = seeded(doc);
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::Play, T + 7, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert_eq!(stored(&store).last_action_refresh, Some(json!(T + 7)));
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn acting_on_a_corrupted_dead_pet_revives_it() {
    let mut svc = service();
    let mut store = seeded(json!({
        "health": "NaN",
        "energy": 0,
        "happiness": 0,
        "stage": "dead",
        "title": "Pingu",
        "eggTime": T - 60 * MIN,
        "babyTime": T - 50 * MIN,
        "adultTime": T - 40 * MIN,
        "lastUpdated": T - MIN,
        "actions": 3,
        "lastActionRefresh": T
    }));
    let mut sink = RecordingSink::new();
    let now = T + 1_000;

    svc.handle_command(AppCommand::Feed, now, &signed_in(), &mut store, &mut sink)
        .unwrap();

    let patch = store.last_patch().unwrap();
    assert_eq!(patch.baby_time, Some(Value::Null));
    assert_eq!(patch.adult_time, Some(Value::Null));

    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("egg")));
    assert_eq!(rec.health, Some(json!(100)));
    assert_eq!(rec.energy, Some(json!(100)));
    assert_eq!(rec.happiness, Some(json!(100)));
    assert_eq!(rec.egg_time, Some(json!(now)));
    assert_eq!(rec.baby_time, None);
    assert_eq!(rec.adult_time, None);
    assert_eq!(rec.actions, Some(json!(2)));
    assert_eq!(rec.title, Some(json!("Pingu")));

    assert!(sink.has(|e| *e == AppEvent::Revived));
}

#[test]
fn reset_command_keeps_title_and_economy() {
    let mut svc = service();
    let mut store = seeded(with(
        healthy_egg(),
        json!({ "stage": "adult", "health": 40, "actions": 1, "adultTime": T }),
    ));
    let mut sink = RecordingSink::new();

    svc.handle_command(AppCommand::Reset, T + MIN, &signed_in(), &mut store, &mut sink)
        .unwrap();
    let rec = stored(&store);
    assert_eq!(rec.stage, Some(json!("egg")));
    assert_eq!(rec.health, Some(json!(100)));
    assert_eq!(rec.actions, Some(json!(1)));
    assert_eq!(rec.last_action_refresh, Some(json!(T)));
    assert_eq!(rec.title, Some(json!("Pingu")));
    assert_eq!(rec.adult_time, None);
}

// ── Title ─────────────────────────────────────────────────────

#[test]
fn rename_trims_and_blank_restores_default() {
    let mut svc = service();
    let mut store = seeded(healthy_egg());
    let mut sink = RecordingSink::new();

    svc.handle_command(
        AppCommand::Rename(String::from("  Sir Waddles ")),
        T,
        &signed_in(),
        &mut store,
        &mut sink,
    )
    .unwrap();
    assert_eq!(stored(&store).title, Some(json!("Sir Waddles")));
    assert_eq!(store.last_patch().unwrap().field_count(), 1);

    svc.handle_command(
        AppCommand::Rename(String::from("   ")),
        T,
        &signed_in(),
        &mut store,
        &mut sink,
    )
    .unwrap();
    assert_eq!(stored(&store).title, Some(json!("My Kempigotchi")));
    assert_eq!(store.patch_count(), 2, "renaming never spends an action");
    assert_eq!(stored(&store).actions, Some(json!(5)));
}

// ── Session and store ─────────────────────────────────────────

#[test]
fn first_poll_creates_a_full_egg() {
    let mut svc = service();
    let mut store = MemoryStore::new();
    let mut sink = RecordingSink::new();

    let out = svc
        .restore_actions(T, &signed_in(), &mut store, &mut sink)
        .unwrap();
    assert!(matches!(out, Outcome::Persisted(_)));
    assert!(sink.has(|e| matches!(e, AppEvent::Created(_))));

    assert_eq!(stored(&store), record(healthy_egg_with_default_title()));
}

fn healthy_egg_with_default_title() -> Value {
    with(healthy_egg(), json!({ "title": "My Kempigotchi" }))
}

#[test]
fn loading_record_defers_everything() {
    let mut svc = service();
    let mut store = seeded(healthy_egg());
    store.set_pending(true);
    let mut sink = RecordingSink::new();

    assert_eq!(
        svc.tick(T + MIN, &signed_in(), &mut store, &mut sink).unwrap(),
        Outcome::Pending
    );
    assert_eq!(
        svc.handle_command(AppCommand::Feed, T, &signed_in(), &mut store, &mut sink)
            .unwrap(),
        Outcome::Pending
    );
    assert_eq!(svc.view(&signed_in(), &store).unwrap(), View::Loading);
    assert_eq!(store.patch_count(), 0);
}

#[test]
fn signed_out_session_is_inert() {
    let mut svc = service();
    let mut store = seeded(healthy_egg());
    let mut sink = RecordingSink::new();
    let nobody = StaticIdentity::signed_out();

    assert_eq!(
        svc.restore_actions(T + 60 * MIN, &nobody, &mut store, &mut sink)
            .unwrap(),
        Outcome::Inert
    );
    assert_eq!(store.patch_count(), 0);
    assert!(sink.events.is_empty());
}

#[test]
fn write_failure_is_surfaced_not_retried() {
    let mut svc = service();
    let mut store = seeded(healthy_egg());
    store.fail_writes(Some(StoreError::Denied));
    let mut sink = RecordingSink::new();

    let err = svc
        .tick(T + MIN, &signed_in(), &mut store, &mut sink)
        .unwrap_err();
    assert_eq!(err, Error::Store(StoreError::Denied));
    assert!(sink.has(|e| *e == AppEvent::StoreFailed(StoreError::Denied)));
    assert!(!sink.has(|e| matches!(e, AppEvent::Decayed { .. })));

    // Nothing landed; the next poll starts from the same record.
    assert_eq!(store.read(&user()).unwrap(), Lookup::Found(record(healthy_egg())));
}

#[test]
fn read_failure_reaches_the_view() {
    let svc = service();
    let mut store = seeded(healthy_egg());
    store.fail_reads(Some(StoreError::Unavailable));

    assert_eq!(
        svc.view(&signed_in(), &store),
        Err(Error::Store(StoreError::Unavailable))
    );
}

#[test]
fn view_reports_hearts_from_happiness() {
    let svc = service();
    let store = seeded(with(healthy_egg(), json!({ "happiness": 50 })));

    match svc.view(&signed_in(), &store).unwrap() {
        View::Ready(s) => {
            assert_eq!(s.title, "Pingu");
            assert_eq!(s.stage, Stage::Egg);
            assert_eq!(s.hearts, 3);
        }
        other => panic!("unexpected view {other:?}"),
    }
}
