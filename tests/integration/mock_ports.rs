//! Shared fixtures for integration tests.
//!
//! Records every emitted event so tests can assert on the full history,
//! and builds seeded stores from JSON documents.

use kempigotchi::adapters::identity::StaticIdentity;
use kempigotchi::adapters::memory_store::MemoryStore;
use kempigotchi::app::events::AppEvent;
use kempigotchi::app::ports::{EventSink, UserId};
use kempigotchi::pet::Millis;
use kempigotchi::pet::record::PetRecord;
use serde_json::Value;

/// A fixed point in time well past the epoch.
pub const T: Millis = 1_700_000_000_000;
pub const MIN: Millis = 60_000;
pub const USER: &str = "kemp-user";

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, pred: impl Fn(&AppEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub fn user() -> UserId {
    UserId::new(USER)
}

pub fn signed_in() -> StaticIdentity {
    StaticIdentity::signed_in(USER)
}

pub fn record(doc: Value) -> PetRecord {
    serde_json::from_value(doc).expect("fixture must be a pet record")
}

/// A store holding `doc` as the signed-in user's pet.
pub fn seeded(doc: Value) -> MemoryStore {
    MemoryStore::new().with_record(&user(), record(doc))
}

/// The signed-in user's record as merged so far.
pub fn stored(store: &MemoryStore) -> PetRecord {
    store.record(&user()).cloned().expect("record must exist")
}
