//! Fuzz target: stored record hydration
//!
//! Feeds arbitrary bytes through the JSON decoder and, when they decode as
//! a pet record, verifies:
//! - `hydrate` never panics
//! - Every stat lands within `0..=max_stat_value`
//! - The action pool never exceeds `max_actions`
//! - Re-encoding the hydrated state and hydrating again is lossless
//!
//! cargo fuzz run fuzz_record_hydrate

#![no_main]

use kempigotchi::config::PetConfig;
use kempigotchi::pet::record::{Integrity, PetRecord};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(record) = serde_json::from_slice::<PetRecord>(data) else {
        return;
    };

    let cfg = PetConfig::default();
    let hydrated = record.hydrate(&cfg);
    let pet = &hydrated.state;

    assert!(pet.health <= cfg.max_stat_value);
    assert!(pet.energy <= cfg.max_stat_value);
    assert!(pet.happiness <= cfg.max_stat_value);
    assert!(pet.actions_remaining() <= cfg.max_actions);
    assert!(!pet.title.trim().is_empty(), "blank title survived hydration");

    let again = PetRecord::from_state(pet).hydrate(&cfg);
    assert_eq!(again.state, *pet);
    assert_eq!(again.integrity, Integrity::Sound);
});
