//! Fuzz target: service session
//!
//! Interprets fuzz bytes as a sequence of (operation, time step) pairs and
//! drives a `PetService` against the in-memory store, verifying:
//! - No panics for any ordering of polls and commands
//! - The stored record always hydrates without repair
//! - The action pool never exceeds `max_actions`
//!
//! cargo fuzz run fuzz_session

#![no_main]

use kempigotchi::adapters::identity::StaticIdentity;
use kempigotchi::adapters::memory_store::MemoryStore;
use kempigotchi::app::commands::AppCommand;
use kempigotchi::app::events::AppEvent;
use kempigotchi::app::ports::{EventSink, UserId};
use kempigotchi::app::service::PetService;
use kempigotchi::config::PetConfig;
use kempigotchi::pet::record::Integrity;
use libfuzzer_sys::fuzz_target;

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let cfg = PetConfig::default();
    let mut svc = PetService::new(cfg.clone()).unwrap();
    let identity = StaticIdentity::signed_in("fuzz");
    let user = UserId::new("fuzz");
    let mut store = MemoryStore::new();
    let mut sink = Discard;
    let mut now: u64 = 1_700_000_000_000;

    for pair in data.chunks_exact(2) {
        // Steps of up to ~4 minutes keep growth and restore reachable.
        now += u64::from(pair[1]) * 1_000;
        let result = match pair[0] % 7 {
            0 => svc.tick(now, &identity, &mut store, &mut sink),
            1 => svc.restore_actions(now, &identity, &mut store, &mut sink),
            2 => svc.handle_command(AppCommand::Feed, now, &identity, &mut store, &mut sink),
            3 => svc.handle_command(AppCommand::Play, now, &identity, &mut store, &mut sink),
            4 => svc.handle_command(AppCommand::Clean, now, &identity, &mut store, &mut sink),
            5 => svc.handle_command(AppCommand::Reset, now, &identity, &mut store, &mut sink),
            _ => svc.handle_command(
                AppCommand::Rename(String::from_utf8_lossy(&pair[1..]).into_owned()),
                now,
                &identity,
                &mut store,
                &mut sink,
            ),
        };
        assert!(result.is_ok(), "memory store never fails");

        if let Some(record) = store.record(&user) {
            let hydrated = record.hydrate(&cfg);
            assert_eq!(hydrated.integrity, Integrity::Sound);
            assert!(hydrated.state.actions_remaining() <= cfg.max_actions);
        }
    }
});
