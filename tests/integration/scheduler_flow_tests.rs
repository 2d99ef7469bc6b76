//! Scheduler-driven flows: the host loop wiring, minus the wall clock.
//!
//! A manual clock is stepped through simulated time and fired schedules
//! are dispatched to the service exactly the way the binary does it.

use kempigotchi::adapters::memory_store::MemoryStore;
use kempigotchi::adapters::time::ManualClock;
use kempigotchi::app::commands::AppCommand;
use kempigotchi::app::events::AppEvent;
use kempigotchi::app::ports::{ClockPort, ScheduleFiredKind, SchedulerDelegate};
use kempigotchi::app::service::{Outcome, PetService, View};
use kempigotchi::config::PetConfig;
use kempigotchi::pet::Millis;
use kempigotchi::scheduler::{DECAY_LABEL, NOTICE_LABEL, RESTORE_LABEL, Scheduler};
use serde_json::json;

use crate::mock_ports::{MIN, RecordingSink, T, signed_in, stored};

#[derive(Default)]
struct Due {
    decay: bool,
    restore: bool,
    notice: bool,
}

impl SchedulerDelegate for Due {
    fn on_schedule_fired(&mut self, label: &str, _kind: ScheduleFiredKind) {
        match label {
            DECAY_LABEL => self.decay = true,
            RESTORE_LABEL => self.restore = true,
            NOTICE_LABEL => self.notice = true,
            _ => {}
        }
    }
}

struct Host {
    clock: ManualClock,
    sched: Scheduler,
    svc: PetService,
    store: MemoryStore,
    sink: RecordingSink,
}

impl Host {
    fn new() -> Self {
        let config = PetConfig::default();
        let mut host = Self {
            clock: ManualClock::new(T),
            sched: Scheduler::for_config(&config, T),
            svc: PetService::new(config).unwrap(),
            store: MemoryStore::new(),
            sink: RecordingSink::new(),
        };
        host.svc
            .tick(T, &signed_in(), &mut host.store, &mut host.sink)
            .unwrap();
        host
    }

    /// Step the clock one second at a time, dispatching whatever fires.
    fn run_for(&mut self, duration: Millis) {
        let end = self.clock.now_ms() + duration;
        while self.clock.now_ms() < end {
            self.clock.advance(1_000);
            let now = self.clock.now_ms();
            let mut due = Due::default();
            self.sched.tick(now, &mut due);
            if due.decay {
                self.svc
                    .tick(now, &signed_in(), &mut self.store, &mut self.sink)
                    .unwrap();
            }
            if due.restore {
                self.svc
                    .restore_actions(now, &signed_in(), &mut self.store, &mut self.sink)
                    .unwrap();
            }
            if due.notice {
                self.svc.expire_notice(now, &mut self.sink);
            }
        }
    }

    fn command(&mut self, cmd: AppCommand) -> Outcome {
        let now = self.clock.now_ms();
        let out = self
            .svc
            .handle_command(cmd, now, &signed_in(), &mut self.store, &mut self.sink)
            .unwrap();
        if let Outcome::Rejected(_) = out {
            self.sched.rearm(NOTICE_LABEL, now);
        }
        out
    }

    fn view(&self) -> View {
        self.svc.view(&signed_in(), &self.store).unwrap()
    }
}

#[test]
fn a_minute_of_polling_decays_twelve_points() {
    let mut host = Host::new();
    host.run_for(MIN);

    match host.view() {
        View::Ready(s) => {
            assert_eq!((s.health, s.energy, s.happiness), (88, 88, 88));
            assert_eq!(s.hearts, 4);
        }
        other => panic!("unexpected view {other:?}"),
    }
    assert_eq!(host.svc.tick_count(), 61);
}

#[test]
fn rejected_notice_clears_after_its_duration() {
    let mut host = Host::new();
    for _ in 0..5 {
        assert!(matches!(host.command(AppCommand::Feed), Outcome::Persisted(_)));
    }
    assert!(matches!(host.command(AppCommand::Play), Outcome::Rejected(_)));
    let raised = host.clock.now_ms();
    assert!(host.svc.notice(raised).is_some());

    host.run_for(2_000);
    assert!(!host.sink.has(|e| *e == AppEvent::NoticeDismissed));

    host.run_for(1_000);
    assert!(host.sink.has(|e| *e == AppEvent::NoticeDismissed));
    assert!(host.svc.notice(host.clock.now_ms()).is_none());
}

#[test]
fn spent_actions_come_back_every_ten_minutes() {
    let mut host = Host::new();
    for _ in 0..5 {
        host.command(AppCommand::Clean);
    }
    assert_eq!(stored(&host.store).actions, Some(json!(0)));

    host.run_for(25 * MIN);
    assert_eq!(stored(&host.store).actions, Some(json!(2)));
    assert_eq!(
        stored(&host.store).last_action_refresh,
        Some(json!(T + 20 * MIN))
    );

    host.run_for(5 * MIN);
    assert_eq!(stored(&host.store).actions, Some(json!(3)));
}

#[test]
fn neglected_pet_dies_and_a_tap_revives_it() {
    let mut host = Host::new();
    // 100 points at one per 5 s.
    host.run_for(500_000);

    match host.view() {
        View::Ready(s) => {
            assert_eq!(s.stage.as_str(), "dead");
            assert_eq!(s.health, 0);
        }
        other => panic!("unexpected view {other:?}"),
    }

    host.command(AppCommand::Feed);
    match host.view() {
        View::Ready(s) => {
            assert_eq!(s.stage.as_str(), "egg");
            assert_eq!(s.health, 100);
        }
        other => panic!("unexpected view {other:?}"),
    }
    assert!(host.sink.has(|e| *e == AppEvent::Revived));
}
