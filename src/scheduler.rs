//! Wall-clock poll scheduler.
//!
//! The scheduler notifies a [`SchedulerDelegate`] when schedules fire; the
//! host loop implements the delegate and maps each label onto a
//! [`PetService`](crate::app::service::PetService) call.
//!
//! ```text
//!  ┌────────────┐  ┌────────────┐  ┌────────────┐
//!  │ decay poll │  │restore poll│  │ notice     │
//!  │ (periodic) │  │ (periodic) │  │ (one-shot) │
//!  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!        ▼               ▼               ▼
//!  ┌─────────────────────────────────────────────┐
//!  │              SchedulerDelegate              │
//!  └──────────────────────┬──────────────────────┘
//!                         ▼
//!          PetService.tick() / restore_actions()
//!          PetService.expire_notice()
//! ```
//!
//! Schedules are driven by absolute timestamps, so a late host loop fires a
//! periodic schedule once rather than replaying every missed interval.  The
//! engines compute elapsed time themselves.

use log::{debug, info};

use crate::app::ports::{ScheduleFiredKind, SchedulerDelegate};
use crate::config::PetConfig;
use crate::pet::Millis;

/// Label of the stat decay poll.
pub const DECAY_LABEL: &str = "decay";
/// Label of the action restore poll.
pub const RESTORE_LABEL: &str = "restore";
/// Label of the notice dismissal timer.
pub const NOTICE_LABEL: &str = "notice";

// ═══════════════════════════════════════════════════════════════
//  Schedule types
// ═══════════════════════════════════════════════════════════════

/// A single schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub label: &'static str,
    pub kind: ScheduleKind,
    /// Whether this schedule is currently enabled.
    pub enabled: bool,
}

/// The type of schedule determines how and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Fire every `interval_ms`.
    Periodic { interval_ms: Millis },
    /// Fire once `delay_ms` after being armed, then auto-disable.
    OneShot { delay_ms: Millis },
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 4;

/// Internal bookkeeping for a live schedule.
#[derive(Debug, Clone)]
struct ScheduleEntry {
    schedule: Schedule,
    /// Time of the last fire, or of arming.
    anchor: Millis,
    /// Whether the schedule has fired (for OneShot).
    fired: bool,
}

impl ScheduleEntry {
    fn due(&self, now: Millis) -> bool {
        let elapsed = now.saturating_sub(self.anchor);
        match self.schedule.kind {
            ScheduleKind::Periodic { interval_ms } => elapsed >= interval_ms,
            ScheduleKind::OneShot { delay_ms } => !self.fired && elapsed >= delay_ms,
        }
    }
}

/// The scheduler engine.
///
/// Decoupled from the service: firing invokes the [`SchedulerDelegate`]
/// callback and nothing else.
pub struct Scheduler {
    schedules: heapless::Vec<ScheduleEntry, MAX_SCHEDULES>,
    /// Global enable flag.
    enabled: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: heapless::Vec::new(),
            enabled: true,
        }
    }

    /// The standard set: decay and restore polls, plus a disarmed notice
    /// timer that [`rearm`](Self::rearm) starts.
    pub fn for_config(config: &PetConfig, now: Millis) -> Self {
        let mut sched = Self::new();
        let standard = [
            Schedule {
                label: DECAY_LABEL,
                kind: ScheduleKind::Periodic {
                    interval_ms: config.decay_poll_ms,
                },
                enabled: true,
            },
            Schedule {
                label: RESTORE_LABEL,
                kind: ScheduleKind::Periodic {
                    interval_ms: config.restore_poll_ms,
                },
                enabled: true,
            },
            Schedule {
                label: NOTICE_LABEL,
                kind: ScheduleKind::OneShot {
                    delay_ms: config.notice_duration_ms,
                },
                enabled: false,
            },
        ];
        for schedule in standard {
            sched.add(schedule, now);
        }
        sched
    }

    /// Add a schedule anchored at `now`.  Returns the slot index, or `None`
    /// if full or the label is taken.
    pub fn add(&mut self, schedule: Schedule, now: Millis) -> Option<usize> {
        if self.position(schedule.label).is_some() {
            return None;
        }
        let label = schedule.label;
        let slot = self.schedules.len();
        self.schedules
            .push(ScheduleEntry {
                schedule,
                anchor: now,
                fired: false,
            })
            .ok()?;
        info!("Scheduler: added '{label}' at slot {slot}");
        Some(slot)
    }

    /// Restart a schedule's countdown from `now` and enable it.
    pub fn rearm(&mut self, label: &str, now: Millis) -> bool {
        let Some(i) = self.position(label) else {
            return false;
        };
        let entry = &mut self.schedules[i];
        entry.anchor = now;
        entry.fired = false;
        entry.schedule.enabled = true;
        debug!("Scheduler: re-armed '{label}'");
        true
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire every schedule that is due at `now`.
    pub fn tick(&mut self, now: Millis, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for entry in self.schedules.iter_mut() {
            if !entry.schedule.enabled || !entry.due(now) {
                continue;
            }
            entry.anchor = now;
            match entry.schedule.kind {
                ScheduleKind::Periodic { .. } => {
                    debug!("Scheduler: '{}' periodic fire", entry.schedule.label);
                    delegate.on_schedule_fired(entry.schedule.label, ScheduleFiredKind::Periodic);
                }
                ScheduleKind::OneShot { delay_ms } => {
                    debug!(
                        "Scheduler: '{}' one-shot fired (after {}ms)",
                        entry.schedule.label, delay_ms
                    );
                    entry.fired = true;
                    entry.schedule.enabled = false;
                    delegate.on_schedule_fired(entry.schedule.label, ScheduleFiredKind::OneShot);
                }
            }
        }
    }

    /// Number of active (enabled) schedules.
    pub fn active_count(&self) -> usize {
        self.schedules
            .iter()
            .filter(|e| e.schedule.enabled)
            .count()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.schedules
            .iter()
            .position(|e| e.schedule.label == label)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
