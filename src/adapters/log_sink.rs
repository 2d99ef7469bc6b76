//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade.  A UI adapter would implement the same trait and
//! refresh its view instead.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written since construction.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Created(s) => {
                info!("CREATE | '{}' stage={} actions={}", s.title, s.stage, s.actions);
            }
            AppEvent::Decayed { by, summary: s } => {
                info!(
                    "DECAY | -{} | health={} energy={} happiness={} hearts={}/5 | stage={}",
                    by, s.health, s.energy, s.happiness, s.hearts, s.stage
                );
            }
            AppEvent::StageChanged { from, to } => {
                info!("STAGE | {from} -> {to}");
            }
            AppEvent::Revived => {
                info!("RESET | back to an egg");
            }
            AppEvent::Interacted {
                interaction,
                stat,
                value,
                actions_left,
            } => {
                info!(
                    "ACTION | {} | {}={} | actions left={}",
                    interaction.as_str(),
                    stat.as_str(),
                    value,
                    actions_left
                );
            }
            AppEvent::ActionsRestored { restored, actions } => {
                info!("ACTION | +{restored} restored | actions={actions}");
            }
            AppEvent::ActionRejected(r) => {
                warn!("ACTION | rejected: {r}");
            }
            AppEvent::Renamed(title) => {
                info!("TITLE | '{title}'");
            }
            AppEvent::NoticeDismissed => {
                info!("NOTICE | dismissed");
            }
            AppEvent::StoreFailed(e) => {
                warn!("STORE | {e}");
            }
        }
    }
}
