//! The bounded action pool: spend on interaction, regenerate over time.

use log::debug;

use crate::config::PetConfig;
use crate::pet::{Interaction, Millis, PetState};

/// An interaction was refused.  Expected and recoverable; the UI shows it as
/// a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected {
    pub reason: &'static str,
}

impl Rejected {
    pub const EXHAUSTED: Rejected = Rejected {
        reason: "no actions available",
    };
}

impl core::fmt::Display for Rejected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.reason)
    }
}

impl std::error::Error for Rejected {}

/// Outcome of [`ActionEconomy::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub state: PetState,
    /// Whole refresh intervals that elapsed since the anchor.
    pub intervals: u64,
    /// Actions actually added after capping at the pool size.
    pub restored: u8,
    /// `true` when the anchor or the pool moved.
    pub changed: bool,
}

pub struct ActionEconomy {
    config: PetConfig,
}

impl ActionEconomy {
    pub fn new(config: PetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    /// Spend one action.
    ///
    /// The refresh anchor is established by the first spend and left alone by
    /// later ones, so regeneration keeps counting from the original window.
    pub fn try_consume(&self, state: &PetState, now: Millis) -> Result<PetState, Rejected> {
        let available = match state.actions {
            Some(n) if n > 0 => n,
            _ => return Err(Rejected::EXHAUSTED),
        };

        let mut next = state.clone();
        next.actions = Some(available - 1);
        next.last_action_refresh = Some(state.last_action_refresh.unwrap_or(now));
        Ok(next)
    }

    /// Grant one action per whole refresh interval since the anchor.
    ///
    /// Once at least one interval has elapsed the anchor jumps to `now`,
    /// discarding the partial progress toward the next one.  Below one
    /// interval nothing moves.
    pub fn restore(&self, state: &PetState, now: Millis) -> Restored {
        let unchanged = Restored {
            state: state.clone(),
            intervals: 0,
            restored: 0,
            changed: false,
        };

        let Some(anchor) = state.last_action_refresh else {
            return unchanged;
        };
        let intervals = now.saturating_sub(anchor) / self.config.action_refresh_interval_ms;
        if intervals == 0 {
            return unchanged;
        }

        let current = state.actions_remaining();
        let max = self.config.max_actions;
        let topped = u64::from(current)
            .saturating_add(intervals)
            .min(u64::from(max)) as u8;

        let mut next = state.clone();
        next.actions = Some(topped);
        next.last_action_refresh = Some(now);
        debug!(
            "Economy: {} interval(s) elapsed, actions {} -> {}",
            intervals, current, topped
        );

        Restored {
            restored: topped.saturating_sub(current),
            changed: next != *state,
            state: next,
            intervals,
        }
    }

    /// Raise the interaction's target stat by the configured boost.
    pub fn apply_boost(&self, state: &PetState, interaction: Interaction, now: Millis) -> PetState {
        let mut next = state.clone();
        let max = self.config.max_stat_value;
        let value = next.stat_mut(interaction.target());
        *value = value.saturating_add(self.config.stat_boost).min(max);
        next.last_updated = Some(now);
        next
    }
}
