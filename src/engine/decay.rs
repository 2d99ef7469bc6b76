//! Time-based stat decay followed by growth evaluation.

use log::debug;

use crate::config::PetConfig;
use crate::growth::{GrowthContext, GrowthMachine, Transition};
use crate::pet::{Millis, PetState, Stat};

/// Outcome of one [`DecayEngine::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    pub state: PetState,
    /// `true` when anything in `state` differs from the input.
    pub changed: bool,
    /// Points taken off each stat this tick (before flooring at zero).
    pub decayed_by: u64,
    pub transition: Option<Transition>,
}

pub struct DecayEngine {
    config: PetConfig,
    growth: GrowthMachine,
}

impl DecayEngine {
    pub fn new(config: PetConfig) -> Self {
        Self {
            config,
            growth: GrowthMachine::new(),
        }
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    /// Apply elapsed-time decay, then evaluate growth on the decayed stats.
    /// A dead pet keeps decaying; its stage stays put until a reset.
    ///
    /// Pure: the input is never modified.  Calling `tick` again with the
    /// same `now` on the returned state is a no-op.
    pub fn tick(&self, state: &PetState, now: Millis) -> TickResult {
        let unchanged = || TickResult {
            state: state.clone(),
            changed: false,
            decayed_by: 0,
            transition: None,
        };

        let Some(last_updated) = state.last_updated else {
            return unchanged();
        };

        let mut next = state.clone();
        let elapsed = now.saturating_sub(last_updated);
        let decayed_by = elapsed / self.config.decay_interval_ms;

        if decayed_by > 0 {
            let amount = u8::try_from(decayed_by).unwrap_or(u8::MAX);
            for stat in Stat::ALL {
                let value = next.stat_mut(stat);
                *value = value.saturating_sub(amount);
            }
            next.last_updated = Some(now);
            debug!(
                "Decay: -{} over {}ms -> health={} energy={} happiness={}",
                decayed_by, elapsed, next.health, next.energy, next.happiness
            );
        }

        let transition = {
            let mut ctx = GrowthContext {
                pet: &mut next,
                now,
                config: &self.config,
            };
            self.growth.evaluate(&mut ctx)
        };

        TickResult {
            changed: decayed_by > 0 || transition.is_some(),
            state: next,
            decayed_by,
            transition,
        }
    }
}
