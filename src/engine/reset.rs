//! Revive a dead or corrupted pet as a fresh egg.

use log::info;

use crate::config::PetConfig;
use crate::growth::{GrowthContext, GrowthMachine};
use crate::pet::{Millis, PetState, Stage};

/// Back to a full-stat egg laid at `now`.
///
/// Title and the action economy (`actions`, `last_action_refresh`) are
/// carried over untouched.
pub fn reset(state: &PetState, now: Millis, config: &PetConfig) -> PetState {
    let mut next = state.clone();
    let transition = {
        let mut ctx = GrowthContext {
            pet: &mut next,
            now,
            config,
        };
        GrowthMachine::new().force(Stage::Egg, &mut ctx)
    };

    next.health = config.max_stat_value;
    next.energy = config.max_stat_value;
    next.happiness = config.max_stat_value;
    next.last_updated = Some(now);

    info!("Reset: {} -> {} at {}", transition.from, transition.to, now);
    next
}
