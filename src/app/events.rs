//! Outbound application events.
//!
//! The [`PetService`](super::service::PetService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::engine::Rejected;
use crate::pet::{Interaction, PetState, Stage, Stat};

use super::ports::StoreError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// No record existed; a fresh egg was written.
    Created(PetSummary),

    /// Elapsed time took `by` points off every stat.
    Decayed { by: u64, summary: PetSummary },

    /// The pet moved to another life stage.
    StageChanged { from: Stage, to: Stage },

    /// A dead or corrupted pet was reset to an egg.
    Revived,

    /// An interaction spent an action and boosted a stat.
    Interacted {
        interaction: Interaction,
        stat: Stat,
        value: u8,
        actions_left: u8,
    },

    /// Whole refresh intervals elapsed and actions came back.
    ActionsRestored { restored: u8, actions: u8 },

    /// An interaction was refused.
    ActionRejected(Rejected),

    /// The pet got a new title.
    Renamed(String),

    /// The transient notice expired.
    NoticeDismissed,

    /// The store failed a read or a write.
    StoreFailed(StoreError),
}

/// A point-in-time view of the pet suitable for logging or display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetSummary {
    pub title: String,
    pub stage: Stage,
    pub health: u8,
    pub energy: u8,
    pub happiness: u8,
    /// Filled hearts in the happiness gauge.
    pub hearts: u8,
    pub actions: u8,
}

impl PetSummary {
    pub fn of(pet: &PetState, max_stat_value: u8) -> Self {
        Self {
            title: pet.title.clone(),
            stage: pet.stage,
            health: pet.health,
            energy: pet.energy,
            happiness: pet.happiness,
            hearts: pet.hearts(max_stat_value),
            actions: pet.actions_remaining(),
        }
    }
}
