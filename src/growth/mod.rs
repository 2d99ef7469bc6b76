//! Function-pointer growth-stage machine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  StageTable                                          │
//! │  ┌────────┬───────────┬──────────────────────────┐   │
//! │  │ Stage  │ on_enter  │ on_update                │   │
//! │  ├────────┼───────────┼──────────────────────────┤   │
//! │  │ Egg    │ fn(ctx)   │ fn(&ctx) -> Option<Stage>│   │
//! │  │ Baby   │ fn(ctx)   │ fn(&ctx) -> Option<Stage>│   │
//! │  │ Adult  │ fn(ctx)   │ fn(&ctx) -> Option<Stage>│   │
//! │  │ Dead   │ fn(ctx)   │ fn(&ctx) -> Option<Stage>│   │
//! │  └────────┴───────────┴──────────────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a long-lived controller FSM, the current stage is not held here:
//! it is read from the [`PetState`] in the context on every evaluation.
//! The machine itself is immutable and can be shared freely.
//!
//! An evaluation keeps applying transitions until the current stage's
//! handler asks for none, so a pet whose next-stage timestamp is unset can
//! pass through several stages at one instant.  Stages only ever move
//! forward (`Egg < Baby < Adult < Dead`); the single way back is
//! [`GrowthMachine::force`], used by reset.

pub mod stages;

use log::info;

use crate::config::PetConfig;
use crate::pet::{Millis, PetState, Stage};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a stage handler may look at or touch.
pub struct GrowthContext<'a> {
    pub pet: &'a mut PetState,
    pub now: Millis,
    pub config: &'a PetConfig,
}

impl GrowthContext<'_> {
    /// Time since `since`, saturating at zero on clock skew.
    pub fn age_since(&self, since: Option<Millis>) -> Option<Millis> {
        since.map(|t| self.now.saturating_sub(t))
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs once when a stage is entered.
pub type StageActionFn = fn(&mut GrowthContext<'_>);

/// Per-evaluation handler.  Returns `Some(next)` to request a transition.
pub type StageUpdateFn = fn(&GrowthContext<'_>) -> Option<Stage>;

/// Static descriptor for a single stage.
pub struct StageDescriptor {
    pub id: Stage,
    pub name: &'static str,
    pub on_enter: Option<StageActionFn>,
    pub on_update: StageUpdateFn,
}

/// A stage change reported by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

pub struct GrowthMachine {
    /// Fixed-size table indexed by `Stage as usize`.
    table: [StageDescriptor; Stage::COUNT],
}

impl Default for GrowthMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowthMachine {
    pub fn new() -> Self {
        Self {
            table: stages::build_stage_table(),
        }
    }

    /// Run update handlers until the stage settles.  Returns the overall
    /// move, first stage to last, if the stage changed.
    pub fn evaluate(&self, ctx: &mut GrowthContext<'_>) -> Option<Transition> {
        let from = ctx.pet.stage;

        // Every pass advances or stops, so the table size bounds the loop.
        for _ in 0..Stage::COUNT {
            let current = ctx.pet.stage;
            let Some(next) = (self.table[current as usize].on_update)(ctx) else {
                break;
            };
            if next <= current {
                debug_assert!(next == current, "stage regression {current:?} -> {next:?}");
                break;
            }
            self.enter(next, ctx);
        }

        let to = ctx.pet.stage;
        (to != from).then_some(Transition { from, to })
    }

    /// Jump to `stage` unconditionally, running its enter action even when
    /// the pet is already there.
    pub fn force(&self, stage: Stage, ctx: &mut GrowthContext<'_>) -> Transition {
        let from = ctx.pet.stage;
        self.enter(stage, ctx);
        Transition { from, to: stage }
    }

    /// Human-readable name of a stage, as registered in the table.
    pub fn name(&self, stage: Stage) -> &'static str {
        self.table[stage as usize].name
    }

    fn enter(&self, stage: Stage, ctx: &mut GrowthContext<'_>) {
        info!(
            "Growth: {} -> {}",
            self.table[ctx.pet.stage as usize].name,
            self.table[stage as usize].name
        );
        ctx.pet.stage = stage;
        if let Some(enter) = self.table[stage as usize].on_enter {
            enter(ctx);
        }
    }
}
