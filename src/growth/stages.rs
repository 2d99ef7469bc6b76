//! Concrete stage handlers and table builder.
//!
//! ```text
//!  EGG ──[health>60, energy>60, ready]──▶ BABY ──[health>80, energy>80, ready]──▶ ADULT
//!   │                                     │                                     │
//!   └──────────────[health == 0]──────────┴──────────────[health == 0]──────────┘
//!                                         ▼
//!                                       DEAD  (left only through reset)
//! ```
//!
//! A stage is ready to advance once it has an entry time and either the
//! next stage has never been entered or `stage_duration_ms` has passed.

use super::{GrowthContext, StageDescriptor};
use crate::pet::{Millis, Stage};
use log::{info, warn};

/// Build the static stage table.
pub fn build_stage_table() -> [StageDescriptor; Stage::COUNT] {
    [
        // Index 0: Egg
        StageDescriptor {
            id: Stage::Egg,
            name: "Egg",
            on_enter: Some(egg_enter),
            on_update: egg_update,
        },
        // Index 1: Baby
        StageDescriptor {
            id: Stage::Baby,
            name: "Baby",
            on_enter: Some(baby_enter),
            on_update: baby_update,
        },
        // Index 2: Adult
        StageDescriptor {
            id: Stage::Adult,
            name: "Adult",
            on_enter: Some(adult_enter),
            on_update: adult_update,
        },
        // Index 3: Dead
        StageDescriptor {
            id: Stage::Dead,
            name: "Dead",
            on_enter: Some(dead_enter),
            on_update: dead_update,
        },
    ]
}

/// Shared guard for every living stage.
fn starved(ctx: &GrowthContext<'_>) -> bool {
    ctx.pet.health == 0
}

/// Readiness of the stage entered at `entered`, given when the next stage
/// was entered (if ever).
fn ready(ctx: &GrowthContext<'_>, entered: Option<Millis>, next_entered: Option<Millis>) -> bool {
    match (ctx.age_since(entered), next_entered) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(age), Some(_)) => age > ctx.config.stage_duration_ms,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  EGG
// ═══════════════════════════════════════════════════════════════════════════

fn egg_enter(ctx: &mut GrowthContext<'_>) {
    ctx.pet.egg_time = Some(ctx.now);
    ctx.pet.baby_time = None;
    ctx.pet.adult_time = None;
    info!("EGG: laid at {}", ctx.now);
}

fn egg_update(ctx: &GrowthContext<'_>) -> Option<Stage> {
    if starved(ctx) {
        return Some(Stage::Dead);
    }

    let threshold = ctx.config.hatch_threshold;
    if ctx.pet.health > threshold
        && ctx.pet.energy > threshold
        && ready(ctx, ctx.pet.egg_time, ctx.pet.baby_time)
    {
        return Some(Stage::Baby);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  BABY
// ═══════════════════════════════════════════════════════════════════════════

fn baby_enter(ctx: &mut GrowthContext<'_>) {
    ctx.pet.baby_time = Some(ctx.now);
    info!(
        "BABY: hatched with health={} energy={}",
        ctx.pet.health, ctx.pet.energy
    );
}

fn baby_update(ctx: &GrowthContext<'_>) -> Option<Stage> {
    if starved(ctx) {
        return Some(Stage::Dead);
    }

    let threshold = ctx.config.mature_threshold;
    if ctx.pet.health > threshold
        && ctx.pet.energy > threshold
        && ready(ctx, ctx.pet.baby_time, ctx.pet.adult_time)
    {
        return Some(Stage::Adult);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ADULT
// ═══════════════════════════════════════════════════════════════════════════

fn adult_enter(ctx: &mut GrowthContext<'_>) {
    ctx.pet.adult_time = Some(ctx.now);
    info!("ADULT: fully grown");
}

fn adult_update(ctx: &GrowthContext<'_>) -> Option<Stage> {
    if starved(ctx) {
        return Some(Stage::Dead);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DEAD
// ═══════════════════════════════════════════════════════════════════════════

fn dead_enter(ctx: &mut GrowthContext<'_>) {
    warn!(
        "DEAD: health reached zero (energy={} happiness={})",
        ctx.pet.energy, ctx.pet.happiness
    );
}

fn dead_update(_ctx: &GrowthContext<'_>) -> Option<Stage> {
    None
}
