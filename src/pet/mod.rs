//! The pet record and its vocabulary.
//!
//! [`PetState`] is plain data: the engines in [`crate::engine`] read one and
//! return a new one.  The wire shape exchanged with stores lives in
//! [`record`].

pub mod record;

use serde::{Deserialize, Serialize};

use crate::config::PetConfig;

/// Milliseconds since the Unix epoch (or any monotonic origin the host picks).
pub type Millis = u64;

/// Number of hearts in the happiness gauge.
pub const HEART_COUNT: u8 = 5;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Life-cycle phase.  Ordered by forward progression; `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Stage {
    Egg = 0,
    Baby = 1,
    Adult = 2,
    Dead = 3,
}

impl Stage {
    /// Total number of stages, used to size the growth table.
    pub const COUNT: usize = 4;

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Egg,
            1 => Self::Baby,
            2 => Self::Adult,
            _ => {
                debug_assert!(idx == 3, "invalid stage index: {idx}");
                Self::Dead
            }
        }
    }

    /// Lowercase name as stored in the record.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Egg => "egg",
            Self::Baby => "baby",
            Self::Adult => "adult",
            Self::Dead => "dead",
        }
    }

    /// Parse a stored stage name.  Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "egg" => Some(Self::Egg),
            "baby" => Some(Self::Baby),
            "adult" => Some(Self::Adult),
            "dead" => Some(Self::Dead),
            _ => None,
        }
    }

    pub fn is_dead(self) -> bool {
        self == Self::Dead
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stats and interactions
// ---------------------------------------------------------------------------

/// One of the three decaying stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    Energy,
    Happiness,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Health, Stat::Energy, Stat::Happiness];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Energy => "energy",
            Self::Happiness => "happiness",
        }
    }
}

/// A user interaction.  Each one spends an action and boosts one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Feed,
    Play,
    Clean,
}

impl Interaction {
    /// The stat this interaction restores.
    pub fn target(self) -> Stat {
        match self {
            Self::Feed => Stat::Energy,
            Self::Play => Stat::Happiness,
            Self::Clean => Stat::Health,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Clean => "clean",
        }
    }
}

// ---------------------------------------------------------------------------
// PetState
// ---------------------------------------------------------------------------

/// One user's pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetState {
    pub health: u8,
    pub energy: u8,
    pub happiness: u8,
    pub stage: Stage,
    pub title: String,

    /// When each stage was entered.
    pub egg_time: Option<Millis>,
    pub baby_time: Option<Millis>,
    pub adult_time: Option<Millis>,

    /// Last time decay was applied.  `None` on records that predate decay.
    pub last_updated: Option<Millis>,

    /// Remaining interactions.  `None` on records that predate the economy.
    pub actions: Option<u8>,
    /// Anchor of the current regeneration window.
    pub last_action_refresh: Option<Millis>,
}

impl PetState {
    /// A freshly hatched record: full stats, full action pool, every
    /// timestamp at `now`.
    pub fn new(config: &PetConfig, now: Millis) -> Self {
        Self {
            health: config.max_stat_value,
            energy: config.max_stat_value,
            happiness: config.max_stat_value,
            stage: Stage::Egg,
            title: config.default_title.clone(),
            egg_time: Some(now),
            baby_time: None,
            adult_time: None,
            last_updated: Some(now),
            actions: Some(config.max_actions),
            last_action_refresh: Some(now),
        }
    }

    pub fn stat(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Health => self.health,
            Stat::Energy => self.energy,
            Stat::Happiness => self.happiness,
        }
    }

    pub fn stat_mut(&mut self, stat: Stat) -> &mut u8 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Energy => &mut self.energy,
            Stat::Happiness => &mut self.happiness,
        }
    }

    /// Actions left, treating a missing pool as empty.
    pub fn actions_remaining(&self) -> u8 {
        self.actions.unwrap_or(0)
    }

    /// Filled hearts out of [`HEART_COUNT`] for the happiness gauge.
    pub fn hearts(&self, max_stat_value: u8) -> u8 {
        if max_stat_value == 0 {
            return 0;
        }
        let ratio = f32::from(self.happiness.min(max_stat_value)) / f32::from(max_stat_value);
        (ratio * f32::from(HEART_COUNT)).round() as u8
    }
}
