//! Pet simulation parameters
//!
//! Every tunable of the decay, growth and action-economy rules lives here.
//! The engines receive a `PetConfig` at construction; nothing in the core
//! hardcodes an interval or threshold.

use serde::{Deserialize, Serialize};

use crate::pet::Millis;

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    // --- Stats ---
    /// Upper bound for health, energy and happiness
    pub max_stat_value: u8,
    /// Amount a single interaction adds to its target stat
    pub stat_boost: u8,

    // --- Decay ---
    /// One stat point is lost per elapsed interval (milliseconds)
    pub decay_interval_ms: Millis,

    // --- Growth ---
    /// Minimum time spent in a stage before the next one (milliseconds)
    pub stage_duration_ms: Millis,
    /// Health and energy must both exceed this to hatch (egg -> baby)
    pub hatch_threshold: u8,
    /// Health and energy must both exceed this to mature (baby -> adult)
    pub mature_threshold: u8,

    // --- Action economy ---
    /// Size of the action pool
    pub max_actions: u8,
    /// One action regenerates per elapsed interval (milliseconds)
    pub action_refresh_interval_ms: Millis,

    // --- Host timing ---
    /// How often the host evaluates decay (milliseconds)
    pub decay_poll_ms: Millis,
    /// How often the host evaluates action regeneration (milliseconds)
    pub restore_poll_ms: Millis,
    /// How long the "no actions remaining" notice stays visible (milliseconds)
    pub notice_duration_ms: Millis,

    // --- Presentation ---
    /// Title given to new pets and to blank renames
    pub default_title: String,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            // Stats
            max_stat_value: 100,
            stat_boost: 10,

            // Decay
            decay_interval_ms: 5_000, // 1 point / 5 s

            // Growth
            stage_duration_ms: 300_000, // 5 min
            hatch_threshold: 60,
            mature_threshold: 80,

            // Action economy
            max_actions: 5,
            action_refresh_interval_ms: 600_000, // 1 action / 10 min

            // Host timing
            decay_poll_ms: 1_000,    // 1 Hz
            restore_poll_ms: 10_000, // every 10 s
            notice_duration_ms: 3_000,

            default_title: String::from("My Kempigotchi"),
        }
    }
}

/// Errors from [`PetConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl PetConfig {
    /// Range-check every field.
    ///
    /// Invalid values are rejected, never clamped: a zero interval would turn
    /// the decay division into a panic and a zero pool would lock the pet.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stat_value == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_stat_value must be at least 1",
            ));
        }
        if self.stat_boost == 0 || self.stat_boost > self.max_stat_value {
            return Err(ConfigError::ValidationFailed(
                "stat_boost must be 1..=max_stat_value",
            ));
        }
        if self.decay_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "decay_interval_ms must be non-zero",
            ));
        }
        if self.stage_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "stage_duration_ms must be non-zero",
            ));
        }
        if self.hatch_threshold >= self.max_stat_value
            || self.mature_threshold >= self.max_stat_value
        {
            return Err(ConfigError::ValidationFailed(
                "growth thresholds must be below max_stat_value",
            ));
        }
        if self.max_actions == 0 {
            return Err(ConfigError::ValidationFailed("max_actions must be at least 1"));
        }
        if self.action_refresh_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "action_refresh_interval_ms must be non-zero",
            ));
        }
        if self.decay_poll_ms == 0 || self.restore_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "poll intervals must be non-zero",
            ));
        }
        if self.default_title.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "default_title must not be blank",
            ));
        }
        Ok(())
    }

    /// Parse a JSON config document and validate it.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|_| ConfigError::ValidationFailed("config is not valid JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
