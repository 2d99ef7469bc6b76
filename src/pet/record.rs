//! Wire shape of a pet record.
//!
//! Stores hand back whatever the remote document holds, so every field is
//! optional and every numeric field is kept as a raw JSON value until
//! [`PetRecord::hydrate`] turns it into a [`PetState`].  Anything that is
//! not a usable number is coerced to zero there and the result is flagged
//! [`Integrity::Coerced`] so the service can schedule a reset.
//!
//! The same type doubles as a patch: `None` leaves a stored field alone, a
//! JSON `null` deletes it, any other value overwrites it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Millis, PetState, Stage};
use crate::config::PetConfig;

/// Raw pet document, also used as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub happiness: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg_time: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baby_time: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adult_time: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action_refresh: Option<Value>,
}

/// Whether hydration had to repair the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrity {
    /// Every field was usable as stored.
    Sound,
    /// At least one stat (or the stage) was missing or non-numeric and was
    /// coerced.  The pet must be reset before an interaction applies.
    Coerced,
}

/// Result of [`PetRecord::hydrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydrated {
    pub state: PetState,
    pub integrity: Integrity,
}

impl Hydrated {
    /// Dead pets and repaired records are reset before any interaction.
    pub fn needs_reset(&self) -> bool {
        self.state.stage.is_dead() || self.integrity == Integrity::Coerced
    }
}

impl PetRecord {
    /// Build a typed state out of the raw document.
    pub fn hydrate(&self, config: &PetConfig) -> Hydrated {
        let mut coerced = false;
        let max = config.max_stat_value;

        let mut stat = |v: &Option<Value>| match v.as_ref().and_then(as_number) {
            Some(n) => clamp_u8(n, max),
            None => {
                coerced = true;
                0
            }
        };
        let health = stat(&self.health);
        let energy = stat(&self.energy);
        let happiness = stat(&self.happiness);

        let stage = match &self.stage {
            None => Stage::Egg,
            Some(Value::String(name)) => Stage::parse(name).unwrap_or_else(|| {
                coerced = true;
                Stage::Egg
            }),
            Some(_) => {
                coerced = true;
                Stage::Egg
            }
        };

        let title = match &self.title {
            Some(Value::String(t)) if !t.trim().is_empty() => t.clone(),
            _ => config.default_title.clone(),
        };

        let state = PetState {
            health,
            energy,
            happiness,
            stage,
            title,
            egg_time: millis(&self.egg_time),
            baby_time: millis(&self.baby_time),
            adult_time: millis(&self.adult_time),
            last_updated: millis(&self.last_updated),
            actions: self
                .actions
                .as_ref()
                .and_then(as_number)
                .map(|n| clamp_u8(n, config.max_actions)),
            last_action_refresh: millis(&self.last_action_refresh),
        };

        Hydrated {
            state,
            integrity: if coerced {
                Integrity::Coerced
            } else {
                Integrity::Sound
            },
        }
    }

    /// Every populated field of `state`.  Unset optional fields stay `None`.
    pub fn from_state(state: &PetState) -> Self {
        Self {
            health: Some(Value::from(state.health)),
            energy: Some(Value::from(state.energy)),
            happiness: Some(Value::from(state.happiness)),
            stage: Some(Value::from(state.stage.as_str())),
            title: Some(Value::from(state.title.as_str())),
            egg_time: state.egg_time.map(Value::from),
            baby_time: state.baby_time.map(Value::from),
            adult_time: state.adult_time.map(Value::from),
            last_updated: state.last_updated.map(Value::from),
            actions: state.actions.map(Value::from),
            last_action_refresh: state.last_action_refresh.map(Value::from),
        }
    }

    /// The patch that turns `stored` into `state`.
    ///
    /// Fields whose stored value already equals the new one are omitted;
    /// fields that became unset are sent as `null` (delete).
    pub fn diff(stored: &PetRecord, state: &PetState) -> Self {
        let next = Self::from_state(state);
        Self {
            health: changed(&stored.health, next.health),
            energy: changed(&stored.energy, next.energy),
            happiness: changed(&stored.happiness, next.happiness),
            stage: changed(&stored.stage, next.stage),
            title: changed(&stored.title, next.title),
            egg_time: changed(&stored.egg_time, next.egg_time),
            baby_time: changed(&stored.baby_time, next.baby_time),
            adult_time: changed(&stored.adult_time, next.adult_time),
            last_updated: changed(&stored.last_updated, next.last_updated),
            actions: changed(&stored.actions, next.actions),
            last_action_refresh: changed(&stored.last_action_refresh, next.last_action_refresh),
        }
    }

    /// Apply a patch in place (store-side merge).
    pub fn merge(&mut self, patch: &PetRecord) {
        merge_field(&mut self.health, &patch.health);
        merge_field(&mut self.energy, &patch.energy);
        merge_field(&mut self.happiness, &patch.happiness);
        merge_field(&mut self.stage, &patch.stage);
        merge_field(&mut self.title, &patch.title);
        merge_field(&mut self.egg_time, &patch.egg_time);
        merge_field(&mut self.baby_time, &patch.baby_time);
        merge_field(&mut self.adult_time, &patch.adult_time);
        merge_field(&mut self.last_updated, &patch.last_updated);
        merge_field(&mut self.actions, &patch.actions);
        merge_field(&mut self.last_action_refresh, &patch.last_action_refresh);
    }

    /// Number of fields a patch would touch.
    pub fn field_count(&self) -> usize {
        [
            &self.health,
            &self.energy,
            &self.happiness,
            &self.stage,
            &self.title,
            &self.egg_time,
            &self.baby_time,
            &self.adult_time,
            &self.last_updated,
            &self.actions,
            &self.last_action_refresh,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn as_number(v: &Value) -> Option<f64> {
    v.as_f64().filter(|n| n.is_finite())
}

fn clamp_u8(n: f64, max: u8) -> u8 {
    n.clamp(0.0, f64::from(max)) as u8
}

fn millis(v: &Option<Value>) -> Option<Millis> {
    let n = v.as_ref().and_then(as_number)?;
    if n < 0.0 {
        return None;
    }
    Some(n as Millis)
}

fn changed(stored: &Option<Value>, next: Option<Value>) -> Option<Value> {
    match (stored, next) {
        (None, None) => None,
        (Some(_), None) => Some(Value::Null),
        (Some(old), Some(new)) if *old == new => None,
        (_, Some(new)) => Some(new),
    }
}

fn merge_field(dst: &mut Option<Value>, src: &Option<Value>) {
    match src {
        None => {}
        Some(Value::Null) => *dst = None,
        Some(v) => *dst = Some(v.clone()),
    }
}
