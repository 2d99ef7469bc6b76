//! Application service: the hexagonal core.
//!
//! [`PetService`] owns the decay engine, the action economy and the notice
//! board.  It holds no pet state between calls: every operation reads the
//! signed-in user's record through the [`PetStore`] port, runs the pure
//! rules, and writes back only the fields that changed.
//!
//! ```text
//!  IdentityPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                   │        PetService          │
//!  PetStore     ◀──▶│  Decay · Economy · Reset   │
//!                   └────────────────────────────┘
//! ```
//!
//! The host must not run two service calls concurrently for the same user;
//! each call assumes the record it reads reflects the previous call's write.

use log::{debug, info, warn};

use crate::config::PetConfig;
use crate::engine::{self, ActionEconomy, DecayEngine, Rejected};
use crate::error::Result;
use crate::pet::record::{Hydrated, PetRecord};
use crate::pet::{Interaction, Millis, PetState};

use super::commands::AppCommand;
use super::events::{AppEvent, PetSummary};
use super::notice::{Notice, NoticeBoard};
use super::ports::{Ack, EventSink, IdentityPort, Lookup, PetStore, UserId};

// ───────────────────────────────────────────────────────────────
// Results
// ───────────────────────────────────────────────────────────────

/// What a service call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nobody is signed in; nothing was read or written.
    Inert,
    /// The record is still loading; retry on the next poll.
    Pending,
    /// The record was read and nothing needed writing.
    Unchanged,
    /// A patch was accepted by the store.
    Persisted(Ack),
    /// The interaction was refused; nothing was written.
    Rejected(Rejected),
}

/// What the UI should show for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Render the sign-in affordance.
    SignedOut,
    /// Render a loading indicator.
    Loading,
    /// The user has no pet yet; the next service call creates one.
    Missing,
    Ready(PetSummary),
}

/// A record read for one operation.
struct Loaded {
    user: UserId,
    stored: PetRecord,
    hydrated: Hydrated,
    /// Set when the record did not exist and was just written.
    created: Option<Ack>,
}

enum Session {
    Inert,
    Pending,
    Ready(Loaded),
}

// ───────────────────────────────────────────────────────────────
// PetService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all pet rules for one session.
pub struct PetService {
    config: PetConfig,
    decay: DecayEngine,
    economy: ActionEconomy,
    notices: NoticeBoard,
    tick_count: u64,
}

impl PetService {
    /// Construct the service from a validated configuration.
    pub fn new(config: PetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            decay: DecayEngine::new(config.clone()),
            economy: ActionEconomy::new(config.clone()),
            notices: NoticeBoard::new(config.notice_duration_ms),
            config,
            tick_count: 0,
        })
    }

    // ── Periodic work ─────────────────────────────────────────

    /// Decay poll: apply elapsed-time decay and growth, persist if changed.
    pub fn tick(
        &mut self,
        now: Millis,
        identity: &impl IdentityPort,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        self.tick_count += 1;
        let loaded = match self.load(now, identity, store, sink)? {
            Session::Ready(l) => l,
            Session::Inert => return Ok(Outcome::Inert),
            Session::Pending => return Ok(Outcome::Pending),
        };

        let result = self.decay.tick(&loaded.hydrated.state, now);
        if !result.changed {
            return Ok(finish(&loaded, None));
        }

        let ack = self.persist(&loaded, &result.state, store, sink)?;
        if result.decayed_by > 0 {
            sink.emit(&AppEvent::Decayed {
                by: result.decayed_by,
                summary: self.summarize(&result.state),
            });
        }
        if let Some(t) = result.transition {
            sink.emit(&AppEvent::StageChanged {
                from: t.from,
                to: t.to,
            });
        }
        Ok(finish(&loaded, ack))
    }

    /// Restore poll: regenerate actions for whole elapsed refresh intervals.
    pub fn restore_actions(
        &mut self,
        now: Millis,
        identity: &impl IdentityPort,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let loaded = match self.load(now, identity, store, sink)? {
            Session::Ready(l) => l,
            Session::Inert => return Ok(Outcome::Inert),
            Session::Pending => return Ok(Outcome::Pending),
        };

        let restored = self.economy.restore(&loaded.hydrated.state, now);
        if !restored.changed {
            return Ok(finish(&loaded, None));
        }

        let ack = self.persist(&loaded, &restored.state, store, sink)?;
        if restored.restored > 0 {
            sink.emit(&AppEvent::ActionsRestored {
                restored: restored.restored,
                actions: restored.state.actions_remaining(),
            });
        }
        Ok(finish(&loaded, ack))
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a user command.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: Millis,
        identity: &impl IdentityPort,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let loaded = match self.load(now, identity, store, sink)? {
            Session::Ready(l) => l,
            Session::Inert => return Ok(Outcome::Inert),
            Session::Pending => return Ok(Outcome::Pending),
        };

        if let Some(interaction) = cmd.interaction() {
            return self.interact(interaction, &loaded, now, store, sink);
        }
        match cmd {
            AppCommand::Rename(title) => self.rename(&title, &loaded, store, sink),
            // Feed, play and clean were dispatched above.
            _ => {
                let next = engine::reset(&loaded.hydrated.state, now, &self.config);
                let ack = self.persist(&loaded, &next, store, sink)?;
                sink.emit(&AppEvent::Revived);
                Ok(finish(&loaded, ack))
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// What the UI should render right now.  Never writes.
    pub fn view(&self, identity: &impl IdentityPort, store: &impl PetStore) -> Result<View> {
        let Some(user) = identity.identity() else {
            return Ok(View::SignedOut);
        };
        Ok(match store.read(&user)? {
            Lookup::Pending => View::Loading,
            Lookup::NotFound => View::Missing,
            Lookup::Found(record) => {
                View::Ready(self.summarize(&record.hydrate(&self.config).state))
            }
        })
    }

    /// The transient notice still visible at `now`.
    pub fn notice(&self, now: Millis) -> Option<&Notice> {
        self.notices.active(now)
    }

    /// Drop the notice once its display time is over.
    pub fn expire_notice(&mut self, now: Millis, sink: &mut impl EventSink) -> bool {
        let expired = self.notices.expire(now);
        if expired {
            sink.emit(&AppEvent::NoticeDismissed);
        }
        expired
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    /// Decay polls executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn interact(
        &mut self,
        interaction: Interaction,
        loaded: &Loaded,
        now: Millis,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let consumed = match self.economy.try_consume(&loaded.hydrated.state, now) {
            Ok(state) => state,
            Err(rejected) => {
                warn!("{} rejected for {}: {}", interaction.as_str(), loaded.user, rejected);
                self.notices.raise(rejected.reason, now);
                sink.emit(&AppEvent::ActionRejected(rejected));
                return Ok(Outcome::Rejected(rejected));
            }
        };

        // Acting on a dead or corrupted pet revives it first.
        let revived = loaded.hydrated.needs_reset();
        let base = if revived {
            engine::reset(&consumed, now, &self.config)
        } else {
            consumed
        };
        let next = self.economy.apply_boost(&base, interaction, now);

        let ack = self.persist(loaded, &next, store, sink)?;
        if revived {
            sink.emit(&AppEvent::Revived);
        }
        let stat = interaction.target();
        sink.emit(&AppEvent::Interacted {
            interaction,
            stat,
            value: next.stat(stat),
            actions_left: next.actions_remaining(),
        });
        Ok(finish(loaded, ack))
    }

    fn rename(
        &self,
        title: &str,
        loaded: &Loaded,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Outcome> {
        let title = match title.trim() {
            "" => self.config.default_title.clone(),
            t => t.to_string(),
        };
        let mut next = loaded.hydrated.state.clone();
        next.title.clone_from(&title);

        let ack = self.persist(loaded, &next, store, sink)?;
        sink.emit(&AppEvent::Renamed(title));
        Ok(finish(loaded, ack))
    }

    /// Read the session's record, creating a fresh egg when none exists.
    fn load(
        &self,
        now: Millis,
        identity: &impl IdentityPort,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Session> {
        let Some(user) = identity.identity() else {
            return Ok(Session::Inert);
        };

        let lookup = store.read(&user).inspect_err(|e| {
            warn!("Read of {} failed: {}", user.pet_path(), e);
            sink.emit(&AppEvent::StoreFailed(*e));
        })?;

        match lookup {
            Lookup::Pending => Ok(Session::Pending),
            Lookup::Found(stored) => {
                let hydrated = stored.hydrate(&self.config);
                Ok(Session::Ready(Loaded {
                    user,
                    stored,
                    hydrated,
                    created: None,
                }))
            }
            Lookup::NotFound => {
                let pet = PetState::new(&self.config, now);
                let record = PetRecord::from_state(&pet);
                let ack = store.patch(&user, &record).inspect_err(|e| {
                    warn!("Create of {} failed: {}", user.pet_path(), e);
                    sink.emit(&AppEvent::StoreFailed(*e));
                })?;
                info!("Created pet at {}", user.pet_path());
                sink.emit(&AppEvent::Created(self.summarize(&pet)));

                let hydrated = record.hydrate(&self.config);
                Ok(Session::Ready(Loaded {
                    user,
                    stored: record,
                    hydrated,
                    created: Some(ack),
                }))
            }
        }
    }

    /// Write the fields of `next` that differ from what was read.
    fn persist(
        &self,
        loaded: &Loaded,
        next: &PetState,
        store: &mut impl PetStore,
        sink: &mut impl EventSink,
    ) -> Result<Option<Ack>> {
        let patch = PetRecord::diff(&loaded.stored, next);
        if patch.is_empty() {
            return Ok(None);
        }
        match store.patch(&loaded.user, &patch) {
            Ok(ack) => {
                debug!("Patched {} field(s) at {}", ack.fields, loaded.user.pet_path());
                Ok(Some(ack))
            }
            Err(e) => {
                warn!("Write to {} failed: {}", loaded.user.pet_path(), e);
                sink.emit(&AppEvent::StoreFailed(e));
                Err(e.into())
            }
        }
    }

    fn summarize(&self, pet: &PetState) -> PetSummary {
        PetSummary::of(pet, self.config.max_stat_value)
    }
}

fn finish(loaded: &Loaded, ack: Option<Ack>) -> Outcome {
    match ack.or(loaded.created) {
        Some(ack) => Outcome::Persisted(ack),
        None => Outcome::Unchanged,
    }
}
