//! Port traits: the hexagonal boundary between the pet rules and the host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PetService (domain)
//! ```
//!
//! Driven adapters (remote store, sign-in session, clock, event sinks)
//! implement these traits.  [`PetService`](super::service::PetService)
//! consumes them via generics, so the domain core never talks to a database
//! or an auth provider directly.
//!
//! ## Contract notes
//!
//! - **PetStore** implementations merge patches field by field; a JSON
//!   `null` in a patch deletes the field.
//! - The host serializes calls: a read must observe the previous write from
//!   the same session.
//! - Store errors are surfaced, never retried here.

use crate::pet::Millis;
use crate::pet::record::PetRecord;

// ───────────────────────────────────────────────────────────────
// Identity
// ───────────────────────────────────────────────────────────────

/// Opaque id of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of this user's pet in the remote document tree.
    pub fn pet_path(&self) -> String {
        format!("/users/{}/petData", self.0)
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is signed in.  `None` leaves the core inert.
pub trait IdentityPort {
    fn identity(&self) -> Option<UserId>;
}

// ───────────────────────────────────────────────────────────────
// Store port (driven adapter: domain ↔ remote database)
// ───────────────────────────────────────────────────────────────

/// Answer to a [`PetStore::read`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The stored document, as raw as the store holds it.
    Found(PetRecord),
    /// The user has no pet yet.
    NotFound,
    /// A load is still in flight; try again on the next poll.
    Pending,
}

/// Acknowledgement of an accepted patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Number of fields the patch carried.
    pub fields: usize,
}

/// Keyed record store with get / partial-update semantics.
pub trait PetStore {
    fn read(&self, user: &UserId) -> Result<Lookup, StoreError>;

    /// Merge `patch` into the user's record, creating it if absent.
    fn patch(&mut self, user: &UserId, patch: &PetRecord) -> Result<Ack, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Wall-clock source for the host loop.  The core itself only ever
/// receives `now` as an argument.
pub trait ClockPort {
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, UI refresh).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the service)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a schedule fires.
///
/// The host loop implements this and maps labels onto service calls; the
/// scheduler itself knows nothing about pets.
pub trait SchedulerDelegate {
    fn on_schedule_fired(&mut self, label: &str, kind: ScheduleFiredKind);
}

/// Discriminant passed to [`SchedulerDelegate::on_schedule_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFiredKind {
    /// A recurring poll fired.
    Periodic,
    /// A one-shot timer fired (auto-disables after).
    OneShot,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PetStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached.
    Unavailable,
    /// The backend refused the operation (rules, quota, auth).
    Denied,
    /// The stored document could not be decoded.
    Corrupt,
    /// Local I/O failure.
    IoError,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::Denied => write!(f, "store denied the request"),
            Self::Corrupt => write!(f, "stored document corrupted"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for StoreError {}
