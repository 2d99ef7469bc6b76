//! Pure simulation rules.
//!
//! Every function here takes a state and an explicit `now` and returns a new
//! state.  No engine holds timers, touches I/O or keeps anything between
//! calls; scheduling and persistence belong to the [`app`](crate::app) layer.

pub mod decay;
pub mod economy;
pub mod reset;

pub use decay::{DecayEngine, TickResult};
pub use economy::{ActionEconomy, Rejected, Restored};
pub use reset::reset;
