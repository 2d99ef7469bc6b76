//! Kempigotchi virtual pet core.
//!
//! Exposes the pet rules (decay, growth, action economy, reset), the
//! application service that applies them to a stored record, and the
//! adapters the host binary wires together.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod growth;
pub mod pet;
pub mod scheduler;
