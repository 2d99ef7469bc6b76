//! Application core: pet rules orchestration, zero I/O.
//!
//! This module ties the pure engines (decay, growth, action economy) to the
//! signed-in user's stored record.  All interaction with the outside world
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without a real backend.

pub mod commands;
pub mod events;
pub mod notice;
pub mod ports;
pub mod service;
