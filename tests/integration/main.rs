//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific flow against
//! in-memory adapters.  No backend or wall clock is required.

mod mock_ports;
mod scheduler_flow_tests;
mod service_tests;
