//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                    |
//! |----------------|-----------------|--------------------------------|
//! | `file_store`   | PetStore        | JSON document on disk          |
//! | `memory_store` | PetStore        | In-process map (sim / tests)   |
//! | `identity`     | IdentityPort    | User id given at startup       |
//! | `log_sink`     | EventSink       | `log` facade                   |
//! | `time`         | ClockPort       | System clock / manual clock    |
//! | `console_log`  | (`log` backend) | stderr                         |

pub mod console_log;
pub mod file_store;
pub mod identity;
pub mod log_sink;
pub mod memory_store;
pub mod time;
