//! Repository Implementations
//!
//! Persistent storage adapters for domain ports.

mod state;

pub use state::{TomlStateRepository, STATE_DIR, STATE_FILE};
