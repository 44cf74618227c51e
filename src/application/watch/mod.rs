//! Watch Use Case
//!
//! Polls the source host on a fixed interval and redeploys services whose
//! remote head moved away from the deployed commit.
//!
//! ## Architecture
//!
//! - `WatchUseCase` - The polling loop and per-tick reconciliation
//! - `WatchEvent` - Events emitted during watch operation
//! - `ChangeDetector` (domain) - The SYNCED/STALE transitions
//!
//! ## Usage
//!
//! ```ignore
//! let options = WatchOptions::new(repositories, Duration::from_secs(300));
//! let use_case = WatchUseCase::new(deploy, state_repo, options);
//! use_case.start(running, |event| { ... })?;
//! ```

mod event;
mod use_case;


pub use event::{WatchEvent, WatchOptions};
pub use use_case::{TickOutcome, WatchUseCase};
