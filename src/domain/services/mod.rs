//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod change_detector;

pub use change_detector::{ChangeDetector, Observation, Transition};
