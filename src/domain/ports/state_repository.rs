//! StateRepository port
//!
//! Persists the watcher's deployed commits between runs.

use crate::domain::entities::WatchState;
use crate::error::DeployResult;

pub trait StateRepository {
    /// Load saved state; a missing store yields an empty `WatchState`
    fn load(&self) -> DeployResult<WatchState>;

    fn save(&self, state: &WatchState) -> DeployResult<()>;

    /// Where state is kept, for display
    fn location(&self) -> Option<String> {
        None
    }
}

impl<T: StateRepository + ?Sized> StateRepository for Box<T> {
    fn load(&self) -> DeployResult<WatchState> {
        (**self).load()
    }

    fn save(&self, state: &WatchState) -> DeployResult<()> {
        (**self).save(state)
    }

    fn location(&self) -> Option<String> {
        (**self).location()
    }
}

/// Process-local state store, used when no state file is wanted
pub struct InMemoryStateRepository {
    state: std::sync::Mutex<Option<WatchState>>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self {
            state: std::sync::Mutex::new(None),
        }
    }
}

impl Default for InMemoryStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepository {
    fn load(&self) -> DeployResult<WatchState> {
        Ok(self
            .state
            .lock()
            .ok()
            .and_then(|s| s.clone())
            .unwrap_or_default())
    }

    fn save(&self, state: &WatchState) -> DeployResult<()> {
        if let Ok(mut guard) = self.state.lock() {
            *guard = Some(state.clone());
        }
        Ok(())
    }
}
