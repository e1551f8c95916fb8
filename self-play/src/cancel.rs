use std::sync::Arc;

use engine::Search;
use parking_lot::Mutex;

#[derive(Default)]
struct CancelState {
    aborted: bool,
    active: Option<Arc<dyn Search>>,
}

/// Cancellation token shared between the play loop and any thread that may
/// abort it. Abort is level triggered and idempotent: once set it stays set,
/// and the active search, if any, is cancelled while the lock is held.
/// Installing a search re-checks the flag under the same lock, which closes
/// the window between a result check and the search starting.
#[derive(Default)]
pub struct CancelToken {
    inner: Mutex<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        let mut state = self.inner.lock();
        state.aborted = true;
        if let Some(search) = &state.active {
            search.abort();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.lock().aborted
    }

    /// Registers the search that a subsequent abort must cancel. Returns
    /// false, cancelling the search immediately, when abort was already
    /// requested; the caller must not run the search in that case.
    pub fn install(&self, search: Arc<dyn Search>) -> bool {
        let mut state = self.inner.lock();
        if state.aborted {
            search.abort();
            return false;
        }
        state.active = Some(search);
        true
    }

    /// Drops the active search once its run has returned.
    pub fn clear(&self) {
        self.inner.lock().active = None;
    }
}
