use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Liveness flag owned by one editor instance.
///
/// Set on creation and cleared exactly once on teardown. Every completion
/// handler checks it before touching editor state. Clones share the flag, and
/// the handle is `Send + Sync` so a host can clear it from its own cleanup
/// hooks.
#[derive(Debug, Clone)]
pub struct MountToken {
    live: Arc<AtomicBool>,
}

impl MountToken {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Clear the flag. Returns `true` only for the call that performed the
    /// transition.
    pub fn clear(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

impl Default for MountToken {
    fn default() -> Self {
        Self::new()
    }
}
