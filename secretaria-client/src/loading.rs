//! Loading flag driven by drop guards.
//!
//! Every operation holds a [`LoadingGuard`] for its whole body, so the flag
//! drops back on success, on error and when the future is dropped mid-flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts operations in progress. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    in_progress: Arc<AtomicUsize>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one operation as started until the guard drops.
    pub fn enter(&self) -> LoadingGuard {
        self.in_progress.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_progress: Arc::clone(&self.in_progress),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
#[must_use = "loading is cleared as soon as the guard is dropped"]
pub struct LoadingGuard {
    in_progress: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_progress.fetch_sub(1, Ordering::SeqCst);
    }
}
