use parking_lot::Mutex;
use std::thread::{self, ThreadId};
use wirebox_core::{WireboxError, WireboxResult};

/// Tracks which thread, if any, is inside a scope's build
///
/// Other threads wait while one thread builds; a request from the building
/// thread itself is refused.
pub(crate) struct BuildGuard {
    scope: &'static str,
    builder: Mutex<Option<ThreadId>>,
}

impl BuildGuard {
    pub(crate) fn new(scope: &'static str) -> Self {
        Self {
            scope,
            builder: Mutex::new(None),
        }
    }

    /// Fail if the current thread is already building this scope
    pub(crate) fn check(&self) -> WireboxResult<()> {
        if *self.builder.lock() == Some(thread::current().id()) {
            tracing::debug!(scope = self.scope, "Refused reentrant build");
            return Err(WireboxError::ReentrantBuild { scope: self.scope });
        }
        Ok(())
    }

    /// Mark the current thread as the builder until the returned value drops
    pub(crate) fn enter(&self) -> Building<'_> {
        *self.builder.lock() = Some(thread::current().id());
        Building { guard: self }
    }
}

pub(crate) struct Building<'a> {
    guard: &'a BuildGuard,
}

impl Drop for Building<'_> {
    fn drop(&mut self) {
        *self.guard.builder.lock() = None;
    }
}
