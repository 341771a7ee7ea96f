use crate::component::{ComponentRef, Instance};
use crate::context::Context;
use super::guard::BuildGuard;
use crate::provider::ComponentProvider;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use wirebox_core::WireboxResult;

/// Builds the inner component once and hands out that instance forever
///
/// Concurrent first callers block until the single construction finishes.
/// A failed construction is not cached; the next call tries again. A call
/// made from inside the build on the same thread fails with
/// [`WireboxError::ReentrantBuild`](wirebox_core::WireboxError::ReentrantBuild).
pub struct SingletonProvider {
    inner: Arc<dyn ComponentProvider>,
    instance: OnceCell<Instance>,
    guard: BuildGuard,
}

impl SingletonProvider {
    pub fn new(inner: Arc<dyn ComponentProvider>) -> Self {
        Self {
            inner,
            instance: OnceCell::new(),
            guard: BuildGuard::new("singleton"),
        }
    }

    pub fn is_populated(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl ComponentProvider for SingletonProvider {
    fn get(&self, context: &Context) -> WireboxResult<Instance> {
        if let Some(instance) = self.instance.get() {
            return Ok(Arc::clone(instance));
        }
        self.guard.check()?;
        let instance = self.instance.get_or_try_init(|| {
            let _building = self.guard.enter();
            tracing::debug!("Populating singleton scope");
            self.inner.get(context)
        })?;
        Ok(Arc::clone(instance))
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
