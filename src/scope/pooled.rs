use crate::component::{ComponentRef, Instance};
use crate::context::Context;
use super::guard::BuildGuard;
use crate::provider::ComponentProvider;
use parking_lot::Mutex;
use std::sync::Arc;
use wirebox_core::WireboxResult;

#[derive(Default)]
struct Pool {
    instances: Vec<Instance>,
    cursor: usize,
}

/// Keeps up to `size` instances and hands them out round-robin
///
/// While the pool is not full every call builds one more instance. The lock
/// is held across construction so appends and rotation never interleave; a
/// request from inside that construction on the same thread is refused.
pub struct PooledProvider {
    inner: Arc<dyn ComponentProvider>,
    size: usize,
    pool: Mutex<Pool>,
    guard: BuildGuard,
}

impl PooledProvider {
    pub fn new(inner: Arc<dyn ComponentProvider>, size: usize) -> Self {
        Self {
            inner,
            size: size.max(1),
            pool: Mutex::new(Pool::default()),
            guard: BuildGuard::new("pooled"),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Instances built so far
    pub fn built(&self) -> usize {
        self.pool.lock().instances.len()
    }
}

impl ComponentProvider for PooledProvider {
    fn get(&self, context: &Context) -> WireboxResult<Instance> {
        self.guard.check()?;
        let mut pool = self.pool.lock();
        if pool.instances.len() < self.size {
            let instance = {
                let _building = self.guard.enter();
                self.inner.get(context)?
            };
            pool.instances.push(instance);
            tracing::debug!(built = pool.instances.len(), size = self.size, "Grew pooled scope");
        }
        let index = pool.cursor % self.size;
        pool.cursor = pool.cursor.wrapping_add(1);
        Ok(Arc::clone(&pool.instances[index]))
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
