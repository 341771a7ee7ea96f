use super::ComponentProvider;
use crate::component::instance::erase;
use crate::component::Instance;
use crate::context::Context;
use std::sync::Arc;
use wirebox_core::WireboxResult;

/// Always hands out the same pre-built instance
pub struct ConstantProvider {
    instance: Instance,
}

impl ConstantProvider {
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            instance: erase(value),
        }
    }
}

impl ComponentProvider for ConstantProvider {
    fn get(&self, _context: &Context) -> WireboxResult<Instance> {
        Ok(Arc::clone(&self.instance))
    }
}
