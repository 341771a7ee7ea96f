use super::ComponentProvider;
use crate::component::instance::erase;
use crate::component::{ComponentRef, Implements, Instance};
use crate::context::Context;
use crate::introspect::{Component, InjectionPlan};
use std::marker::PhantomData;
use std::sync::Arc;
use wirebox_core::{ComponentKey, WireboxError, WireboxResult};

/// Builds a fresh `C` on every call and hands it out as an `I`
///
/// Dependencies are resolved through the context first, in the plan's
/// `required` order; any error there is returned unchanged.
pub struct InjectionProvider<C, I: ?Sized> {
    plan: InjectionPlan<C>,
    _capability: PhantomData<fn() -> Box<I>>,
}

impl<C, I> InjectionProvider<C, I>
where
    C: Component + Implements<I>,
    I: ?Sized + Send + Sync + 'static,
{
    pub fn new(plan: InjectionPlan<C>) -> Self {
        Self {
            plan,
            _capability: PhantomData,
        }
    }
}

impl<C, I> ComponentProvider for InjectionProvider<C, I>
where
    C: Component + Implements<I>,
    I: ?Sized + Send + Sync + 'static,
{
    fn get(&self, context: &Context) -> WireboxResult<Instance> {
        let mut injected = Vec::with_capacity(self.plan.required().len());
        for dependency in self.plan.required() {
            let value = context.resolve(dependency)?.ok_or_else(|| {
                WireboxError::construction(
                    ComponentKey::of::<C>(),
                    anyhow::anyhow!("dependency {} is not bound", dependency),
                )
            })?;
            injected.push(value);
        }

        let component = self
            .plan
            .instantiate(injected)
            .map_err(|e| WireboxError::construction(ComponentKey::of::<C>(), e))?;
        tracing::trace!(component = self.plan.type_name(), "Constructed component");

        Ok(erase(<C as Implements<I>>::upcast(Arc::new(component))))
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.plan.required().to_vec()
    }
}
