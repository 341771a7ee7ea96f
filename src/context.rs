//! The finalized, read-only query surface

use crate::component::{
    ComponentRef, Container, Deferred, ErasedDeferred, Injected, Ref, Resolved,
};
use crate::provider::ComponentProvider;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use wirebox_core::{ComponentKey, Qualifier, WireboxResult};

pub(crate) type Components = HashMap<ComponentKey, Arc<dyn ComponentProvider>>;

/// A validated, immutable set of bindings
///
/// Produced by [`ContextConfig::get_context`](crate::ContextConfig::get_context).
/// Cloning is cheap and every clone shares the same providers, so scoped
/// instances are shared too. Lookups are safe from any number of threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wirebox::{ContextConfig, Ref};
///
/// # fn example() -> wirebox::WireboxResult<()> {
/// let mut config = ContextConfig::new();
/// config.bind_instance(Arc::new("jdbc:sqlite::memory:".to_string()));
/// let context = config.get_context()?;
///
/// let url = context.instance::<String>()?.expect("bound above");
/// assert_eq!(url.as_str(), "jdbc:sqlite::memory:");
/// assert!(context.get(&Ref::<u32>::of())?.is_none());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone)]
pub struct Context {
    components: Arc<Components>,
}

impl Context {
    pub(crate) fn new(components: Components) -> Self {
        Self {
            components: Arc::new(components),
        }
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(HashMap::new())
    }

    /// Look up a component
    ///
    /// Returns `Ok(None)` when the key is not bound or the request uses a
    /// container other than [`Container::Deferred`]. Errors only come from
    /// construction recipes.
    pub fn get<T: ?Sized + Send + Sync + 'static>(
        &self,
        reference: &Ref<T>,
    ) -> WireboxResult<Option<Resolved<T>>> {
        let component = reference.component();
        match self.resolve(component)? {
            Some(injected) => Resolved::from_injected(injected, component.key()).map(Some),
            None => Ok(None),
        }
    }

    /// Type-erased lookup used by injection providers
    pub fn resolve(&self, component: &ComponentRef) -> WireboxResult<Option<Injected>> {
        if let Some(Container::Unsupported(container)) = component.container() {
            tracing::trace!(component = %component.key(), container = %container, "Unsupported container requested");
            return Ok(None);
        }

        let Some(provider) = self.components.get(component.key()) else {
            tracing::trace!(component = %component.key(), "No binding found");
            return Ok(None);
        };

        if component.is_deferred() {
            return Ok(Some(Injected::Deferred(ErasedDeferred::new(
                self.clone(),
                component.key().clone(),
                Arc::clone(provider),
            ))));
        }

        provider.get(self).map(|instance| Some(Injected::Value(instance)))
    }

    /// Shorthand for an unqualified, direct lookup
    pub fn instance<T: ?Sized + Send + Sync + 'static>(&self) -> WireboxResult<Option<Arc<T>>> {
        Ok(self.get(&Ref::<T>::of())?.and_then(Resolved::into_value))
    }

    /// Shorthand for a qualified, direct lookup
    pub fn instance_with<T: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: Qualifier,
    ) -> WireboxResult<Option<Arc<T>>> {
        Ok(self
            .get(&Ref::<T>::of().with_qualifier(qualifier))?
            .and_then(Resolved::into_value))
    }

    /// Shorthand for an unqualified deferred handle
    pub fn deferred<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Deferred<T>> {
        self.components.get(&ComponentKey::of::<T>()).map(|provider| {
            Deferred::new(ErasedDeferred::new(
                self.clone(),
                ComponentKey::of::<T>(),
                Arc::clone(provider),
            ))
        })
    }

    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.components.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> {
        self.components.keys()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("components", &self.components.len())
            .finish()
    }
}
