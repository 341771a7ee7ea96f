//! Queries against the container: what is wanted, and in which shape

use std::fmt;
use std::marker::PhantomData;
use wirebox_core::{ComponentKey, Qualifier, TypeKey};

/// How a dependency is wrapped at the request site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// A lazy handle that builds the component when invoked
    Deferred,
    /// Any other wrapper; never resolvable
    Unsupported(String),
}

/// Type-erased request for a component: a key plus an optional wrapper
///
/// This is what providers list as their dependencies and what graph
/// validation walks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    key: ComponentKey,
    container: Option<Container>,
}

impl ComponentRef {
    pub fn new(key: ComponentKey, container: Option<Container>) -> Self {
        Self { key, container }
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(ComponentKey::of::<T>(), None)
    }

    pub fn qualified<T: ?Sized + 'static>(qualifier: Qualifier) -> Self {
        Self::new(ComponentKey::qualified::<T>(qualifier), None)
    }

    /// Same key, requested as a deferred handle
    pub fn deferred(mut self) -> Self {
        self.container = Some(Container::Deferred);
        self
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn type_key(&self) -> TypeKey {
        self.key.type_key()
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self.container, Some(Container::Deferred))
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            None => write!(f, "{}", self.key),
            Some(Container::Deferred) => write!(f, "Deferred<{}>", self.key),
            Some(Container::Unsupported(name)) => write!(f, "{}<{}>", name, self.key),
        }
    }
}

/// Typed request for a component of type `T`
///
/// # Example
///
/// ```
/// use wirebox::{Qualifier, Ref};
///
/// trait Greeter: Send + Sync {}
///
/// let direct = Ref::<dyn Greeter>::of();
/// let lazy = Ref::<dyn Greeter>::of()
///     .with_qualifier(Qualifier::named("english"))
///     .deferred();
///
/// assert!(!direct.component().is_container());
/// assert!(lazy.component().is_deferred());
/// ```
pub struct Ref<T: ?Sized> {
    component: ComponentRef,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + 'static> Ref<T> {
    pub fn of() -> Self {
        Self {
            component: ComponentRef::of::<T>(),
            _marker: PhantomData,
        }
    }

    pub fn with_qualifier(self, qualifier: Qualifier) -> Self {
        Self {
            component: ComponentRef::new(
                ComponentKey::qualified::<T>(qualifier),
                self.component.container,
            ),
            _marker: PhantomData,
        }
    }

    /// Ask for a handle instead of an instance
    pub fn deferred(self) -> Self {
        Self {
            component: self.component.deferred(),
            _marker: PhantomData,
        }
    }

    /// Ask for `T` wrapped in a container the context does not know
    ///
    /// Such requests always come back empty.
    pub fn contained_in(self, container: impl Into<String>) -> Self {
        Self {
            component: ComponentRef::new(
                self.component.key,
                Some(Container::Unsupported(container.into())),
            ),
            _marker: PhantomData,
        }
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }
}

impl<T: ?Sized> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            component: self.component.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.component).finish()
    }
}
