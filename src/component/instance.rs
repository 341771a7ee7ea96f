//! Type-erased instances and the typed views handed back to callers

use crate::context::Context;
use crate::provider::ComponentProvider;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use wirebox_core::{ComponentKey, WireboxError, WireboxResult};

/// A built component with its type erased
///
/// The payload is always an `Arc<T>` for the key type `T`, which is what lets
/// `dyn Trait` capabilities travel through the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Option<Arc<T>> {
    instance.downcast_ref::<Arc<T>>().cloned()
}

fn type_mismatch<T: ?Sized + 'static>(key: &ComponentKey) -> WireboxError {
    WireboxError::construction(
        key.clone(),
        anyhow::anyhow!(
            "provider produced a value that is not {}",
            std::any::type_name::<T>()
        ),
    )
}

/// Deferred handle with its component type erased
#[derive(Clone)]
pub struct ErasedDeferred {
    context: Context,
    key: ComponentKey,
    provider: Arc<dyn ComponentProvider>,
}

impl ErasedDeferred {
    pub(crate) fn new(
        context: Context,
        key: ComponentKey,
        provider: Arc<dyn ComponentProvider>,
    ) -> Self {
        Self {
            context,
            key,
            provider,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    /// Build (or fetch, depending on scope) the component now
    pub fn get(&self) -> WireboxResult<Instance> {
        tracing::trace!(component = %self.key, "Invoking deferred handle");
        self.provider.get(&self.context)
    }
}

impl fmt::Debug for ErasedDeferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedDeferred")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// A lazy handle to a `T`
///
/// Nothing is constructed until [`Deferred::get`] is called. Each call goes
/// through the binding's provider, so scope rules apply per call.
pub struct Deferred<T: ?Sized> {
    inner: ErasedDeferred,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> Deferred<T> {
    pub(crate) fn new(inner: ErasedDeferred) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        self.inner.key()
    }

    pub fn get(&self) -> WireboxResult<Arc<T>> {
        let instance = self.inner.get()?;
        downcast::<T>(&instance).ok_or_else(|| type_mismatch::<T>(self.inner.key()))
    }
}

impl<T: ?Sized> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deferred").field(&self.inner.key).finish()
    }
}

/// A resolved dependency as handed to a construction recipe
#[derive(Clone, Debug)]
pub enum Injected {
    Value(Instance),
    Deferred(ErasedDeferred),
}

/// Result of a typed lookup
pub enum Resolved<T: ?Sized> {
    Value(Arc<T>),
    Deferred(Deferred<T>),
}

impl<T: ?Sized + Send + Sync + 'static> Resolved<T> {
    pub(crate) fn from_injected(injected: Injected, key: &ComponentKey) -> WireboxResult<Self> {
        match injected {
            Injected::Value(instance) => downcast::<T>(&instance)
                .map(Resolved::Value)
                .ok_or_else(|| type_mismatch::<T>(key)),
            Injected::Deferred(handle) => Ok(Resolved::Deferred(Deferred::new(handle))),
        }
    }

    pub fn into_value(self) -> Option<Arc<T>> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Deferred(_) => None,
        }
    }

    pub fn into_deferred(self) -> Option<Deferred<T>> {
        match self {
            Resolved::Deferred(handle) => Some(handle),
            Resolved::Value(_) => None,
        }
    }
}

impl<T: ?Sized> Clone for Resolved<T> {
    fn clone(&self) -> Self {
        match self {
            Resolved::Value(value) => Resolved::Value(Arc::clone(value)),
            Resolved::Deferred(handle) => Resolved::Deferred(handle.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Resolved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Value(_) => f.write_str("Resolved::Value(..)"),
            Resolved::Deferred(handle) => f.debug_tuple("Resolved::Deferred").field(handle).finish(),
        }
    }
}

/// Positional dependencies of one injection point, consumed in declaration order
pub struct Args {
    owner: &'static str,
    values: std::vec::IntoIter<Injected>,
}

impl Args {
    pub(crate) fn new(owner: &'static str, values: Vec<Injected>) -> Self {
        Self {
            owner,
            values: values.into_iter(),
        }
    }

    fn next(&mut self) -> anyhow::Result<Injected> {
        self.values.next().ok_or_else(|| {
            anyhow::anyhow!("{} asked for more dependencies than it declared", self.owner)
        })
    }

    /// Next dependency, declared with [`Param::of`](crate::Param::of)
    pub fn value<D: ?Sized + Send + Sync + 'static>(&mut self) -> anyhow::Result<Arc<D>> {
        match self.next()? {
            Injected::Value(instance) => downcast::<D>(&instance).ok_or_else(|| {
                anyhow::anyhow!(
                    "{} expected {} but got another type",
                    self.owner,
                    std::any::type_name::<D>()
                )
            }),
            Injected::Deferred(handle) => Err(anyhow::anyhow!(
                "{} expected a value of {} but {} was declared deferred",
                self.owner,
                std::any::type_name::<D>(),
                handle.key()
            )),
        }
    }

    /// Next dependency, declared with [`Param::deferred`](crate::Param::deferred)
    pub fn deferred<D: ?Sized + Send + Sync + 'static>(&mut self) -> anyhow::Result<Deferred<D>> {
        match self.next()? {
            Injected::Deferred(handle) if handle.key().type_key().is::<D>() => {
                Ok(Deferred::new(handle))
            }
            Injected::Deferred(handle) => Err(anyhow::anyhow!(
                "{} expected a handle to {} but got one to {}",
                self.owner,
                std::any::type_name::<D>(),
                handle.key()
            )),
            Injected::Value(_) => Err(anyhow::anyhow!(
                "{} expected a handle to {} but the dependency was declared direct",
                self.owner,
                std::any::type_name::<D>()
            )),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Upcast from a concrete component to the capability it is bound under
///
/// Every type implements it for itself. Use [`implements!`](crate::implements)
/// to declare trait-object capabilities.
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Declare that a component can be bound under one or more `dyn Trait` capabilities
///
/// ```
/// use wirebox::implements;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// implements!(English => dyn Greeter);
/// ```
#[macro_export]
macro_rules! implements {
    ($component:ty => $($capability:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$capability> for $component {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$capability> {
                    self
                }
            }
        )+
    };
}
