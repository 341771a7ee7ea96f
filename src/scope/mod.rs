//! Scope wrappers: lifetime and reuse policies layered over a provider
//!
//! A scope is registered on a [`ContextConfig`](crate::ContextConfig) under a
//! [`ScopeTag`](wirebox_core::ScopeTag) together with a factory that wraps
//! the binding's provider. Wrappers must report the inner provider's
//! dependencies unchanged, and refuse a request for the same binding made
//! from inside its own build.

mod guard;
pub mod pooled;
pub mod singleton;

pub use pooled::PooledProvider;
pub use singleton::SingletonProvider;

use crate::provider::ComponentProvider;
use std::sync::Arc;

/// Wraps a provider into a scoped one
pub type ScopeFactory =
    Arc<dyn Fn(Arc<dyn ComponentProvider>) -> Arc<dyn ComponentProvider> + Send + Sync>;

/// Pool size used when a pooled scope is configured without one
pub const DEFAULT_POOL_SIZE: usize = 2;

/// Factory for the cache-forever scope
pub fn singleton() -> ScopeFactory {
    Arc::new(|inner| Arc::new(SingletonProvider::new(inner)))
}

/// Factory for a round-robin pool of `size` instances (at least one)
pub fn pooled(size: usize) -> ScopeFactory {
    Arc::new(move |inner| Arc::new(PooledProvider::new(inner, size)))
}
