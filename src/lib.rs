//! wirebox: a dependency-injection container
//!
//! Bindings map a capability (a type, optionally qualified) to a way of
//! producing it. [`ContextConfig`] collects bindings, checks the whole
//! dependency graph for unbound dependencies and cycles, and freezes into a
//! [`Context`] that builds fully-wired instances on demand.
//!
//! Error types, type keys and tags live in `wirebox-core` and are
//! re-exported here.

pub use wirebox_core::{
    ComponentKey, PartitionedTags, Qualifier, ScopeTag, Tag, TypeKey, WireboxError,
    WireboxResult,
};

/// Component references, resolved values and deferred handles.
pub mod component;

/// Component self-descriptions and injection plans.
pub mod introspect;

/// Providers that produce instances.
pub mod provider;

/// Lifetime scopes layered over providers.
pub mod scope;

/// The binding registry and graph validation.
pub mod registry;

/// The finalized context.
pub mod context;

/// Declarative settings.
pub mod config;

pub use component::{
    Args, ComponentRef, Container, Deferred, ErasedDeferred, Implements, Injected, Instance, Ref,
    Resolved,
};
pub use config::{ScopePolicy, ScopeSettings, Settings};
pub use context::Context;
pub use introspect::{
    introspect, Component, ComponentDescriptor, Constructor, Field, InjectionPlan, Method, Param,
    TypeKind,
};
pub use provider::{ComponentProvider, ConstantProvider, InjectionProvider};
pub use registry::ContextConfig;
pub use scope::{PooledProvider, ScopeFactory, SingletonProvider, DEFAULT_POOL_SIZE};
