//! Core types shared by the Wirebox container
//!
//! Component keys, binding tags and the error taxonomy live here so they can
//! be used without pulling in the registry and resolution engine.

pub mod core;

pub use crate::core::{
    ComponentKey, PartitionedTags, Qualifier, ScopeTag, Tag, TypeKey, WireboxError, WireboxResult,
};
