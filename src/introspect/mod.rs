//! Introspection boundary: from a component's self-description to an injection plan

pub mod descriptor;
pub mod plan;

pub use descriptor::{Component, ComponentDescriptor, Constructor, Field, Method, Param, TypeKind};
pub use plan::{introspect, InjectionPlan};
