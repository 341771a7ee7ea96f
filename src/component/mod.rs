//! Component references, resolved instances and deferred handles

pub mod instance;
pub mod reference;

pub use instance::{Args, Deferred, ErasedDeferred, Implements, Injected, Instance, Resolved};
pub use reference::{ComponentRef, Container, Ref};
