//! Providers: how a binding turns into an instance

pub mod constant;
pub mod injection;

pub use constant::ConstantProvider;
pub use injection::InjectionProvider;

use crate::component::{ComponentRef, Instance};
use crate::context::Context;
use wirebox_core::WireboxResult;

/// A resolved binding
///
/// Implementations must be thread-safe (Send + Sync): a finalized
/// [`Context`] is shared across threads and calls `get` concurrently.
/// Scope wrappers implement this trait too and must report the wrapped
/// provider's dependencies unchanged so graph validation sees through them.
#[cfg_attr(test, mockall::automock)]
pub trait ComponentProvider: Send + Sync {
    /// Produce an instance, resolving dependencies through `context`
    fn get(&self, context: &Context) -> WireboxResult<Instance>;

    /// What this provider needs from the context, in injection order
    fn dependencies(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}
