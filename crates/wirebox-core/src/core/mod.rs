pub mod error;
pub mod key;
pub mod tag;

pub use error::{WireboxError, WireboxResult};
pub use key::{ComponentKey, TypeKey};
pub use tag::{PartitionedTags, Qualifier, ScopeTag, Tag};
