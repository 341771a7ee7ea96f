use serde::{Deserialize, Serialize};
use std::fmt;

/// Secondary tag that tells apart several bindings of the same capability type
///
/// Qualifiers compare by value: two `Named("db")` qualifiers are the same
/// qualifier even when created independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Name-carrying qualifier: `Named("primary")`
    Named(String),
    /// Payload-free marker qualifier, identified by its name alone
    Marker(String),
}

impl Qualifier {
    pub fn named(name: impl Into<String>) -> Self {
        Qualifier::Named(name.into())
    }

    pub fn marker(name: impl Into<String>) -> Self {
        Qualifier::Marker(name.into())
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Named(name) => write!(f, "@Named(\"{}\")", name),
            Qualifier::Marker(name) => write!(f, "@{}", name),
        }
    }
}

/// Name of a lifetime policy applied to a binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeTag(String);

impl ScopeTag {
    /// Name of the scope every registry knows about out of the box
    pub const SINGLETON: &'static str = "singleton";

    pub fn new(name: impl Into<String>) -> Self {
        ScopeTag(name.into())
    }

    pub fn singleton() -> Self {
        ScopeTag::new(Self::SINGLETON)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A marker attached to a binding call or declared on a component type
///
/// Only qualifier- and scope-shaped tags are legal on bindings. `Other` stands
/// for any marker of an unrecognized kind and is always rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Qualifier(Qualifier),
    Scope(ScopeTag),
    Other(String),
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Tag::Qualifier(Qualifier::named(name))
    }

    pub fn marker(name: impl Into<String>) -> Self {
        Tag::Qualifier(Qualifier::marker(name))
    }

    pub fn scope(name: impl Into<String>) -> Self {
        Tag::Scope(ScopeTag::new(name))
    }

    pub fn singleton() -> Self {
        Tag::Scope(ScopeTag::singleton())
    }

    pub fn other(name: impl Into<String>) -> Self {
        Tag::Other(name.into())
    }

    pub fn as_qualifier(&self) -> Option<&Qualifier> {
        match self {
            Tag::Qualifier(qualifier) => Some(qualifier),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&ScopeTag> {
        match self {
            Tag::Scope(scope) => Some(scope),
            _ => None,
        }
    }
}

impl From<Qualifier> for Tag {
    fn from(qualifier: Qualifier) -> Self {
        Tag::Qualifier(qualifier)
    }
}

impl From<ScopeTag> for Tag {
    fn from(scope: ScopeTag) -> Self {
        Tag::Scope(scope)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Qualifier(qualifier) => qualifier.fmt(f),
            Tag::Scope(scope) => scope.fmt(f),
            Tag::Other(name) => write!(f, "@{}", name),
        }
    }
}

/// Tags of a binding split by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedTags {
    pub qualifiers: Vec<Qualifier>,
    pub scopes: Vec<ScopeTag>,
    pub unrecognized: Vec<String>,
}

impl PartitionedTags {
    pub fn of(tags: &[Tag]) -> Self {
        let mut partitioned = Self::default();
        for tag in tags {
            match tag {
                Tag::Qualifier(qualifier) => partitioned.qualifiers.push(qualifier.clone()),
                Tag::Scope(scope) => partitioned.scopes.push(scope.clone()),
                Tag::Other(name) => partitioned.unrecognized.push(name.clone()),
            }
        }
        partitioned
    }
}
