use crate::core::key::{ComponentKey, TypeKey};
use std::collections::HashSet;
use thiserror::Error;

pub type WireboxResult<T> = Result<T, WireboxError>;

#[derive(Error, Debug)]
pub enum WireboxError {
    /// A type cannot serve as an injectable implementation.
    /// Raised while binding, before any graph validation.
    #[error("Illegal component {component}: {reason}")]
    IllegalComponent {
        component: &'static str,
        reason: String,
    },

    /// A binding call carried an unrecognized, conflicting or unregistered tag.
    #[error("Illegal binding for {component}: {reason}")]
    IllegalBinding { component: TypeKey, reason: String },

    #[error("Dependency {dependency} required by {component} is not bound")]
    DependencyNotFound {
        component: Box<ComponentKey>,
        dependency: Box<ComponentKey>,
    },

    /// Every distinct key on the cyclic path, in path order.
    #[error("Cyclic dependencies found: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<ComponentKey> },

    /// A construction recipe failed while resolving an instance.
    #[error("Failed to construct {component}: {source}")]
    Construction {
        component: ComponentKey,
        #[source]
        source: anyhow::Error,
    },

    /// A scoped binding was requested again on the thread that is still building it,
    /// typically through a deferred handle invoked from its own recipe.
    #[error("{scope} scope is already being built on this thread")]
    ReentrantBuild { scope: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_cycle(cycle: &[ComponentKey]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl WireboxError {
    pub fn illegal_component(component: &'static str, reason: impl Into<String>) -> Self {
        WireboxError::IllegalComponent {
            component,
            reason: reason.into(),
        }
    }

    pub fn illegal_binding(component: TypeKey, reason: impl Into<String>) -> Self {
        WireboxError::IllegalBinding {
            component,
            reason: reason.into(),
        }
    }

    pub fn dependency_not_found(component: ComponentKey, dependency: ComponentKey) -> Self {
        WireboxError::DependencyNotFound {
            component: Box::new(component),
            dependency: Box::new(dependency),
        }
    }

    pub fn construction(component: ComponentKey, source: impl Into<anyhow::Error>) -> Self {
        WireboxError::Construction {
            component,
            source: source.into(),
        }
    }

    /// Keys on the cycle, if this is a cycle error
    pub fn cycle(&self) -> Option<&[ComponentKey]> {
        match self {
            WireboxError::CyclicDependency { cycle } => Some(cycle),
            _ => None,
        }
    }

    /// Capability types on the cycle, regardless of qualifier or order
    pub fn cycle_types(&self) -> HashSet<TypeKey> {
        self.cycle()
            .map(|keys| keys.iter().map(ComponentKey::type_key).collect())
            .unwrap_or_default()
    }

    /// `(component, dependency)` of a missing-dependency error
    pub fn missing(&self) -> Option<(&ComponentKey, &ComponentKey)> {
        match self {
            WireboxError::DependencyNotFound {
                component,
                dependency,
            } => Some((component.as_ref(), dependency.as_ref())),
            _ => None,
        }
    }

    /// Whether the error describes a malformed registry rather than a failed construction
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WireboxError::IllegalComponent { .. }
                | WireboxError::IllegalBinding { .. }
                | WireboxError::DependencyNotFound { .. }
                | WireboxError::CyclicDependency { .. }
        )
    }
}
