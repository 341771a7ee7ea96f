use crate::scope::{self, ScopeFactory, DEFAULT_POOL_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use wirebox_core::{ScopeTag, WireboxError, WireboxResult};

/// Declarative container settings, usually read from a YAML file
///
/// ```yaml
/// scopes:
///   - name: pooled
///     policy: pooled
///     size: 2
///   - name: session
///     policy: singleton
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Extra scope kinds to register next to the built-in singleton scope
    #[serde(default)]
    pub scopes: Vec<ScopeSettings>,
}

/// One named scope kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSettings {
    pub name: ScopeTag,

    #[serde(default)]
    pub policy: ScopePolicy,

    /// Pool size for pooled scopes (defaults to 2)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// How a scope reuses instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// One instance for the lifetime of the context
    #[default]
    Singleton,
    /// A fixed number of instances handed out round-robin
    Pooled,
}

impl ScopeSettings {
    pub fn singleton(name: impl Into<String>) -> Self {
        Self {
            name: ScopeTag::new(name),
            policy: ScopePolicy::Singleton,
            size: None,
        }
    }

    pub fn pooled(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: ScopeTag::new(name),
            policy: ScopePolicy::Pooled,
            size: Some(size),
        }
    }

    /// The factory this entry registers
    pub fn factory(&self) -> ScopeFactory {
        match self.policy {
            ScopePolicy::Singleton => scope::singleton(),
            ScopePolicy::Pooled => scope::pooled(self.size.unwrap_or(DEFAULT_POOL_SIZE)),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(content: &str) -> WireboxResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a YAML file
    pub fn load(path: &Path) -> WireboxResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), scopes = settings.scopes.len(), "Loaded settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> WireboxResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check pool sizes and scope names
    pub fn validate(&self) -> WireboxResult<()> {
        let mut seen = HashSet::new();
        for scope in &self.scopes {
            if scope.name.name().is_empty() {
                return Err(WireboxError::Config("Scope name cannot be empty".to_string()));
            }
            if !seen.insert(&scope.name) {
                return Err(WireboxError::Config(format!(
                    "Scope '{}' is declared more than once",
                    scope.name
                )));
            }
            match (scope.policy, scope.size) {
                (ScopePolicy::Pooled, Some(0)) => {
                    return Err(WireboxError::Config(format!(
                        "Pooled scope '{}' needs a size of at least 1",
                        scope.name
                    )))
                }
                (ScopePolicy::Singleton, Some(_)) => {
                    return Err(WireboxError::Config(format!(
                        "Singleton scope '{}' does not take a size",
                        scope.name
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }
}
