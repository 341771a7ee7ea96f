//! Pre-flight validation of the dependency graph

use crate::component::Container;
use crate::context::Components;
use std::collections::HashSet;
use wirebox_core::{ComponentKey, WireboxError, WireboxResult};

/// Check that every dependency is bound and direct dependencies are acyclic
///
/// Keys are walked in `order` and each provider's dependencies in declaration
/// order, so the first error reported is stable. Deferred references must be
/// bound but are never expanded. References in unsupported containers are
/// skipped; lookups treat them as a miss.
pub(crate) fn validate(components: &Components, order: &[ComponentKey]) -> WireboxResult<()> {
    let mut verified = HashSet::new();
    for key in order {
        let mut path = vec![key.clone()];
        check(components, key, &mut path, &mut verified)?;
    }
    tracing::debug!(components = components.len(), "Dependency graph validated");
    Ok(())
}

fn check(
    components: &Components,
    component: &ComponentKey,
    path: &mut Vec<ComponentKey>,
    verified: &mut HashSet<ComponentKey>,
) -> WireboxResult<()> {
    if verified.contains(component) {
        return Ok(());
    }
    let Some(provider) = components.get(component) else {
        return Ok(());
    };

    for dependency in provider.dependencies() {
        if let Some(Container::Unsupported(_)) = dependency.container() {
            continue;
        }
        let key = dependency.key();
        if !components.contains_key(key) {
            return Err(WireboxError::dependency_not_found(
                component.clone(),
                key.clone(),
            ));
        }
        if dependency.is_deferred() {
            continue;
        }
        if let Some(start) = path.iter().position(|visiting| visiting == key) {
            return Err(WireboxError::CyclicDependency {
                cycle: path[start..].to_vec(),
            });
        }
        path.push(key.clone());
        check(components, key, path, verified)?;
        path.pop();
    }

    verified.insert(component.clone());
    Ok(())
}
