//! The binding registry
//!
//! [`ContextConfig`] collects bindings and scope kinds, then validates the
//! whole graph and freezes it into a [`Context`].

mod graph;

use crate::component::Implements;
use crate::config::Settings;
use crate::context::{Components, Context};
use crate::introspect::{introspect, Component};
use crate::provider::{ComponentProvider, ConstantProvider, InjectionProvider};
use crate::scope::{self, ScopeFactory};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use wirebox_core::{
    ComponentKey, PartitionedTags, Qualifier, ScopeTag, Tag, TypeKey, WireboxError,
    WireboxResult,
};

/// Mutable registry of bindings
///
/// Binding the same key twice replaces the earlier provider. Nothing is
/// validated against the graph until [`ContextConfig::get_context`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wirebox::{Component, ComponentDescriptor, Constructor, ContextConfig, Param, Tag};
///
/// struct Database {
///     url: Arc<String>,
/// }
///
/// impl Component for Database {
///     fn describe() -> ComponentDescriptor<Self> {
///         ComponentDescriptor::new().constructor(Constructor::inject(
///             vec![Param::of::<String>()],
///             |args| Ok(Database { url: args.value()? }),
///         ))
///     }
/// }
///
/// # fn example() -> wirebox::WireboxResult<()> {
/// let mut config = ContextConfig::new();
/// config.bind_instance(Arc::new("sqlite::memory:".to_string()));
/// config.bind::<Database, Database>(&[Tag::singleton()])?;
///
/// let context = config.get_context()?;
/// let first = context.instance::<Database>()?.expect("bound above");
/// let second = context.instance::<Database>()?.expect("bound above");
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(first.url.as_str(), "sqlite::memory:");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ContextConfig {
    components: Components,
    order: Vec<ComponentKey>,
    scopes: HashMap<ScopeTag, ScopeFactory>,
}

impl ContextConfig {
    /// An empty registry that knows the singleton scope
    pub fn new() -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(ScopeTag::singleton(), scope::singleton());
        Self {
            components: HashMap::new(),
            order: Vec::new(),
            scopes,
        }
    }

    /// Build a registry with every scope declared in `settings`
    pub fn from_settings(settings: &Settings) -> WireboxResult<Self> {
        settings.validate()?;
        let mut config = Self::new();
        for declared in &settings.scopes {
            config.scope(declared.name.clone(), declared.factory());
        }
        tracing::debug!(scopes = settings.scopes.len(), "Registered scopes from settings");
        Ok(config)
    }

    /// Bind an existing instance under the unqualified key of `T`
    pub fn bind_instance<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        self.insert(
            ComponentKey::of::<T>(),
            Arc::new(ConstantProvider::new(instance)),
        );
    }

    /// Bind an existing instance once per qualifier tag
    ///
    /// Only qualifier tags are accepted. With no tags this is
    /// [`bind_instance`](Self::bind_instance).
    pub fn bind_instance_with<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        instance: Arc<T>,
        tags: &[Tag],
    ) -> WireboxResult<()> {
        let ty = TypeKey::of::<T>();
        let mut qualifiers = Vec::with_capacity(tags.len());
        for tag in tags {
            match tag.as_qualifier() {
                Some(qualifier) => qualifiers.push(qualifier.clone()),
                None => {
                    return Err(WireboxError::illegal_binding(
                        ty,
                        format!("{} is not a qualifier", tag),
                    ))
                }
            }
        }

        let provider: Arc<dyn ComponentProvider> = Arc::new(ConstantProvider::new(instance));
        self.insert_all(ty, qualifiers, provider);
        Ok(())
    }

    /// Bind implementation `C` under capability `I`
    ///
    /// `tags` may hold qualifiers and at most one registered scope. Tags
    /// declared on `C` itself apply for each kind the call leaves out.
    pub fn bind<I, C>(&mut self, tags: &[Tag]) -> WireboxResult<()>
    where
        I: ?Sized + Send + Sync + 'static,
        C: Component + Implements<I>,
    {
        let capability = TypeKey::of::<I>();
        let requested = partition(capability, tags)?;
        let plan = introspect::<C>()?;
        let declared = partition(capability, plan.tags())?;

        let qualifiers = if requested.qualifiers.is_empty() {
            declared.qualifiers
        } else {
            requested.qualifiers
        };
        let scopes = if requested.scopes.is_empty() {
            declared.scopes
        } else {
            requested.scopes
        };

        let factory = match scopes.as_slice() {
            [] => None,
            [scope] => Some(self.scopes.get(scope).cloned().ok_or_else(|| {
                WireboxError::illegal_binding(capability, format!("scope {} is not registered", scope))
            })?),
            _ => {
                let names = scopes.iter().map(ToString::to_string).collect::<Vec<_>>();
                return Err(WireboxError::illegal_binding(
                    capability,
                    format!("more than one scope: {}", names.join(", ")),
                ));
            }
        };

        tracing::debug!(
            capability = %capability,
            component = plan.type_name(),
            scope = scopes.first().map(ScopeTag::name),
            "Binding component"
        );

        let provider: Arc<dyn ComponentProvider> = Arc::new(InjectionProvider::<C, I>::new(plan));
        let provider = match factory {
            Some(factory) => factory(provider),
            None => provider,
        };
        self.insert_all(capability, qualifiers, provider);
        Ok(())
    }

    /// Register a scope kind, replacing any factory already under `tag`
    pub fn scope(&mut self, tag: ScopeTag, factory: ScopeFactory) {
        tracing::debug!(scope = %tag, "Registering scope");
        self.scopes.insert(tag, factory);
    }

    pub fn has_scope(&self, tag: &ScopeTag) -> bool {
        self.scopes.contains_key(tag)
    }

    pub fn is_bound(&self, key: &ComponentKey) -> bool {
        self.components.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Validate the dependency graph and freeze the registry
    ///
    /// Fails on the first unbound dependency or dependency cycle found.
    pub fn get_context(self) -> WireboxResult<Context> {
        graph::validate(&self.components, &self.order)?;
        tracing::debug!(components = self.components.len(), "Context created");
        Ok(Context::new(self.components))
    }

    fn insert_all(
        &mut self,
        ty: TypeKey,
        qualifiers: Vec<Qualifier>,
        provider: Arc<dyn ComponentProvider>,
    ) {
        if qualifiers.is_empty() {
            self.insert(ComponentKey::new(ty, None), provider);
            return;
        }
        for qualifier in qualifiers {
            self.insert(ComponentKey::new(ty, Some(qualifier)), Arc::clone(&provider));
        }
    }

    fn insert(&mut self, key: ComponentKey, provider: Arc<dyn ComponentProvider>) {
        if self.components.insert(key.clone(), provider).is_some() {
            tracing::debug!(component = %key, "Replaced existing binding");
        } else {
            tracing::trace!(component = %key, "Bound component");
            self.order.push(key);
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConfig")
            .field("components", &self.order)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn partition(component: TypeKey, tags: &[Tag]) -> WireboxResult<PartitionedTags> {
    let partitioned = PartitionedTags::of(tags);
    match partitioned.unrecognized.first() {
        Some(tag) => Err(WireboxError::illegal_binding(
            component,
            format!("{} is neither a qualifier nor a scope", tag),
        )),
        None => Ok(partitioned),
    }
}
