//! Self-descriptions of injectable components
//!
//! Rust has no runtime reflection, so a component spells out its own
//! constructors, injected fields and injection methods. The
//! [`plan`](super::plan) module turns that description into an
//! [`InjectionPlan`](super::InjectionPlan) and rejects illegal shapes.

use crate::component::{Args, ComponentRef};
use std::fmt;
use std::sync::Arc;
use wirebox_core::{ComponentKey, Qualifier, Tag, TypeKey};

/// An implementation type that can be bound with
/// [`ContextConfig::bind`](crate::ContextConfig::bind)
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wirebox::{Component, ComponentDescriptor, Constructor, Param};
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
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    fn describe() -> ComponentDescriptor<Self>;
}

pub(crate) type Build<T> = Arc<dyn Fn(&mut Args) -> anyhow::Result<T> + Send + Sync>;
pub(crate) type Apply<T> = Arc<dyn Fn(&mut T, &mut Args) -> anyhow::Result<()> + Send + Sync>;

/// Whether a described type can be instantiated at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Concrete,
    Abstract,
    Interface,
}

/// One dependency of an injection point
#[derive(Debug, Clone)]
pub struct Param {
    ty: TypeKey,
    deferred: bool,
    qualifiers: Vec<Qualifier>,
}

impl Param {
    /// A direct dependency on `D`
    pub fn of<D: ?Sized + 'static>() -> Self {
        Self {
            ty: TypeKey::of::<D>(),
            deferred: false,
            qualifiers: Vec::new(),
        }
    }

    /// A lazy handle to `D`; does not take part in cycle detection
    pub fn deferred<D: ?Sized + 'static>() -> Self {
        Self {
            deferred: true,
            ..Self::of::<D>()
        }
    }

    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub(crate) fn shape(&self) -> (TypeKey, bool) {
        (self.ty, self.deferred)
    }

    pub(crate) fn component_ref(&self) -> ComponentRef {
        let component = ComponentRef::new(
            ComponentKey::new(self.ty, self.qualifiers.first().cloned()),
            None,
        );
        if self.deferred {
            component.deferred()
        } else {
            component
        }
    }
}

/// A way to create the component
pub struct Constructor<T> {
    pub(crate) params: Vec<Param>,
    pub(crate) injectable: bool,
    pub(crate) build: Build<T>,
}

impl<T: 'static> Constructor<T> {
    /// The constructor the container should call, with its dependencies
    pub fn inject<F>(params: Vec<Param>, build: F) -> Self
    where
        F: Fn(&mut Args) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            params,
            injectable: true,
            build: Arc::new(build),
        }
    }

    /// A no-argument constructor, used when none is marked for injection
    pub fn no_arg<F>(build: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            injectable: false,
            build: Arc::new(move |_: &mut Args| Ok::<T, anyhow::Error>(build())),
        }
    }

    /// A constructor with arguments that is not marked for injection
    ///
    /// The container never calls it.
    pub fn plain<F>(params: Vec<Param>, build: F) -> Self
    where
        F: Fn(&mut Args) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            params,
            injectable: false,
            build: Arc::new(build),
        }
    }

    pub fn is_injectable(&self) -> bool {
        self.injectable
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .field("injectable", &self.injectable)
            .finish_non_exhaustive()
    }
}

/// A field populated after construction
pub struct Field<T> {
    pub(crate) name: &'static str,
    pub(crate) param: Param,
    pub(crate) is_final: bool,
    pub(crate) apply: Apply<T>,
}

impl<T: 'static> Field<T> {
    pub fn inject<F>(name: &'static str, param: Param, apply: F) -> Self
    where
        F: Fn(&mut T, &mut Args) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name,
            param,
            is_final: false,
            apply: Arc::new(apply),
        }
    }

    /// Mark the field as not reassignable; such fields cannot be injected
    pub fn final_field(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A method called after construction and field injection
pub struct Method<T> {
    pub(crate) name: &'static str,
    pub(crate) params: Vec<Param>,
    pub(crate) injectable: bool,
    pub(crate) type_params: usize,
    pub(crate) apply: Apply<T>,
}

impl<T: 'static> Method<T> {
    pub fn inject<F>(name: &'static str, params: Vec<Param>, apply: F) -> Self
    where
        F: Fn(&mut T, &mut Args) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name,
            params,
            injectable: true,
            type_params: 0,
            apply: Arc::new(apply),
        }
    }

    /// A method that is not marked for injection
    ///
    /// Declaring it still matters: it overrides any ancestor method with the
    /// same name and parameter shape, which then is not injected either.
    pub fn plain(name: &'static str, params: Vec<Param>) -> Self {
        Self {
            name,
            params,
            injectable: false,
            type_params: 0,
            apply: Arc::new(|_: &mut T, _: &mut Args| Ok::<(), anyhow::Error>(())),
        }
    }

    /// Declare type parameters on the method itself
    pub fn with_type_params(mut self, count: usize) -> Self {
        self.type_params = count;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn overrides(&self, other: &Method<T>) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.shape() == b.shape())
    }
}

/// Fields and methods declared by one type in the hierarchy
pub(crate) struct Level<T> {
    pub(crate) type_name: &'static str,
    pub(crate) fields: Vec<Field<T>>,
    pub(crate) methods: Vec<Method<T>>,
}

impl<T> Level<T> {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Everything the container needs to know about a component type
///
/// Levels run from the described type itself up through its ancestors.
pub struct ComponentDescriptor<T> {
    pub(crate) type_name: &'static str,
    pub(crate) kind: TypeKind,
    pub(crate) tags: Vec<Tag>,
    pub(crate) constructors: Vec<Constructor<T>>,
    pub(crate) levels: Vec<Level<T>>,
}

impl<T: 'static> ComponentDescriptor<T> {
    pub fn new() -> Self {
        let type_name = std::any::type_name::<T>();
        Self {
            type_name,
            kind: TypeKind::Concrete,
            tags: Vec::new(),
            constructors: Vec::new(),
            levels: vec![Level::new(type_name)],
        }
    }

    pub fn abstract_type(mut self) -> Self {
        self.kind = TypeKind::Abstract;
        self
    }

    pub fn interface(mut self) -> Self {
        self.kind = TypeKind::Interface;
        self
    }

    /// Tag declared on the type itself, used when a binding does not say otherwise
    pub fn tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn field(mut self, field: Field<T>) -> Self {
        self.levels[0].fields.push(field);
        self
    }

    pub fn method(mut self, method: Method<T>) -> Self {
        self.levels[0].methods.push(method);
        self
    }

    /// Inherit the fields and methods of an ancestor embedded in `T`
    ///
    /// `project` reaches the ancestor's part of a `T`. The ancestor's own
    /// constructors and tags are ignored.
    pub fn extends<P: Component>(mut self, project: fn(&mut T) -> &mut P) -> Self {
        let ancestor = P::describe();
        for level in ancestor.levels {
            let mut lifted = Level::new(level.type_name);
            lifted.fields = level
                .fields
                .into_iter()
                .map(|field| Field {
                    name: field.name,
                    param: field.param,
                    is_final: field.is_final,
                    apply: lift(field.apply, project),
                })
                .collect();
            lifted.methods = level
                .methods
                .into_iter()
                .map(|method| Method {
                    name: method.name,
                    params: method.params,
                    injectable: method.injectable,
                    type_params: method.type_params,
                    apply: lift(method.apply, project),
                })
                .collect();
            self.levels.push(lifted);
        }
        self
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl<T: 'static> Default for ComponentDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lift<T: 'static, P: 'static>(apply: Apply<P>, project: fn(&mut T) -> &mut P) -> Apply<T> {
    Arc::new(move |this: &mut T, args: &mut Args| apply(project(this), args))
}
