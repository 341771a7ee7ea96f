use crate::core::tag::Qualifier;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a capability type
///
/// Equality and hashing only look at the `TypeId`; the name is kept for
/// error messages. `T` may be unsized, so `dyn Trait` capabilities get keys too.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Identity of a bound or requested capability: a type plus an optional qualifier
///
/// The unqualified key is a key of its own: binding `(T, @Named("a"))` says
/// nothing about `(T, None)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentKey {
    ty: TypeKey,
    qualifier: Option<Qualifier>,
}

impl ComponentKey {
    pub fn new(ty: TypeKey, qualifier: Option<Qualifier>) -> Self {
        Self { ty, qualifier }
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), None)
    }

    pub fn qualified<T: ?Sized + 'static>(qualifier: Qualifier) -> Self {
        Self::new(TypeKey::of::<T>(), Some(qualifier))
    }

    pub fn type_key(&self) -> TypeKey {
        self.ty
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{} {}", qualifier, self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}
