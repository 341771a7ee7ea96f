use super::common::init_tracing;
use std::collections::HashSet;
use std::sync::Arc;
use wirebox::{
    implements, Component, ComponentDescriptor, ComponentKey, Constructor, ContextConfig,
    Deferred, Field, Method, Param, Qualifier, Tag, TypeKey, WireboxError,
};

trait Alpha: Send + Sync {
    fn name(&self) -> &'static str {
        "alpha"
    }
}

trait Beta: Send + Sync {
    fn alpha(&self) -> Option<Arc<dyn Alpha>> {
        None
    }
}

trait Gamma: Send + Sync {}

struct AlphaByConstructor {
    _beta: Arc<dyn Beta>,
}

impl Alpha for AlphaByConstructor {}

impl Component for AlphaByConstructor {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new().constructor(Constructor::inject(
            vec![Param::of::<dyn Beta>()],
            |args| {
                Ok(AlphaByConstructor {
                    _beta: args.value()?,
                })
            },
        ))
    }
}

implements!(AlphaByConstructor => dyn Alpha);

#[derive(Default)]
struct AlphaByField {
    _beta: Option<Arc<dyn Beta>>,
}

impl Alpha for AlphaByField {}

impl Component for AlphaByField {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new()
            .constructor(Constructor::no_arg(AlphaByField::default))
            .field(Field::inject(
                "beta",
                Param::of::<dyn Beta>(),
                |this: &mut AlphaByField, args| {
                    this._beta = Some(args.value()?);
                    Ok(())
                },
            ))
    }
}

implements!(AlphaByField => dyn Alpha);

#[derive(Default)]
struct AlphaByMethod {
    _beta: Option<Arc<dyn Beta>>,
}

impl Alpha for AlphaByMethod {}

impl Component for AlphaByMethod {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new()
            .constructor(Constructor::no_arg(AlphaByMethod::default))
            .method(Method::inject(
                "install",
                vec![Param::of::<dyn Beta>()],
                |this: &mut AlphaByMethod, args| {
                    this._beta = Some(args.value()?);
                    Ok(())
                },
            ))
    }
}

implements!(AlphaByMethod => dyn Alpha);

struct BetaNeedsAlpha {
    _alpha: Arc<dyn Alpha>,
}

impl Beta for BetaNeedsAlpha {}

impl Component for BetaNeedsAlpha {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new().constructor(Constructor::inject(
            vec![Param::of::<dyn Alpha>()],
            |args| {
                Ok(BetaNeedsAlpha {
                    _alpha: args.value()?,
                })
            },
        ))
    }
}

implements!(BetaNeedsAlpha => dyn Beta);

#[derive(Default)]
struct BetaNeedsGamma {
    _gamma: Option<Arc<dyn Gamma>>,
}

impl Beta for BetaNeedsGamma {}

impl Component for BetaNeedsGamma {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new()
            .constructor(Constructor::no_arg(BetaNeedsGamma::default))
            .field(Field::inject(
                "gamma",
                Param::of::<dyn Gamma>(),
                |this: &mut BetaNeedsGamma, args| {
                    this._gamma = Some(args.value()?);
                    Ok(())
                },
            ))
    }
}

implements!(BetaNeedsGamma => dyn Beta);

#[derive(Default)]
struct GammaNeedsAlpha {
    _alpha: Option<Arc<dyn Alpha>>,
}

impl Gamma for GammaNeedsAlpha {}

impl Component for GammaNeedsAlpha {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new()
            .constructor(Constructor::no_arg(GammaNeedsAlpha::default))
            .method(Method::inject(
                "install",
                vec![Param::of::<dyn Alpha>()],
                |this: &mut GammaNeedsAlpha, args| {
                    this._alpha = Some(args.value()?);
                    Ok(())
                },
            ))
    }
}

implements!(GammaNeedsAlpha => dyn Gamma);

struct BetaWithLazyAlpha {
    alpha: Deferred<dyn Alpha>,
}

impl Beta for BetaWithLazyAlpha {
    fn alpha(&self) -> Option<Arc<dyn Alpha>> {
        self.alpha.get().ok()
    }
}

impl Component for BetaWithLazyAlpha {
    fn describe() -> ComponentDescriptor<Self> {
        ComponentDescriptor::new().constructor(Constructor::inject(
            vec![Param::deferred::<dyn Alpha>()],
            |args| {
                Ok(BetaWithLazyAlpha {
                    alpha: args.deferred()?,
                })
            },
        ))
    }
}

implements!(BetaWithLazyAlpha => dyn Beta);

fn types(keys: &[TypeKey]) -> HashSet<TypeKey> {
    keys.iter().copied().collect()
}

#[test]
fn test_missing_dependency() {
    init_tracing();
    let mut config = ContextConfig::new();
    config.bind::<dyn Alpha, AlphaByConstructor>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert!(err.is_structural());
    let (component, dependency) = err.missing().unwrap();
    assert_eq!(component, &ComponentKey::of::<dyn Alpha>());
    assert_eq!(dependency, &ComponentKey::of::<dyn Beta>());
}

#[test]
fn test_missing_transitive_dependency_names_direct_requester() {
    let mut config = ContextConfig::new();
    config.bind::<dyn Alpha, AlphaByConstructor>(&[]).unwrap();
    config.bind::<dyn Beta, BetaNeedsGamma>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    let (component, dependency) = err.missing().unwrap();
    assert_eq!(component, &ComponentKey::of::<dyn Beta>());
    assert_eq!(dependency, &ComponentKey::of::<dyn Gamma>());
}

#[test]
fn test_missing_qualified_dependency() {
    struct NeedsNamed;

    impl Component for NeedsNamed {
        fn describe() -> ComponentDescriptor<Self> {
            ComponentDescriptor::new().constructor(Constructor::inject(
                vec![Param::of::<String>().qualified(Qualifier::named("url"))],
                |_| Ok(NeedsNamed),
            ))
        }
    }

    let mut config = ContextConfig::new();
    config.bind_instance(Arc::new("unqualified".to_string()));
    config
        .bind_instance_with(Arc::new("other".to_string()), &[Tag::named("other")])
        .unwrap();
    config.bind::<NeedsNamed, NeedsNamed>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert_eq!(
        err.missing().unwrap().1,
        &ComponentKey::qualified::<String>(Qualifier::named("url"))
    );
}

#[test]
fn test_missing_deferred_dependency() {
    let mut config = ContextConfig::new();
    config.bind::<dyn Beta, BetaWithLazyAlpha>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert!(matches!(err, WireboxError::DependencyNotFound { .. }));
    assert_eq!(err.missing().unwrap().1, &ComponentKey::of::<dyn Alpha>());
}

fn assert_direct_cycle<A>()
where
    A: Component + wirebox::Implements<dyn Alpha>,
{
    let mut config = ContextConfig::new();
    config.bind::<dyn Alpha, A>(&[]).unwrap();
    config.bind::<dyn Beta, BetaNeedsAlpha>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert_eq!(err.cycle().unwrap().len(), 2);
    assert_eq!(
        err.cycle_types(),
        types(&[TypeKey::of::<dyn Alpha>(), TypeKey::of::<dyn Beta>()])
    );
}

#[test]
fn test_cyclic_dependency_through_constructor() {
    assert_direct_cycle::<AlphaByConstructor>();
}

#[test]
fn test_cyclic_dependency_through_field() {
    assert_direct_cycle::<AlphaByField>();
}

#[test]
fn test_cyclic_dependency_through_method() {
    assert_direct_cycle::<AlphaByMethod>();
}

#[test]
fn test_transitive_cyclic_dependency() {
    let mut config = ContextConfig::new();
    config.bind::<dyn Alpha, AlphaByConstructor>(&[]).unwrap();
    config.bind::<dyn Beta, BetaNeedsGamma>(&[]).unwrap();
    config.bind::<dyn Gamma, GammaNeedsAlpha>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert_eq!(err.cycle().unwrap().len(), 3);
    assert_eq!(
        err.cycle_types(),
        types(&[
            TypeKey::of::<dyn Alpha>(),
            TypeKey::of::<dyn Beta>(),
            TypeKey::of::<dyn Gamma>(),
        ])
    );
    assert!(err.to_string().contains(" -> "));
}

#[test]
fn test_cycle_excludes_keys_leading_into_it() {
    struct Entry;

    impl Component for Entry {
        fn describe() -> ComponentDescriptor<Self> {
            ComponentDescriptor::new().constructor(Constructor::inject(
                vec![Param::of::<dyn Alpha>()],
                |_| Ok(Entry),
            ))
        }
    }

    let mut config = ContextConfig::new();
    config.bind::<Entry, Entry>(&[]).unwrap();
    config.bind::<dyn Alpha, AlphaByConstructor>(&[]).unwrap();
    config.bind::<dyn Beta, BetaNeedsAlpha>(&[]).unwrap();

    let err = config.get_context().unwrap_err();
    assert!(!err.cycle_types().contains(&TypeKey::of::<Entry>()));
    assert_eq!(err.cycle_types().len(), 2);
}

#[test]
fn test_deferred_dependency_breaks_cycle() {
    init_tracing();
    let mut config = ContextConfig::new();
    config.bind::<dyn Alpha, AlphaByConstructor>(&[]).unwrap();
    config.bind::<dyn Beta, BetaWithLazyAlpha>(&[]).unwrap();
    let context = config.get_context().unwrap();

    let alpha = context.instance::<dyn Alpha>().unwrap().unwrap();
    assert_eq!(alpha.name(), "alpha");

    let beta = context.instance::<dyn Beta>().unwrap().unwrap();
    let through_handle = beta.alpha().unwrap();
    assert_eq!(through_handle.name(), "alpha");
}
