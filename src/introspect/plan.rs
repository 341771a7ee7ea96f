use super::descriptor::{Component, ComponentDescriptor, Constructor, Field, Method, Param, TypeKind};
use crate::component::{Args, ComponentRef, Injected};
use std::fmt;
use wirebox_core::{Tag, WireboxError, WireboxResult};

/// Validated recipe for building a `C`
///
/// `required` lists constructor parameters, then fields, then method
/// parameters. [`InjectionPlan::instantiate`] expects resolved values in
/// exactly that order.
pub struct InjectionPlan<C> {
    type_name: &'static str,
    tags: Vec<Tag>,
    required: Vec<ComponentRef>,
    constructor: Constructor<C>,
    fields: Vec<Field<C>>,
    methods: Vec<Method<C>>,
}

/// Inspect `C` and produce its injection plan
pub fn introspect<C: Component>() -> WireboxResult<InjectionPlan<C>> {
    InjectionPlan::from_descriptor(C::describe())
}

impl<C: 'static> InjectionPlan<C> {
    pub fn from_descriptor(descriptor: ComponentDescriptor<C>) -> WireboxResult<Self> {
        let ComponentDescriptor {
            type_name,
            kind,
            tags,
            constructors,
            levels,
        } = descriptor;
        let illegal = |reason: String| WireboxError::illegal_component(type_name, reason);

        match kind {
            TypeKind::Concrete => {}
            TypeKind::Abstract => return Err(illegal("abstract types cannot be instantiated".into())),
            TypeKind::Interface => return Err(illegal("interfaces cannot be instantiated".into())),
        }

        let constructor = select_constructor(constructors).map_err(illegal)?;

        let mut fields = Vec::new();
        let mut hierarchy = Vec::with_capacity(levels.len());
        for level in levels {
            for field in level.fields {
                if field.is_final {
                    return Err(illegal(format!(
                        "field '{}' of {} is final and cannot be injected",
                        field.name, level.type_name
                    )));
                }
                fields.push(field);
            }
            hierarchy.push(level.methods);
        }

        let methods = collect_methods(hierarchy);
        if let Some(method) = methods.iter().find(|m| m.type_params > 0) {
            return Err(illegal(format!(
                "injection method '{}' declares type parameters",
                method.name
            )));
        }

        let params = constructor
            .params
            .iter()
            .chain(fields.iter().map(|f| &f.param))
            .chain(methods.iter().flat_map(|m| m.params.iter()));
        let mut required = Vec::new();
        for param in params {
            check_qualifiers(param).map_err(&illegal)?;
            required.push(param.component_ref());
        }

        tracing::trace!(
            component = type_name,
            dependencies = required.len(),
            fields = fields.len(),
            methods = methods.len(),
            "Introspected component"
        );

        Ok(Self {
            type_name,
            tags,
            required,
            constructor,
            fields,
            methods,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Tags declared on the component type
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn required(&self) -> &[ComponentRef] {
        &self.required
    }

    /// Run the recipe with dependencies resolved in `required` order
    pub fn instantiate(&self, injected: Vec<Injected>) -> anyhow::Result<C> {
        if injected.len() != self.required.len() {
            anyhow::bail!(
                "{} needs {} dependencies, got {}",
                self.type_name,
                self.required.len(),
                injected.len()
            );
        }
        let mut values = injected.into_iter();
        let mut take = |count: usize| Args::new(self.type_name, values.by_ref().take(count).collect());

        let mut instance = (self.constructor.build)(&mut take(self.constructor.params.len()))?;
        for field in &self.fields {
            (field.apply)(&mut instance, &mut take(1))?;
        }
        for method in &self.methods {
            (method.apply)(&mut instance, &mut take(method.params.len()))?;
        }
        Ok(instance)
    }
}

impl<C> fmt::Debug for InjectionPlan<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPlan")
            .field("type_name", &self.type_name)
            .field("tags", &self.tags)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

fn select_constructor<C>(mut constructors: Vec<Constructor<C>>) -> Result<Constructor<C>, String> {
    let injectable = constructors.iter().filter(|c| c.injectable).count();
    if injectable > 1 {
        return Err(format!("{} constructors are marked for injection", injectable));
    }
    let index = if injectable == 1 {
        constructors.iter().position(|c| c.injectable)
    } else {
        constructors.iter().position(|c| c.params.is_empty())
    };
    match index {
        Some(index) => Ok(constructors.swap_remove(index)),
        None => Err("no injectable or no-argument constructor".to_string()),
    }
}

/// Flatten per-level methods into call order
///
/// `hierarchy[0]` is the component itself, later entries are ancestors. A
/// method is dropped when a more-derived level declares one with the same
/// name and parameter shape; only injectable survivors are kept, ancestors first.
fn collect_methods<C: 'static>(hierarchy: Vec<Vec<Method<C>>>) -> Vec<Method<C>> {
    let mut kept: Vec<Vec<Method<C>>> = Vec::with_capacity(hierarchy.len());
    let mut declared: Vec<&Method<C>> = Vec::new();
    let mut survivors: Vec<Vec<bool>> = Vec::with_capacity(hierarchy.len());

    for level in &hierarchy {
        let flags = level
            .iter()
            .map(|method| method.injectable && !declared.iter().any(|d| d.overrides(method)))
            .collect();
        survivors.push(flags);
        declared.extend(level.iter());
    }

    for (level, flags) in hierarchy.into_iter().zip(survivors) {
        kept.push(
            level
                .into_iter()
                .zip(flags)
                .filter_map(|(method, keep)| keep.then_some(method))
                .collect(),
        );
    }

    kept.into_iter().rev().flatten().collect()
}

fn check_qualifiers(param: &Param) -> Result<(), String> {
    if param.qualifiers().len() > 1 {
        let names: Vec<String> = param.qualifiers().iter().map(ToString::to_string).collect();
        return Err(format!(
            "injection point has more than one qualifier: {}",
            names.join(", ")
        ));
    }
    Ok(())
}
