//! Build resolution - turns a build plan into concrete instances
//!
//! A plan is materialized as one or more *passes*. Each pass fires the
//! before hooks, applies its templates in order, applies the caller
//! override, then fires the after hooks with the instance. A request with
//! identifiers first builds its base through a full default-template pass,
//! so the default template's hook cycle stays observable. Nested builds
//! triggered from inside templates compound the counts the same way.

use std::any::Any;
use std::rc::Rc;

use crate::error::FactoryError;
use crate::runtime::Runtime;

use super::registry::DEFAULT_TEMPLATE;

/// The transient tuple a [`BuildHandle`](crate::BuildHandle) accumulates.
///
/// Templates are resolved by key when the plan is materialized, not when
/// the plan is constructed.
pub(crate) struct BuildPlan<T> {
    pub(crate) identifiers: Vec<String>,
    pub(crate) tweak: Option<Rc<dyn Fn(&mut T)>>,
    pub(crate) skip_before: bool,
    pub(crate) skip_after: bool,
    pub(crate) count: usize,
}

impl<T> BuildPlan<T> {
    pub(crate) fn new() -> Self {
        Self {
            identifiers: Vec::new(),
            tweak: None,
            skip_before: false,
            skip_after: false,
            count: 1,
        }
    }
}

impl<T> Clone for BuildPlan<T> {
    fn clone(&self) -> Self {
        Self {
            identifiers: self.identifiers.clone(),
            tweak: self.tweak.clone(),
            skip_before: self.skip_before,
            skip_after: self.skip_after,
            count: self.count,
        }
    }
}

/// Materialize a single instance for the plan.
///
/// Without identifiers this is one pass applying the default template
/// (strict: missing default is an error). With identifiers, the default
/// template builds the base in a pass of its own whenever it is registered,
/// then the named templates and the override layer over that base in the
/// request's final pass. Each requested identifier is looked up strictly.
pub(crate) fn materialize<T: Any + Default>(
    runtime: &Runtime,
    plan: &BuildPlan<T>,
) -> Result<T, FactoryError> {
    let tweak = plan.tweak.as_deref();

    if plan.identifiers.is_empty() {
        return pass(
            runtime,
            T::default(),
            true,
            &[],
            tweak,
            plan.skip_before,
            plan.skip_after,
        );
    }

    let base = if runtime.templates().contains::<T>(DEFAULT_TEMPLATE) {
        pass(
            runtime,
            T::default(),
            true,
            &[],
            None,
            plan.skip_before,
            plan.skip_after,
        )?
    } else {
        T::default()
    };

    pass(
        runtime,
        base,
        false,
        &plan.identifiers,
        tweak,
        plan.skip_before,
        plan.skip_after,
    )
}

/// One build pass: hooks around template application and the override.
fn pass<T: Any>(
    runtime: &Runtime,
    mut instance: T,
    apply_default: bool,
    identifiers: &[String],
    tweak: Option<&dyn Fn(&mut T)>,
    skip_before: bool,
    skip_after: bool,
) -> Result<T, FactoryError> {
    if !skip_before {
        runtime.hooks().fire_before();
    }

    if apply_default {
        let template = runtime.templates().lookup::<T>(DEFAULT_TEMPLATE)?;
        template.apply(runtime, &mut instance)?;
    }

    for identifier in identifiers {
        let template = runtime.templates().lookup::<T>(identifier)?;
        template.apply(runtime, &mut instance)?;
    }

    if let Some(tweak) = tweak {
        tweak(&mut instance);
    }

    if !skip_after {
        runtime.hooks().fire_after(&instance);
    }

    Ok(instance)
}
