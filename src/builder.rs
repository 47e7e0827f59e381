//! Deferred build requests
//!
//! A [`BuildHandle`] wraps one build plan and materializes instances on
//! demand. Chained configuration calls consume the handle and return an
//! updated copy, so every call is independently observable; cloning a
//! handle branches the plan without sharing mutable state.

use std::any::Any;
use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::FactoryError;
use crate::runtime::Runtime;
use crate::template::{materialize, BuildPlan};

/// A deferred, repeatable build request for instances of `T`.
///
/// Created by [`Runtime::build`]. Templates are looked up when a
/// materializer (`to_one`, `to_list`, `to_set`) runs, not when the handle
/// is configured.
///
/// # Example
///
/// ```rust
/// use prefab::Runtime;
///
/// #[derive(Debug, Default, Clone)]
/// struct Ticket {
///     seat: String,
///     paid: bool,
/// }
///
/// let mut runtime = Runtime::new();
/// runtime.define::<Ticket>(|_, ticket| {
///     ticket.seat = "12A".to_string();
///     Ok(())
/// });
///
/// let tickets = runtime
///     .build::<Ticket>()
///     .set(|ticket| ticket.paid = true)
///     .times(3)
///     .to_list()
///     .unwrap();
///
/// assert_eq!(tickets.len(), 3);
/// assert!(tickets.iter().all(|t| t.paid && t.seat == "12A"));
/// ```
pub struct BuildHandle<'rt, T> {
    runtime: &'rt Runtime,
    plan: BuildPlan<T>,
}

impl<'rt, T: Any + Default> BuildHandle<'rt, T> {
    pub(crate) fn new(runtime: &'rt Runtime) -> Self {
        Self {
            runtime,
            plan: BuildPlan::new(),
        }
    }

    /// Append a named template to apply after the default template.
    ///
    /// Templates apply in the order they are appended; a later template may
    /// overwrite fields set by an earlier one.
    pub fn template(mut self, identifier: impl Into<String>) -> Self {
        self.plan.identifiers.push(identifier.into());
        self
    }

    /// Append several named templates, preserving iteration order.
    pub fn templates<I>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.plan
            .identifiers
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Set the caller override, applied after every template so it always
    /// wins.
    pub fn set(mut self, tweak: impl Fn(&mut T) + 'static) -> Self {
        self.plan.tweak = Some(Rc::new(tweak));
        self
    }

    /// Suppress before hooks for the passes this request runs.
    ///
    /// Builds triggered from inside template closures are independent
    /// requests and keep their own defaults.
    pub fn skip_before_hook(mut self, skip: bool) -> Self {
        self.plan.skip_before = skip;
        self
    }

    /// Suppress after hooks for the passes this request runs.
    pub fn skip_after_hook(mut self, skip: bool) -> Self {
        self.plan.skip_after = skip;
        self
    }

    /// Number of instances `to_list` / `to_set` materialize. Defaults to 1.
    pub fn times(mut self, count: usize) -> Self {
        self.plan.count = count;
        self
    }

    /// Materialize exactly one instance, regardless of `times`.
    pub fn to_one(&self) -> Result<T, FactoryError> {
        materialize(self.runtime, &self.plan)
    }

    /// Materialize `count` independent instances in build order.
    ///
    /// Each instance runs its own full resolver pass, with its own hook
    /// invocations.
    pub fn to_list(&self) -> Result<Vec<T>, FactoryError> {
        (0..self.plan.count)
            .map(|_| materialize(self.runtime, &self.plan))
            .collect()
    }

    /// Materialize `count` independent instances into a set.
    ///
    /// Structurally-equal instances collapse when `T`'s equality is
    /// value-based; the set may end up smaller than `count`.
    pub fn to_set(&self) -> Result<HashSet<T>, FactoryError>
    where
        T: Eq + Hash,
    {
        (0..self.plan.count)
            .map(|_| materialize(self.runtime, &self.plan))
            .collect()
    }
}

impl<T> Clone for BuildHandle<'_, T> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime,
            plan: self.plan.clone(),
        }
    }
}
