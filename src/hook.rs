//! Before/after build hooks
//!
//! Hooks are plain stored closures: before hooks take no arguments, after
//! hooks receive the built instance type-erased as `&dyn Any`. Both fire in
//! registration order for every build pass unless a build explicitly skips
//! them.

use std::any::Any;
use std::fmt;

type BeforeHook = Box<dyn Fn()>;
type AfterHook = Box<dyn Fn(&dyn Any)>;

/// Ordered before-build and after-build callbacks.
///
/// A fresh set is installed on every [`Runtime::load`](crate::Runtime::load)
/// and the set is emptied by [`Runtime::reset`](crate::Runtime::reset).
#[derive(Default)]
pub struct HookSet {
    before: Vec<BeforeHook>,
    after: Vec<AfterHook>,
}

impl HookSet {
    /// Create an empty hook set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a before-build hook
    pub fn add_before(&mut self, hook: impl Fn() + 'static) {
        self.before.push(Box::new(hook));
    }

    /// Append an after-build hook
    pub fn add_after(&mut self, hook: impl Fn(&dyn Any) + 'static) {
        self.after.push(Box::new(hook));
    }

    /// Number of registered before hooks
    pub fn before_count(&self) -> usize {
        self.before.len()
    }

    /// Number of registered after hooks
    pub fn after_count(&self) -> usize {
        self.after.len()
    }

    /// True when no hooks are registered on either side
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    pub(crate) fn fire_before(&self) {
        for hook in &self.before {
            hook();
        }
    }

    pub(crate) fn fire_after(&self, instance: &dyn Any) {
        for hook in &self.after {
            hook(instance);
        }
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}
