//! Definition sources
//!
//! A definition source is a named body of template definitions installed on
//! a [`Runtime`] and executed by [`Runtime::load`]. The runtime treats a
//! source as an opaque side-effecting call: how the source decides what to
//! define (inline closures, a module of `fn(&mut Runtime)` items, anything
//! else) is entirely up to the caller.

use crate::runtime::Runtime;

/// Name under which the default definition source is installed.
pub const DEFAULT_SOURCE: &str = "";

/// A body of definition code executed against a runtime at load time.
///
/// Blanket-implemented for closures and functions taking `&mut Runtime`, so
/// most callers never implement this by hand:
///
/// ```rust
/// use prefab::Runtime;
///
/// #[derive(Debug, Default)]
/// struct Account {
///     owner: String,
/// }
///
/// let mut runtime = Runtime::new();
/// runtime.install_source(|runtime: &mut Runtime| {
///     runtime.define::<Account>(|_, account| {
///         account.owner = "holder".to_string();
///         Ok(())
///     });
/// });
///
/// runtime.load().expect("default source is installed");
/// assert_eq!(runtime.templates().len(), 1);
/// ```
pub trait DefinitionSource {
    /// Register templates (and anything else) on the runtime being loaded
    fn populate(&self, runtime: &mut Runtime);
}

impl<F> DefinitionSource for F
where
    F: Fn(&mut Runtime),
{
    fn populate(&self, runtime: &mut Runtime) {
        self(runtime)
    }
}
