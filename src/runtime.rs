//! The factory runtime: registry, hooks and sources with an explicit
//! load/reset lifecycle
//!
//! A [`Runtime`] is an explicitly constructed context object rather than a
//! process-wide global: construct one per test (or per worker), thread it
//! through calls, and isolated registries can coexist freely. `load` and
//! `reset` are the only lifecycle transitions.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::builder::BuildHandle;
use crate::error::FactoryError;
use crate::hook::HookSet;
use crate::source::{DefinitionSource, DEFAULT_SOURCE};
use crate::template::{TemplateRegistry, DEFAULT_TEMPLATE};

/// Holder of the template registry, hook set and installed definition
/// sources.
///
/// # Example
///
/// ```rust
/// use prefab::Runtime;
///
/// #[derive(Debug, Default)]
/// struct User {
///     name: String,
/// }
///
/// let mut runtime = Runtime::new();
/// runtime.define::<User>(|_, user| {
///     user.name = "Malcom".to_string();
///     Ok(())
/// });
///
/// let user = runtime.build::<User>().to_one().unwrap();
/// assert_eq!(user.name, "Malcom");
/// ```
pub struct Runtime {
    templates: TemplateRegistry,
    hooks: HookSet,
    sources: BTreeMap<String, Rc<dyn DefinitionSource>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create an empty runtime: no templates, no hooks, no sources
    pub fn new() -> Self {
        Self {
            templates: TemplateRegistry::new(),
            hooks: HookSet::new(),
            sources: BTreeMap::new(),
        }
    }

    /// Register/replace the default template for `T`.
    ///
    /// The closure receives this runtime, so a template can build other
    /// types while it runs, and the blank instance to fill in.
    pub fn define<T: Any>(
        &mut self,
        mutate: impl Fn(&Runtime, &mut T) -> Result<(), FactoryError> + 'static,
    ) {
        self.templates.insert::<T>(DEFAULT_TEMPLATE, mutate);
    }

    /// Register/replace the template for `T` under `identifier`.
    pub fn define_as<T: Any>(
        &mut self,
        identifier: impl Into<String>,
        mutate: impl Fn(&Runtime, &mut T) -> Result<(), FactoryError> + 'static,
    ) {
        self.templates.insert::<T>(identifier, mutate);
    }

    /// Install the default definition source.
    pub fn install_source(&mut self, source: impl DefinitionSource + 'static) {
        self.install_source_as(DEFAULT_SOURCE, source);
    }

    /// Install a definition source under a name for [`Runtime::load_from`].
    ///
    /// Installed sources survive [`Runtime::reset`]; they play the role of
    /// the definition code available to the process, not of the loaded
    /// state.
    pub fn install_source_as(
        &mut self,
        name: impl Into<String>,
        source: impl DefinitionSource + 'static,
    ) {
        self.sources.insert(name.into(), Rc::new(source));
    }

    /// Run the default definition source and return a registrar for fluent
    /// hook registration.
    ///
    /// Every load installs a fresh empty hook set before the source runs.
    /// Loading augments or replaces templates; it never clears ones the
    /// source does not redefine. Call [`Runtime::reset`] first for a clean
    /// slate.
    pub fn load(&mut self) -> Result<HookRegistrar<'_>, FactoryError> {
        self.load_from(DEFAULT_SOURCE)
    }

    /// Run the definition source installed under `name`.
    ///
    /// Fails with [`FactoryError::SourceNotFound`] when nothing is
    /// installed under that name.
    pub fn load_from(&mut self, name: &str) -> Result<HookRegistrar<'_>, FactoryError> {
        let source = self
            .sources
            .get(name)
            .cloned()
            .ok_or_else(|| FactoryError::SourceNotFound {
                name: name.to_string(),
            })?;

        self.hooks = HookSet::new();
        source.populate(self);
        Ok(HookRegistrar { runtime: self })
    }

    /// Clear all templates and hooks, returning the runtime to its initial
    /// empty state. Installed sources are kept. Safe to call at any time,
    /// including before the first load.
    pub fn reset(&mut self) {
        self.templates.clear();
        self.hooks = HookSet::new();
    }

    /// Start a deferred build request for `T`.
    pub fn build<T: Any + Default>(&self) -> BuildHandle<'_, T> {
        BuildHandle::new(self)
    }

    /// The live template registry, for lookup and introspection.
    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// The current hook set.
    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Append a before-build hook.
    pub fn add_before_hook(&mut self, hook: impl Fn() + 'static) {
        self.hooks.add_before(hook);
    }

    /// Append an after-build hook. The hook receives each built instance
    /// type-erased as `&dyn Any`.
    pub fn add_after_hook(&mut self, hook: impl Fn(&dyn Any) + 'static) {
        self.hooks.add_after(hook);
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("templates", &self.templates)
            .field("hooks", &self.hooks)
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fluent hook registration over a freshly loaded runtime.
///
/// Returned by [`Runtime::load`] / [`Runtime::load_from`] so hooks can be
/// chained right after loading:
///
/// ```rust
/// use prefab::Runtime;
///
/// let mut runtime = Runtime::new();
/// runtime.install_source(|_: &mut Runtime| {});
///
/// runtime
///     .load()
///     .expect("default source is installed")
///     .add_before_hook(|| {})
///     .add_after_hook(|instance| {
///         let _ = instance;
///     });
///
/// assert_eq!(runtime.hooks().before_count(), 1);
/// assert_eq!(runtime.hooks().after_count(), 1);
/// ```
pub struct HookRegistrar<'rt> {
    runtime: &'rt mut Runtime,
}

impl HookRegistrar<'_> {
    /// Append a before-build hook and keep the chain going.
    pub fn add_before_hook(self, hook: impl Fn() + 'static) -> Self {
        self.runtime.hooks.add_before(hook);
        self
    }

    /// Append an after-build hook and keep the chain going.
    pub fn add_after_hook(self, hook: impl Fn(&dyn Any) + 'static) -> Self {
        self.runtime.hooks.add_after(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Profile {
        handle: String,
    }

    fn install_profiles(runtime: &mut Runtime) {
        runtime.define::<Profile>(|_, profile| {
            profile.handle = "anonymous".to_string();
            Ok(())
        });
    }

    #[test]
    fn test_define_and_build() {
        let mut runtime = Runtime::new();
        install_profiles(&mut runtime);

        let profile = runtime.build::<Profile>().to_one().expect("Should build");
        assert_eq!(profile.handle, "anonymous");
        assert_eq!(runtime.templates().len(), 1);
    }

    #[test]
    fn test_reset_is_safe_on_a_fresh_runtime() {
        let mut runtime = Runtime::new();
        runtime.reset();
        assert!(runtime.templates().is_empty());
        assert!(runtime.hooks().is_empty());
    }

    #[test]
    fn test_load_runs_the_default_source() {
        let mut runtime = Runtime::new();
        runtime.install_source(install_profiles);

        runtime.load().expect("Should load");
        assert_eq!(runtime.templates().len(), 1);
    }

    #[test]
    fn test_load_from_unknown_source_fails() {
        let mut runtime = Runtime::new();
        let result = runtime.load_from("nowhere");
        assert!(matches!(
            result,
            Err(FactoryError::SourceNotFound { ref name }) if name == "nowhere"
        ));
    }

    #[test]
    fn test_load_installs_a_fresh_hook_set() {
        let mut runtime = Runtime::new();
        runtime.install_source(install_profiles);

        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        runtime
            .load()
            .expect("Should load")
            .add_after_hook(move |_| counter.set(counter.get() + 1));
        assert_eq!(runtime.hooks().after_count(), 1);

        runtime.load().expect("Should load");
        assert!(runtime.hooks().is_empty());

        runtime.build::<Profile>().to_one().expect("Should build");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_sources_survive_reset() {
        let mut runtime = Runtime::new();
        runtime.install_source_as("profiles", install_profiles);

        runtime.load_from("profiles").expect("Should load");
        runtime.reset();
        assert!(runtime.templates().is_empty());

        runtime.load_from("profiles").expect("Should load again");
        assert_eq!(runtime.templates().len(), 1);
    }

    #[test]
    fn test_registrar_registers_in_order() {
        let mut runtime = Runtime::new();
        runtime.install_source(install_profiles);

        runtime
            .load()
            .expect("Should load")
            .add_before_hook(|| {})
            .add_before_hook(|| {})
            .add_after_hook(|_| {});

        assert_eq!(runtime.hooks().before_count(), 2);
        assert_eq!(runtime.hooks().after_count(), 1);
    }
}
