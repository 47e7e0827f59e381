//! Template registry for storing and retrieving template definitions

use std::any::{Any, TypeId};
use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::FactoryError;
use crate::runtime::Runtime;

/// Identifier of the default (unnamed) template for a type.
pub const DEFAULT_TEMPLATE: &str = "";

/// Registry key: target type plus template identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TemplateKey {
    type_id: TypeId,
    identifier: String,
}

type ErasedMutate = Box<dyn Fn(&Runtime, &mut dyn Any) -> Result<(), FactoryError>>;

/// A stored template: fills in a blank instance of its target type.
///
/// The mutate closure receives the runtime it was resolved from, so a
/// template can trigger nested builds of other types while it runs.
/// Templates are immutable once registered; re-registering the same
/// `(type, identifier)` key replaces the previous template.
pub struct Template {
    type_name: &'static str,
    identifier: String,
    mutate: ErasedMutate,
}

impl Template {
    pub(crate) fn new<T: Any>(
        identifier: impl Into<String>,
        mutate: impl Fn(&Runtime, &mut T) -> Result<(), FactoryError> + 'static,
    ) -> Self {
        let erased: ErasedMutate = Box::new(move |runtime, instance| {
            let instance = instance
                .downcast_mut::<T>()
                .expect("template invoked with its registered target type");
            mutate(runtime, instance)
        });

        Self {
            type_name: std::any::type_name::<T>(),
            identifier: identifier.into(),
            mutate: erased,
        }
    }

    /// Name of the target type, as reported by `std::any::type_name`
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identifier this template is registered under
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// True for the default (unnamed) template of its type
    pub fn is_default(&self) -> bool {
        self.identifier.is_empty()
    }

    /// Run the mutate closure against an instance of the target type
    pub(crate) fn apply(
        &self,
        runtime: &Runtime,
        instance: &mut dyn Any,
    ) -> Result<(), FactoryError> {
        (self.mutate)(runtime, instance)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("type_name", &self.type_name)
            .field("identifier", &self.identifier)
            .finish()
    }
}

/// Registry mapping `(type, identifier)` keys to templates
///
/// Holds at most one template per key; the last registration wins. The
/// registry is only mutated through the runtime's `define` operations and
/// is never touched while a build is in progress.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: FxHashMap<TemplateKey, Template>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one under the same key
    pub(crate) fn insert<T: Any>(
        &mut self,
        identifier: impl Into<String>,
        mutate: impl Fn(&Runtime, &mut T) -> Result<(), FactoryError> + 'static,
    ) {
        let template = Template::new::<T>(identifier, mutate);
        let key = TemplateKey {
            type_id: TypeId::of::<T>(),
            identifier: template.identifier().to_string(),
        };
        self.templates.insert(key, template);
    }

    /// Get the template registered for `T` under `identifier`
    ///
    /// Fails with [`FactoryError::TemplateNotFound`] when no template is
    /// registered for that exact key.
    pub fn lookup<T: Any>(&self, identifier: &str) -> Result<&Template, FactoryError> {
        let key = TemplateKey {
            type_id: TypeId::of::<T>(),
            identifier: identifier.to_string(),
        };
        self.templates
            .get(&key)
            .ok_or_else(|| FactoryError::TemplateNotFound {
                type_name: std::any::type_name::<T>(),
                identifier: identifier.to_string(),
            })
    }

    /// Check whether a template exists for `T` under `identifier`
    pub fn contains<T: Any>(&self, identifier: &str) -> bool {
        let key = TemplateKey {
            type_id: TypeId::of::<T>(),
            identifier: identifier.to_string(),
        };
        self.templates.contains_key(&key)
    }

    /// Read-only snapshot of all registered templates
    ///
    /// Sorted by `(type_name, identifier)` so introspection output is
    /// deterministic.
    pub fn all(&self) -> Vec<&Template> {
        let mut templates: Vec<&Template> = self.templates.values().collect();
        templates.sort_by(|a, b| {
            (a.type_name(), a.identifier()).cmp(&(b.type_name(), b.identifier()))
        });
        templates
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when no templates are registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.templates.clear();
    }
}
