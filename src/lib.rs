//! Prefab - declarative test-data factories
//!
//! This library lets test authors declare named **templates** that describe
//! how to populate an instance of a type with plausible default field
//! values, then build one or many instances on demand, optionally layering
//! named templates, overriding fields and running lifecycle hooks around
//! each build.
//!
//! Everything hangs off an explicitly constructed [`Runtime`]: no global
//! state, so every test can hold its own isolated registry. Blank instances
//! come from the type's `Default` implementation.
//!
//! # Example
//!
//! ```rust
//! use prefab::Runtime;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     name: String,
//!     admin: bool,
//! }
//!
//! let mut runtime = Runtime::new();
//! runtime.define::<User>(|_, user| {
//!     user.name = "Malcom".to_string();
//!     Ok(())
//! });
//! runtime.define_as::<User>("admin", |_, user| {
//!     user.admin = true;
//!     Ok(())
//! });
//!
//! let admin = runtime
//!     .build::<User>()
//!     .template("admin")
//!     .set(|user| user.name.push_str(" Scott"))
//!     .to_one()
//!     .unwrap();
//!
//! assert_eq!(admin.name, "Malcom Scott");
//! assert!(admin.admin);
//! ```
//!
//! Templates can build other types through the runtime they are handed;
//! each nested build runs its own full hook cycle, so hook invocation
//! counts compound across nesting depth.

pub mod builder;
pub mod error;
pub mod hook;
pub mod runtime;
pub mod source;
pub mod template;

pub use builder::BuildHandle;
pub use error::FactoryError;
pub use hook::HookSet;
pub use runtime::{HookRegistrar, Runtime};
pub use source::{DefinitionSource, DEFAULT_SOURCE};
pub use template::{Template, TemplateRegistry, DEFAULT_TEMPLATE};
