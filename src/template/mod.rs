//! Template storage and build resolution
//!
//! A template binds a `(target type, identifier)` key to a mutate closure
//! that fills in a blank instance. The registry stores one template per
//! key; the resolver composes the default template, requested named
//! templates and the caller override into built instances, firing hooks
//! around every pass.
//!
//! # Example
//!
//! ```rust
//! use prefab::Runtime;
//!
//! #[derive(Debug, Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let mut runtime = Runtime::new();
//! runtime.define::<Server>(|_, server| {
//!     server.host = "localhost".to_string();
//!     server.port = 8080;
//!     Ok(())
//! });
//! runtime.define_as::<Server>("tls", |_, server| {
//!     server.port = 443;
//!     Ok(())
//! });
//!
//! let server = runtime.build::<Server>().template("tls").to_one().unwrap();
//! assert_eq!((server.host.as_str(), server.port), ("localhost", 443));
//! ```

mod registry;
mod resolver;

pub use registry::{Template, TemplateRegistry, DEFAULT_TEMPLATE};
pub(crate) use resolver::{materialize, BuildPlan};
