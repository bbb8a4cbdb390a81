//! Domain Port Interfaces
//!
//! Boundary contracts consumed by the composition engine. Implementations
//! live in the infrastructure layer.
//!
//! ## Organization
//!
//! - **registry** - Ordered binding store (add / replace / enumerate)
//! - **resolver** - Instance resolution, used inside construction closures
//! - **module** - Module introspection for component discovery

/// Ordered binding store
pub mod registry;
/// Instance resolution
pub mod resolver;
/// Module introspection
pub mod module;

pub use module::ModuleSource;
pub use registry::BindingRegistry;
pub use resolver::{Resolver, ResolverExt};
