//! Dependency Injection Runtime
//!
//! ```text
//! ServiceCollection (BindingRegistry)
//!     ↑ scan / decorate            ↓ build_provider
//! CompositionRoot ────────────→ ServiceProvider ─→ ServiceScope
//!     ↑
//! StaticModule / LinkedModule (ModuleSource)
//! ```

pub mod bootstrap;
pub mod collection;
pub mod modules;
pub mod provider;

pub use bootstrap::{CompositionRoot, init_composition};
pub use collection::ServiceCollection;
pub use modules::{LinkedModule, StaticModule};
pub use provider::{ServiceProvider, ServiceScope};
