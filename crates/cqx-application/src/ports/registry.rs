//! Component Registry System
//!
//! Compile-time registration of discoverable components. Uses the `linkme`
//! crate so that components declared anywhere in the final binary can be
//! enumerated by module name at start-up.
//!
//! ## Registration Flow
//!
//! ```text
//! 1. Component crate:  #[linkme::distributed_slice(COMPONENTS)]
//!                      static ENTRY: ComponentEntry = ...
//!                            ↓
//! 2. This module:      pub static COMPONENTS: [ComponentEntry] = [..]
//!                            ↓
//! 3. LinkedModule:     components_in("orders")
//!                            ↓
//! 4. Introspector:     (implementation, tuple) per matching contract
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use cqx_application::ports::registry::{ComponentEntry, COMPONENTS};
//!
//! #[linkme::distributed_slice(COMPONENTS)]
//! static PING_HANDLER: ComponentEntry = ComponentEntry {
//!     module: "orders",
//!     name: "PingHandler",
//!     describe: || Ok(Component::builder(TypeInfo::concrete("PingHandler")).build()),
//! };
//! ```
//!
//! Link order decides slice order, so enumeration is stable within a run
//! but not guaranteed across builds.

use cqx_domain::error::Result;
use cqx_domain::value_objects::Component;

/// Registry entry for a discoverable component
pub struct ComponentEntry {
    /// Module the component belongs to
    pub module: &'static str,
    /// Component name, used in diagnostics
    pub name: &'static str,
    /// Builds the component descriptor and its constructors
    pub describe: fn() -> Result<Component>,
}

// Auto-collection via linkme distributed slices - components submit entries at link time
#[linkme::distributed_slice]
pub static COMPONENTS: [ComponentEntry] = [..];

/// Entries registered for `module`, in slice order
pub fn components_in(module: &str) -> impl Iterator<Item = &'static ComponentEntry> + '_ {
    COMPONENTS.iter().filter(move |entry| entry.module == module)
}

/// Distinct module names with at least one registered component
pub fn list_modules() -> Vec<&'static str> {
    let mut modules: Vec<&'static str> = Vec::new();
    for entry in COMPONENTS {
        if !modules.contains(&entry.module) {
            modules.push(entry.module);
        }
    }
    modules
}
