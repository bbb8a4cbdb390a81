//! # CQX Domain
//!
//! Core types of the CQX composition engine: runtime descriptors for
//! (possibly parameterized) contracts, the bindings a registry holds, the
//! error taxonomy, and the ports the engine consumes.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | `Error` taxonomy and `Result` alias |
//! | [`value_objects`] | Identities, contract keys and shapes, bindings, components |
//! | [`ports`] | `BindingRegistry`, `Resolver`, `ModuleSource` |

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{BindingRegistry, ModuleSource, Resolver, ResolverExt};
pub use value_objects::*;
