//! Module Introspection Port
//!
//! A module is a unit of compiled code whose component types can be
//! enumerated for discovery.

use std::sync::Arc;

use crate::error::Result;
use crate::value_objects::Component;

/// Enumerable source of component types
pub trait ModuleSource: Send + Sync {
    /// Module name, used in diagnostics
    fn name(&self) -> &str;

    /// Every declared component, concrete or not, in declaration order
    ///
    /// Fails with [`Error::ModuleIntrospectionFailure`](crate::Error::ModuleIntrospectionFailure)
    /// when the module's metadata cannot be read.
    fn list_types(&self) -> Result<Vec<Arc<Component>>>;
}
