//! Contract Introspection
//!
//! Scans modules for concrete implementations of a contract shape and
//! extracts, per implementation, every argument tuple it closes the shape
//! over.
//!
//! ## Rules
//!
//! - Only concrete components qualify; abstract and parameterized
//!   candidates are never yielded
//! - A component closing the shape over several distinct tuples yields once
//!   per tuple
//! - Order follows module order, then declaration order within a module

use std::sync::Arc;

use cqx_domain::error::{Error, Result};
use cqx_domain::ports::ModuleSource;
use cqx_domain::value_objects::{ArgumentTuple, Component, ContractKey, ContractShape, ShapeId};
use tracing::trace;

/// One discovered (implementation, shape, tuple) triple
#[derive(Debug, Clone)]
pub struct Discovery {
    /// The implementing component
    pub implementation: Arc<Component>,
    /// The shape that was matched
    pub shape: ShapeId,
    /// The closed contract the component implements
    pub contract: ContractKey,
}

impl Discovery {
    /// The argument tuple the shape is closed over; empty for fixed shapes
    pub fn arguments(&self) -> &ArgumentTuple {
        self.contract.arguments()
    }
}

/// Discovers implementations of contract shapes across modules
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractIntrospector;

impl ContractIntrospector {
    /// Lazily discover implementations of `shape` in `modules`
    ///
    /// Each module is listed only when iteration reaches it. A module that
    /// cannot be listed yields a single `ModuleIntrospectionFailure`. The
    /// sequence is finite; call again to restart it.
    pub fn discover<'a>(
        shape: &'a ContractShape,
        modules: &'a [Arc<dyn ModuleSource>],
    ) -> impl Iterator<Item = Result<Discovery>> + 'a {
        modules.iter().flat_map(move |module| {
            let found: Vec<Result<Discovery>> = match module.list_types() {
                Ok(components) => components
                    .into_iter()
                    .flat_map(|component| Self::closures_of(shape, &component))
                    .map(Ok)
                    .collect(),
                Err(error) => vec![Err(Self::introspection_failure(module.name(), error))],
            };
            found
        })
    }

    /// Every closure of `shape` implemented by `component`
    pub fn closures_of(shape: &ContractShape, component: &Arc<Component>) -> Vec<Discovery> {
        if !component.is_concrete() {
            trace!(
                component = %component.identity(),
                shape = %shape,
                "Skipping non-concrete candidate"
            );
            return Vec::new();
        }

        component
            .implemented_contracts()
            .iter()
            .filter(|contract| shape.matches(contract))
            .map(|contract| Discovery {
                implementation: Arc::clone(component),
                shape: shape.id(),
                contract: contract.clone(),
            })
            .collect()
    }

    fn introspection_failure(module: &str, error: Error) -> Error {
        match error {
            Error::ModuleIntrospectionFailure { .. } => error,
            other => Error::module_introspection(module, other.to_string()),
        }
    }
}
