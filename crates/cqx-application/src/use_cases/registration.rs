//! Registration Use Case
//!
//! Scans modules for implementations of a family of contract shapes and
//! registers one binding per discovered (implementation, shape, tuple).
//!
//! The registration operation for each shape comes from an explicit
//! shape-keyed table built once at start-up; nothing is dispatched
//! dynamically by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cqx_domain::error::{Error, Result};
use cqx_domain::ports::{BindingRegistry, ModuleSource};
use cqx_domain::value_objects::{
    Binding, BindingSnapshot, Component, ContractShape, Lifetime, ShapeId,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain_services::{ContractIntrospector, Discovery};

/// Produces the binding for one discovery
pub type RegistrationFn = Arc<dyn Fn(&Discovery) -> Result<Binding> + Send + Sync>;

/// Registration operation bound to a shape
#[derive(Clone)]
pub struct RegistrationOp(RegistrationFn);

impl RegistrationOp {
    /// Custom registration operation
    pub fn new<F>(op: F) -> Self
    where
        F: Fn(&Discovery) -> Result<Binding> + Send + Sync + 'static,
    {
        Self(Arc::new(op))
    }

    /// Bind the component's own constructor for the closed contract with `lifetime`
    pub fn with_lifetime(lifetime: Lifetime) -> Self {
        Self::new(move |discovery: &Discovery| {
            let component: &Component = &discovery.implementation;
            let constructor = component
                .constructor_for(&discovery.contract)
                .ok_or_else(|| {
                    Error::registry(format!(
                        "{} declares {} but provides no constructor for it",
                        component.identity(),
                        discovery.contract
                    ))
                })?;
            Ok(Binding::concrete(
                discovery.contract.clone(),
                lifetime,
                component.identity(),
                constructor,
            ))
        })
    }

    /// Transient registration
    pub fn transient() -> Self {
        Self::with_lifetime(Lifetime::Transient)
    }

    /// Scoped registration
    pub fn scoped() -> Self {
        Self::with_lifetime(Lifetime::Scoped)
    }

    /// Singleton registration
    pub fn singleton() -> Self {
        Self::with_lifetime(Lifetime::Singleton)
    }

    /// Run the operation
    pub fn invoke(&self, discovery: &Discovery) -> Result<Binding> {
        (self.0)(discovery)
    }
}

impl fmt::Debug for RegistrationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RegistrationOp")
    }
}

/// Ordered family of contract shapes scanned together
#[derive(Debug, Clone, Default)]
pub struct ShapeFamily {
    shapes: Vec<ContractShape>,
}

impl ShapeFamily {
    /// Empty family
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape; a shape with the same (base, arity) is only kept once
    pub fn with(mut self, shape: ContractShape) -> Self {
        if !self.shapes.iter().any(|s| s.id() == shape.id()) {
            self.shapes.push(shape);
        }
        self
    }

    /// Shapes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ContractShape> {
        self.shapes.iter()
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the family is empty
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl FromIterator<ContractShape> for ShapeFamily {
    fn from_iter<I: IntoIterator<Item = ContractShape>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Shape → registration operation table
#[derive(Debug, Clone, Default)]
pub struct RegistrationTable {
    ops: HashMap<ShapeId, RegistrationOp>,
}

impl RegistrationTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `op` to `shape`, replacing any previous binding for it
    pub fn bind(mut self, shape: &ContractShape, op: RegistrationOp) -> Self {
        self.ops.insert(shape.id(), op);
        self
    }

    /// Operation bound to `shape`
    pub fn get(&self, shape: &ShapeId) -> Option<&RegistrationOp> {
        self.ops.get(shape)
    }
}

/// Per-shape registration count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeRegistrations {
    /// Shape rendered as `base/arity`
    pub shape: String,
    /// Bindings created for the shape
    pub count: usize,
}

/// Outcome of a scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Counts per shape, in family order
    pub shapes: Vec<ShapeRegistrations>,
    /// Every binding added, in registration order
    pub bindings: Vec<BindingSnapshot>,
}

impl ScanReport {
    /// Total bindings added
    pub fn total(&self) -> usize {
        self.bindings.len()
    }

    /// Bindings added for `shape`
    pub fn count_for(&self, shape: &ContractShape) -> usize {
        let id = shape.id().to_string();
        self.shapes
            .iter()
            .find(|s| s.shape == id)
            .map_or(0, |s| s.count)
    }
}

/// Populates a registry from discovered components
pub struct RegistrationDispatcher<'r> {
    registry: &'r mut dyn BindingRegistry,
}

impl<'r> RegistrationDispatcher<'r> {
    /// Register into `registry`
    pub fn new(registry: &'r mut dyn BindingRegistry) -> Self {
        Self { registry }
    }

    /// Discover implementations of every shape in `family` and register them
    ///
    /// Fan-out: a component matching two shapes, or one shape over two
    /// tuples, produces two bindings. Every shape needs an operation in
    /// `table`. All bindings are built before any is added, so an error
    /// leaves the registry unchanged.
    pub fn scan_and_register(
        &mut self,
        family: &ShapeFamily,
        modules: &[Arc<dyn ModuleSource>],
        table: &RegistrationTable,
    ) -> Result<ScanReport> {
        let mut plan: Vec<(&ContractShape, &RegistrationOp)> = Vec::with_capacity(family.len());
        for shape in family.iter() {
            let op = table.get(&shape.id()).ok_or_else(|| {
                Error::configuration(format!("No registration operation bound to {shape}"))
            })?;
            plan.push((shape, op));
        }

        let mut report = ScanReport::default();
        let mut pending: Vec<Binding> = Vec::new();
        for (shape, op) in plan {
            let mut count = 0;
            for discovery in ContractIntrospector::discover(shape, modules) {
                let discovery = discovery?;
                debug!(
                    implementation = %discovery.implementation.identity(),
                    contract = %discovery.contract,
                    "Discovered implementation"
                );
                pending.push(op.invoke(&discovery)?);
                count += 1;
            }
            report.shapes.push(ShapeRegistrations {
                shape: shape.id().to_string(),
                count,
            });
        }

        for binding in pending {
            report.bindings.push(binding.describe());
            self.registry.add(binding);
        }

        info!(
            shapes = family.len(),
            modules = modules.len(),
            registered = report.total(),
            "Scan and register complete"
        );
        Ok(report)
    }
}
