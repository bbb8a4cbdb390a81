//! Component Value Objects
//!
//! A component is a discoverable implementation type: its descriptor plus
//! one constructor per contract it can be resolved as. Rust needs a
//! separate upcast for every trait object, so constructors are keyed by
//! contract rather than shared.

use std::fmt;
use std::sync::Arc;

use super::binding::{Constructor, Instance};
use super::contract::ContractKey;
use super::identity::{TypeIdentity, TypeInfo, TypeRef};
use crate::error::Result;
use crate::ports::Resolver;

/// Value Object: Component
#[derive(Clone)]
pub struct Component {
    info: TypeRef,
    constructors: Vec<(ContractKey, Constructor)>,
}

impl Component {
    /// Start describing a component
    pub fn builder(info: TypeInfo) -> ComponentBuilder {
        ComponentBuilder {
            info,
            constructors: Vec::new(),
        }
    }

    /// The type descriptor
    pub fn info(&self) -> &TypeRef {
        &self.info
    }

    /// The type identity
    pub fn identity(&self) -> &TypeIdentity {
        self.info.identity()
    }

    /// Whether the component is fully concrete
    pub fn is_concrete(&self) -> bool {
        self.info.is_concrete()
    }

    /// Every contract the component implements, in declaration order
    pub fn implemented_contracts(&self) -> &[ContractKey] {
        self.info.contracts()
    }

    /// Constructor resolving this component as `contract`
    pub fn constructor_for(&self, contract: &ContractKey) -> Option<Constructor> {
        self.constructors
            .iter()
            .find(|(key, _)| key == contract)
            .map(|(_, ctor)| Arc::clone(ctor))
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("identity", self.identity())
            .field("kind", &self.info.kind())
            .field("contracts", &self.constructors.len())
            .finish()
    }
}

/// Builder for [`Component`]
pub struct ComponentBuilder {
    info: TypeInfo,
    constructors: Vec<(ContractKey, Constructor)>,
}

impl ComponentBuilder {
    /// Declare a contract together with the constructor that provides it
    pub fn provides<F>(mut self, contract: ContractKey, constructor: F) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<Instance> + Send + Sync + 'static,
    {
        self.info.add_contract(contract.clone());
        self.constructors.push((contract, Arc::new(constructor)));
        self
    }

    /// Typed variant of [`provides`](Self::provides) for `Arc<T>` constructors
    pub fn provides_as<T, F>(self, contract: ContractKey, constructor: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.provides(contract, move |resolver: &dyn Resolver| {
            constructor(resolver).map(Instance::new)
        })
    }

    /// Declare an implemented contract without a constructor
    ///
    /// Used for markers and for contracts of non-concrete types. A concrete
    /// component that declares a scanned contract this way is still
    /// discovered, and binding it with `RegistrationOp::with_lifetime` fails
    /// with a `Registry` error naming the component and the contract. Use
    /// [`provides`](Self::provides) for contracts that should resolve.
    pub fn implements(mut self, contract: ContractKey) -> Self {
        self.info.add_contract(contract);
        self
    }

    /// Finish the component
    pub fn build(self) -> Component {
        Component {
            info: self.info.into_ref(),
            constructors: self.constructors,
        }
    }
}
