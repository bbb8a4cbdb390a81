//! Type Identity Value Objects
//!
//! Runtime descriptors for the types that take part in composition.
//! Rust monomorphizes generics at compile time, so contracts, decorators
//! and message types are described here by name and by the contracts they
//! implement, which is all the composition engine needs to reason about them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::contract::ContractKey;

/// Value Object: Type Identity
///
/// Interned, cheaply clonable name of a type. Two identities are equal when
/// their names are equal.
///
/// ## Example
///
/// ```rust
/// use cqx_domain::value_objects::TypeIdentity;
///
/// let greeter = TypeIdentity::new("Greeter");
/// assert_eq!(greeter.name(), "Greeter");
/// assert_eq!(greeter, TypeIdentity::new("Greeter"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity(Arc<str>);

impl TypeIdentity {
    /// Create an identity from a name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Identity derived from a Rust type's name
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// The identity's name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({})", self.0)
    }
}

impl From<&str> for TypeIdentity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serialize for TypeIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Whether a type can be constructed as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Fully concrete, constructible type
    Concrete,
    /// Abstract type (trait-like or base type) that cannot be constructed
    Abstract,
    /// Type still defined over unbound type parameters
    Parameterized {
        /// Number of unbound parameters
        arity: usize,
    },
}

/// Value Object: Type Descriptor
///
/// A type identity together with its kind and the contracts it implements,
/// including pure marker contracts. Equality and hashing consider the
/// identity only.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    identity: TypeIdentity,
    kind: TypeKind,
    contracts: Vec<ContractKey>,
}

/// Shared handle to a type descriptor
pub type TypeRef = Arc<TypeInfo>;

/// Ordered concrete type arguments bound to a parameterized identity
pub type ArgumentTuple = Vec<TypeRef>;

impl TypeInfo {
    /// Describe a concrete type
    pub fn concrete(name: impl AsRef<str>) -> Self {
        Self::with_kind(TypeIdentity::new(name), TypeKind::Concrete)
    }

    /// Describe a concrete Rust type by its type name
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::with_kind(TypeIdentity::of::<T>(), TypeKind::Concrete)
    }

    /// Describe an abstract type
    pub fn abstract_type(name: impl AsRef<str>) -> Self {
        Self::with_kind(TypeIdentity::new(name), TypeKind::Abstract)
    }

    /// Describe a type with unbound parameters
    pub fn parameterized(name: impl AsRef<str>, arity: usize) -> Self {
        Self::with_kind(TypeIdentity::new(name), TypeKind::Parameterized { arity })
    }

    /// Describe a type with an explicit identity and kind
    pub fn with_kind(identity: TypeIdentity, kind: TypeKind) -> Self {
        Self {
            identity,
            kind,
            contracts: Vec::new(),
        }
    }

    /// Declare an implemented contract
    pub fn implementing(mut self, contract: ContractKey) -> Self {
        self.add_contract(contract);
        self
    }

    /// Declare an implemented contract in place, ignoring duplicates
    pub fn add_contract(&mut self, contract: ContractKey) {
        if !self.contracts.contains(&contract) {
            self.contracts.push(contract);
        }
    }

    /// Union the contracts declared on another description of the same type
    ///
    /// Keys compare by identity only, so separately built descriptions of
    /// one type may carry different contract lists.
    pub fn merge_contracts(&mut self, other: &TypeInfo) {
        for contract in &other.contracts {
            self.add_contract(contract.clone());
        }
    }

    /// Wrap into a shared handle
    pub fn into_ref(self) -> TypeRef {
        Arc::new(self)
    }

    /// The type identity
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// The type kind
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Whether the type is fully concrete
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Concrete
    }

    /// Implemented contracts in declaration order
    pub fn contracts(&self) -> &[ContractKey] {
        &self.contracts
    }

    /// Whether any closure of `base` is implemented by this type
    pub fn implements(&self, base: &TypeIdentity) -> bool {
        self.contracts.iter().any(|c| c.base() == base)
    }

    /// Whether exactly `contract` is implemented by this type
    pub fn implements_key(&self, contract: &ContractKey) -> bool {
        self.contracts.contains(contract)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.identity.fmt(f)
    }
}

/// Render an argument tuple as `A, B`
pub fn format_arguments(arguments: &[TypeRef]) -> String {
    arguments
        .iter()
        .map(|a| a.identity().name())
        .collect::<Vec<_>>()
        .join(", ")
}
