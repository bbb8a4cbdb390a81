//! Binding Value Objects
//!
//! The (contract, provider, lifetime) triples held by a binding registry,
//! and the type-erased instances their constructors produce.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use super::contract::ContractKey;
use super::identity::TypeIdentity;
use crate::error::Result;
use crate::ports::Resolver;

/// How long a resolved instance lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// A new instance per resolution
    Transient,
    /// One instance per resolution scope
    Scoped,
    /// One instance per provider
    Singleton,
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => f.write_str("transient"),
            Self::Scoped => f.write_str("scoped"),
            Self::Singleton => f.write_str("singleton"),
        }
    }
}

/// What kind of provider backs a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// A concrete implementation type
    ConcreteType,
    /// A construction closure
    Factory,
    /// A pre-built instance
    Instance,
}

/// Name of whatever produces a binding's instances
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderIdentity(Arc<str>);

impl ProviderIdentity {
    /// Create a provider identity from a name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The provider's name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&TypeIdentity> for ProviderIdentity {
    fn from(identity: &TypeIdentity) -> Self {
        Self::new(identity.name())
    }
}

impl From<&ContractKey> for ProviderIdentity {
    fn from(key: &ContractKey) -> Self {
        Self::new(key.to_string())
    }
}

impl From<&str> for ProviderIdentity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderIdentity({})", self.0)
    }
}

impl Serialize for ProviderIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Type-erased resolved instance
///
/// Holds an `Arc<T>` for any `T: ?Sized`, typically a trait object such as
/// `Arc<dyn Greeter>`. Clones share the same allocation.
///
/// ```rust
/// use std::sync::Arc;
/// use cqx_domain::value_objects::Instance;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct English;
/// impl Greeter for English { fn greet(&self) -> String { "hello".into() } }
///
/// let instance = Instance::new::<dyn Greeter>(Arc::new(English));
/// let greeter = instance.downcast::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Erase an `Arc<T>`
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Recover the `Arc<T>` this instance was created from
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Name of the erased type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Construction closure producing an instance, given a resolver for dependencies
pub type Constructor = Arc<dyn Fn(&dyn Resolver) -> Result<Instance> + Send + Sync>;

/// Value Object: Binding
///
/// One registration of a provider against a contract. A registry may hold
/// several bindings for the same key.
#[derive(Clone)]
pub struct Binding {
    key: ContractKey,
    kind: ProviderKind,
    lifetime: Lifetime,
    provider: ProviderIdentity,
    constructor: Constructor,
}

impl Binding {
    /// Create a binding from its parts
    pub fn new(
        key: ContractKey,
        kind: ProviderKind,
        lifetime: Lifetime,
        provider: ProviderIdentity,
        constructor: Constructor,
    ) -> Self {
        Self {
            key,
            kind,
            lifetime,
            provider,
            constructor,
        }
    }

    /// Bind a concrete implementation type's constructor
    pub fn concrete(
        key: ContractKey,
        lifetime: Lifetime,
        implementation: &TypeIdentity,
        constructor: Constructor,
    ) -> Self {
        Self::new(
            key,
            ProviderKind::ConcreteType,
            lifetime,
            implementation.into(),
            constructor,
        )
    }

    /// Bind a factory closure
    pub fn factory<F>(key: ContractKey, lifetime: Lifetime, name: &str, factory: F) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<Instance> + Send + Sync + 'static,
    {
        Self::new(
            key,
            ProviderKind::Factory,
            lifetime,
            ProviderIdentity::new(name),
            Arc::new(factory),
        )
    }

    /// Bind a pre-built instance; instance bindings are always singletons
    pub fn instance(key: ContractKey, instance: Instance) -> Self {
        let provider = ProviderIdentity::new(instance.type_name());
        Self::new(
            key,
            ProviderKind::Instance,
            Lifetime::Singleton,
            provider,
            Arc::new(move |_: &dyn Resolver| Ok(instance.clone())),
        )
    }

    /// Same key, kind and lifetime with a different provider
    pub fn with_provider(&self, provider: ProviderIdentity, constructor: Constructor) -> Self {
        Self {
            key: self.key.clone(),
            kind: self.kind,
            lifetime: self.lifetime,
            provider,
            constructor,
        }
    }

    /// Run the constructor
    pub fn construct(&self, resolver: &dyn Resolver) -> Result<Instance> {
        (self.constructor)(resolver)
    }

    /// The bound contract
    pub fn key(&self) -> &ContractKey {
        &self.key
    }

    /// The provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The instance lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// The provider identity
    pub fn provider(&self) -> &ProviderIdentity {
        &self.provider
    }

    /// The construction closure
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    /// Serializable description of this binding
    pub fn describe(&self) -> BindingSnapshot {
        BindingSnapshot {
            key: self.key.clone(),
            kind: self.kind,
            lifetime: self.lifetime,
            provider: self.provider.clone(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key.to_string())
            .field("kind", &self.kind)
            .field("lifetime", &self.lifetime)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a binding, used for registry snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSnapshot {
    /// The bound contract
    pub key: ContractKey,
    /// The provider kind
    pub kind: ProviderKind,
    /// The instance lifetime
    pub lifetime: Lifetime,
    /// The provider identity
    pub provider: ProviderIdentity,
}
