//! Decoration Use Case
//!
//! Rewrites existing bindings so a decorator wraps whatever the binding
//! produced before. Works for fixed contracts and, through closing, for
//! every registered closure of a parameterized contract.
//!
//! ## Guarantees
//!
//! - Lifetime and provider kind of a decorated binding never change; only
//!   its provider identity and constructor do
//! - Only bindings present at call time are decorated
//! - Repeated calls compose in call order: decorating with D1 then D2
//!   resolves to `D2(D1(original))`
//! - Every rewrite is planned before the registry is touched, so a failing
//!   call leaves the registry unchanged

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cqx_domain::error::{Error, Result};
use cqx_domain::ports::{BindingRegistry, Resolver};
use cqx_domain::value_objects::{
    Binding, Constructor, ContractKey, ContractShape, Instance, ProviderIdentity, TypeIdentity,
    TypeInfo, TypeRef,
};
use tracing::{debug, info};

use crate::domain_services::{CapabilityMatcher, CapabilityTag, Instantiator};

/// Wraps a previously produced instance
pub type DecorateFn = Arc<dyn Fn(Instance, &dyn Resolver) -> Result<Instance> + Send + Sync>;

/// Wraps a previously produced instance, given the closed decorator key
pub type GenericDecorateFn =
    Arc<dyn Fn(&ContractKey, Instance, &dyn Resolver) -> Result<Instance> + Send + Sync>;

/// Decorator for a fixed contract
#[derive(Clone)]
pub struct Decorator {
    identity: TypeIdentity,
    wrap: DecorateFn,
}

impl Decorator {
    /// Create a decorator from a type-erased wrapping closure
    pub fn new<F>(name: impl AsRef<str>, wrap: F) -> Self
    where
        F: Fn(Instance, &dyn Resolver) -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            identity: TypeIdentity::new(name),
            wrap: Arc::new(wrap),
        }
    }

    /// Create a decorator over `Arc<T>` instances
    ///
    /// Construction fails with `TypeMismatch` when the wrapped instance is
    /// not an `Arc<T>`.
    pub fn typed<T, F>(name: impl AsRef<str>, wrap: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>, &dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let identity = TypeIdentity::new(name);
        let decorator_name = identity.clone();
        Self {
            identity,
            wrap: Arc::new(move |inner: Instance, resolver: &dyn Resolver| {
                let inner = inner.downcast::<T>().ok_or_else(|| {
                    Error::type_mismatch(decorator_name.name(), std::any::type_name::<T>())
                })?;
                wrap(inner, resolver).map(Instance::new)
            }),
        }
    }

    /// The decorator's identity
    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Apply the decorator to an instance
    pub fn apply(&self, inner: Instance, resolver: &dyn Resolver) -> Result<Instance> {
        (self.wrap)(inner, resolver)
    }

    fn wrap_binding(&self, binding: &Binding) -> Binding {
        let prior = Arc::clone(binding.constructor());
        let wrap = Arc::clone(&self.wrap);
        let constructor: Constructor = Arc::new(move |resolver: &dyn Resolver| {
            let inner = prior(resolver)?;
            wrap(inner, resolver)
        });
        let provider = ProviderIdentity::new(format!("{}({})", self.identity, binding.provider()));
        binding.with_provider(provider, constructor)
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Decorator defined over type parameters, e.g. `ValidationDecorator<C>`
///
/// One wrapping closure serves every tuple; it receives the closed
/// decorator key so it can dispatch on the type arguments.
#[derive(Clone)]
pub struct GenericDecorator {
    shape: ContractShape,
    wrap: GenericDecorateFn,
}

impl GenericDecorator {
    /// Create a parameterized decorator
    pub fn new<F>(shape: ContractShape, wrap: F) -> Self
    where
        F: Fn(&ContractKey, Instance, &dyn Resolver) -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            shape,
            wrap: Arc::new(wrap),
        }
    }

    /// The decorator's shape
    pub fn shape(&self) -> &ContractShape {
        &self.shape
    }

    /// Fixed decorator for an already closed decorator key
    pub fn close(&self, closed: ContractKey) -> Decorator {
        let wrap = Arc::clone(&self.wrap);
        let identity = TypeIdentity::new(closed.to_string());
        Decorator {
            identity,
            wrap: Arc::new(move |inner: Instance, resolver: &dyn Resolver| {
                wrap(&closed, inner, resolver)
            }),
        }
    }
}

impl fmt::Debug for GenericDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericDecorator")
            .field("shape", &self.shape.to_string())
            .finish_non_exhaustive()
    }
}

/// Rewrites registry bindings to chain decorators
pub struct DecorationComposer<'r> {
    registry: &'r mut dyn BindingRegistry,
}

impl<'r> DecorationComposer<'r> {
    /// Compose against `registry`
    pub fn new(registry: &'r mut dyn BindingRegistry) -> Self {
        Self { registry }
    }

    /// Wrap every binding currently registered for `key` with `decorator`
    ///
    /// Returns the number of bindings wrapped. Fails with `MissingBinding`
    /// when nothing is registered for `key`.
    pub fn decorate_fixed(&mut self, key: &ContractKey, decorator: &Decorator) -> Result<usize> {
        let existing = self.registry.bindings_for(key);
        if existing.is_empty() {
            return Err(Error::missing_binding(key.to_string()));
        }

        let replacements: Vec<Binding> = existing
            .iter()
            .map(|binding| decorator.wrap_binding(binding))
            .collect();
        let wrapped = replacements.len();
        self.registry.replace_by_key(key, replacements)?;

        info!(
            contract = %key,
            decorator = %decorator.identity(),
            bindings = wrapped,
            "Decorated contract"
        );
        Ok(wrapped)
    }

    /// Decorate every registered closure of `shape` whose tuple carries `tag`
    ///
    /// Returns the decorated contract keys in registration order.
    ///
    /// # Errors
    ///
    /// - `InvalidCapabilityTag` when `tag` declares members
    /// - `ArityMismatch` when the decorator shape takes a different number of
    ///   parameters than `shape`; checked before the registry is inspected
    /// - `MissingBinding` when no closure of `shape` is registered
    ///
    /// Tuples that fail a parameter constraint of either shape are skipped.
    /// Capability and constraint checks see every contract declared on any
    /// registered copy of an argument type, whatever the registration order.
    pub fn decorate_parameterized(
        &mut self,
        shape: &ContractShape,
        decorator: &GenericDecorator,
        tag: &ContractShape,
    ) -> Result<Vec<ContractKey>> {
        let tag = CapabilityTag::new(tag.clone())?;
        Instantiator::ensure_same_arity(shape, decorator.shape())?;
        self.decorate_closures(shape, decorator, Some(&tag))
    }

    /// Decorate every registered closure of `shape`, without capability gating
    pub fn decorate_parameterized_all(
        &mut self,
        shape: &ContractShape,
        decorator: &GenericDecorator,
    ) -> Result<Vec<ContractKey>> {
        Instantiator::ensure_same_arity(shape, decorator.shape())?;
        self.decorate_closures(shape, decorator, None)
    }

    fn decorate_closures(
        &mut self,
        shape: &ContractShape,
        decorator: &GenericDecorator,
        tag: Option<&CapabilityTag>,
    ) -> Result<Vec<ContractKey>> {
        let registered: Vec<ContractKey> = self
            .registry
            .keys_for_base(shape.base())
            .into_iter()
            .filter(|key| shape.matches(key))
            .collect();
        if registered.is_empty() {
            return Err(Error::missing_binding(shape.to_string()));
        }

        let merged = self.merged_arguments(&registered);
        let mut plan: Vec<(ContractKey, Decorator)> = Vec::new();
        for key in &registered {
            let arguments: Vec<TypeRef> = key
                .arguments()
                .iter()
                .map(|argument| {
                    merged
                        .get(argument.identity())
                        .map_or_else(|| Arc::clone(argument), Arc::clone)
                })
                .collect();
            let arguments = arguments.as_slice();
            if let Some(tag) = tag {
                if !CapabilityMatcher::satisfies(arguments, tag) {
                    debug!(contract = %key, tag = %tag.base(), "Tuple lacks capability, skipping");
                    continue;
                }
            }

            let closed = Instantiator::close(shape, arguments).and_then(|contract| {
                Instantiator::close(decorator.shape(), arguments)
                    .map(|decorator_key| (contract, decorator_key))
            });
            match closed {
                Ok((contract, decorator_key)) => {
                    plan.push((contract, decorator.close(decorator_key)));
                }
                Err(error) if error.is_constraint_violation() => {
                    debug!(contract = %key, %error, "Constraint not met, skipping tuple");
                }
                Err(error) => return Err(error),
            }
        }

        let mut decorated = Vec::with_capacity(plan.len());
        for (contract, closed_decorator) in plan {
            self.decorate_fixed(&contract, &closed_decorator)?;
            decorated.push(contract);
        }

        info!(
            shape = %shape,
            decorator = %decorator.shape(),
            registered = registered.len(),
            decorated = decorated.len(),
            "Decorated parameterized contract"
        );
        Ok(decorated)
    }

    /// One description per argument identity, carrying the contracts of
    /// every copy found in the bindings of `keys`
    fn merged_arguments(&self, keys: &[ContractKey]) -> HashMap<TypeIdentity, TypeRef> {
        let mut merged: HashMap<TypeIdentity, TypeInfo> = HashMap::new();
        for key in keys {
            for binding in self.registry.bindings_for(key) {
                for argument in binding.key().arguments() {
                    merged
                        .entry(argument.identity().clone())
                        .and_modify(|info| info.merge_contracts(argument))
                        .or_insert_with(|| TypeInfo::clone(argument));
                }
            }
        }
        merged
            .into_iter()
            .map(|(identity, info)| (identity, info.into_ref()))
            .collect()
    }
}
