//! Service Collection
//!
//! In-memory, ordered [`BindingRegistry`]. Populated during start-up by
//! direct registration, scanning and decoration, then frozen into a
//! [`ServiceProvider`].
//!
//! ## Usage
//!
//! ```ignore
//! let mut services = ServiceCollection::new();
//! services.add_singleton::<dyn Greeter, _>(greeter_key(), |_| Ok(Arc::new(EnglishGreeter)));
//! let provider = services.build_provider();
//! ```

use std::sync::Arc;

use cqx_domain::error::{Error, Result};
use cqx_domain::ports::{BindingRegistry, Resolver};
use cqx_domain::value_objects::{
    Binding, BindingSnapshot, Constructor, ContractKey, Instance, Lifetime, TypeIdentity,
};
use tracing::debug;

use super::provider::ServiceProvider;

/// Ordered in-memory binding store
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    bindings: Vec<Binding>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a concrete implementation type
    pub fn add_type(
        &mut self,
        key: ContractKey,
        lifetime: Lifetime,
        implementation: &TypeIdentity,
        constructor: Constructor,
    ) -> &mut Self {
        self.add(Binding::concrete(key, lifetime, implementation, constructor));
        self
    }

    /// Bind a type-erased factory closure
    pub fn add_factory<F>(
        &mut self,
        key: ContractKey,
        lifetime: Lifetime,
        name: &str,
        factory: F,
    ) -> &mut Self
    where
        F: Fn(&dyn Resolver) -> Result<Instance> + Send + Sync + 'static,
    {
        self.add(Binding::factory(key, lifetime, name, factory));
        self
    }

    /// Bind a pre-built instance as a singleton
    pub fn add_instance<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        key: ContractKey,
        value: Arc<T>,
    ) -> &mut Self {
        self.add(Binding::instance(key, Instance::new(value)));
        self
    }

    /// Bind a typed factory with the given lifetime
    pub fn add_typed<T, F>(&mut self, key: ContractKey, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let name = std::any::type_name::<T>();
        self.add_factory(key, lifetime, name, move |resolver: &dyn Resolver| {
            factory(resolver).map(Instance::new)
        })
    }

    /// Typed transient binding
    pub fn add_transient<T, F>(&mut self, key: ContractKey, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_typed(key, Lifetime::Transient, factory)
    }

    /// Typed scoped binding
    pub fn add_scoped<T, F>(&mut self, key: ContractKey, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_typed(key, Lifetime::Scoped, factory)
    }

    /// Typed singleton binding
    pub fn add_singleton<T, F>(&mut self, key: ContractKey, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add_typed(key, Lifetime::Singleton, factory)
    }

    /// Add `binding` only when its key has no binding yet
    ///
    /// Returns whether the binding was added.
    pub fn try_add(&mut self, binding: Binding) -> bool {
        if self.contains(binding.key()) {
            debug!(contract = %binding.key(), "Binding already present, skipping");
            false
        } else {
            self.add(binding);
            true
        }
    }

    /// Bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Freeze the collection into a provider
    pub fn build_provider(self) -> ServiceProvider {
        ServiceProvider::new(self.bindings)
    }
}

impl BindingRegistry for ServiceCollection {
    fn add(&mut self, binding: Binding) {
        debug!(
            contract = %binding.key(),
            provider = %binding.provider(),
            lifetime = %binding.lifetime(),
            "Adding binding"
        );
        self.bindings.push(binding);
    }

    fn replace_by_key(&mut self, key: &ContractKey, replacements: Vec<Binding>) -> Result<()> {
        let slots: Vec<usize> = self
            .bindings
            .iter()
            .enumerate()
            .filter_map(|(slot, binding)| (binding.key() == key).then_some(slot))
            .collect();

        if slots.len() != replacements.len() {
            return Err(Error::registry(format!(
                "Cannot replace {} bindings of {key} with {}",
                slots.len(),
                replacements.len()
            )));
        }
        if let Some(stray) = replacements.iter().find(|b| b.key() != key) {
            return Err(Error::registry(format!(
                "Replacement for {key} is bound to {}",
                stray.key()
            )));
        }

        for (slot, binding) in slots.into_iter().zip(replacements) {
            self.bindings[slot] = binding;
        }
        Ok(())
    }

    fn keys_for_base(&self, base: &TypeIdentity) -> Vec<ContractKey> {
        let mut keys: Vec<ContractKey> = Vec::new();
        for binding in &self.bindings {
            if binding.key().base() == base && !keys.contains(binding.key()) {
                keys.push(binding.key().clone());
            }
        }
        keys
    }

    fn bindings_for(&self, key: &ContractKey) -> Vec<Binding> {
        self.bindings
            .iter()
            .filter(|binding| binding.key() == key)
            .cloned()
            .collect()
    }

    fn contains(&self, key: &ContractKey) -> bool {
        self.bindings.iter().any(|binding| binding.key() == key)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn snapshot(&self) -> Vec<BindingSnapshot> {
        self.bindings.iter().map(Binding::describe).collect()
    }
}
