//! Service Provider
//!
//! Frozen resolver built from a [`ServiceCollection`](super::ServiceCollection).
//!
//! ## Lifetimes
//!
//! | Lifetime | Cached in | Constructed against |
//! |----------|-----------|---------------------|
//! | Transient | nothing | the resolving scope |
//! | Scoped | the resolving scope | the resolving scope |
//! | Singleton | the root provider | the root provider |
//!
//! Caches are per binding slot, so two bindings of the same contract never
//! share an instance. The root provider is its own scope.
//!
//! Each top-level resolution tracks the slots it is constructing. A binding
//! that depends on itself, directly or through others, fails with a
//! `Registry` error instead of re-entering its own cache.

use std::sync::{Arc, Mutex, PoisonError};

use cqx_domain::error::{Error, Result};
use cqx_domain::ports::Resolver;
use cqx_domain::value_objects::{Binding, BindingSnapshot, ContractKey, Instance, Lifetime};
use once_cell::sync::OnceCell;
use tracing::{debug, trace, warn};

type SlotCache = Vec<OnceCell<Instance>>;

/// Slots under construction within one top-level resolution, outermost first
type InFlight = Mutex<Vec<usize>>;

fn empty_cache(len: usize) -> SlotCache {
    (0..len).map(|_| OnceCell::new()).collect()
}

struct Core {
    bindings: Vec<Binding>,
    singletons: SlotCache,
    root_scoped: SlotCache,
}

impl Core {
    fn slots_for<'a>(&'a self, key: &'a ContractKey) -> impl Iterator<Item = usize> + 'a {
        self.bindings
            .iter()
            .enumerate()
            .filter_map(move |(slot, binding)| (binding.key() == key).then_some(slot))
    }

    fn root_view<'a>(&'a self, in_flight: &'a InFlight) -> ScopeView<'a> {
        ScopeView {
            core: self,
            scoped: &self.root_scoped,
            in_flight,
        }
    }
}

/// Resolution through one scope's cache
struct ScopeView<'a> {
    core: &'a Core,
    scoped: &'a SlotCache,
    in_flight: &'a InFlight,
}

impl ScopeView<'_> {
    fn resolve_slot(&self, slot: usize) -> Result<Instance> {
        let binding = &self.core.bindings[slot];
        trace!(
            contract = %binding.key(),
            provider = %binding.provider(),
            lifetime = %binding.lifetime(),
            "Resolving binding"
        );
        match binding.lifetime() {
            Lifetime::Transient => self.guarded(slot, || binding.construct(self)),
            Lifetime::Scoped => {
                if let Some(instance) = self.scoped[slot].get() {
                    return Ok(instance.clone());
                }
                self.guarded(slot, || {
                    self.scoped[slot]
                        .get_or_try_init(|| binding.construct(self))
                        .cloned()
                })
            }
            Lifetime::Singleton => {
                if let Some(instance) = self.core.singletons[slot].get() {
                    return Ok(instance.clone());
                }
                let root = self.core.root_view(self.in_flight);
                self.guarded(slot, || {
                    self.core.singletons[slot]
                        .get_or_try_init(|| binding.construct(&root))
                        .cloned()
                })
            }
        }
    }

    /// Run `build` with `slot` marked in flight, failing if it already is
    fn guarded(&self, slot: usize, build: impl FnOnce() -> Result<Instance>) -> Result<Instance> {
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(start) = in_flight.iter().position(|&s| s == slot) {
                let path: Vec<String> = in_flight[start..]
                    .iter()
                    .chain(std::iter::once(&slot))
                    .map(|&s| self.core.bindings[s].key().to_string())
                    .collect();
                warn!(cycle = %path.join(" -> "), "Circular dependency detected");
                return Err(Error::registry(format!(
                    "Circular dependency: {}",
                    path.join(" -> ")
                )));
            }
            in_flight.push(slot);
        }

        let result = build();

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = in_flight.iter().rposition(|&s| s == slot) {
            in_flight.remove(position);
        }
        result
    }
}

impl Resolver for ScopeView<'_> {
    fn resolve(&self, key: &ContractKey) -> Result<Instance> {
        let slot = self
            .core
            .slots_for(key)
            .last()
            .ok_or_else(|| Error::not_registered(key.to_string()))?;
        self.resolve_slot(slot)
    }

    fn resolve_all(&self, key: &ContractKey) -> Result<Vec<Instance>> {
        self.core
            .slots_for(key)
            .map(|slot| self.resolve_slot(slot))
            .collect()
    }
}

/// Root resolver
///
/// Owns the singleton cache and acts as the root scope. Cheap to clone;
/// clones share every cache.
#[derive(Clone)]
pub struct ServiceProvider {
    core: Arc<Core>,
}

impl ServiceProvider {
    pub(crate) fn new(bindings: Vec<Binding>) -> Self {
        let len = bindings.len();
        debug!(bindings = len, "Building service provider");
        Self {
            core: Arc::new(Core {
                bindings,
                singletons: empty_cache(len),
                root_scoped: empty_cache(len),
            }),
        }
    }

    /// Open a new resolution scope
    pub fn create_scope(&self) -> ServiceScope {
        ServiceScope {
            core: Arc::clone(&self.core),
            scoped: empty_cache(self.core.bindings.len()),
        }
    }

    /// Construct every singleton now, surfacing constructor faults at start-up
    pub fn validate_singletons(&self) -> Result<usize> {
        let in_flight = InFlight::default();
        let root = self.core.root_view(&in_flight);
        let mut built = 0;
        for (slot, binding) in self.core.bindings.iter().enumerate() {
            if binding.lifetime() == Lifetime::Singleton {
                root.resolve_slot(slot)?;
                built += 1;
            }
        }
        debug!(singletons = built, "Eager singletons constructed");
        Ok(built)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.core.bindings.len()
    }

    /// Whether the provider holds no bindings
    pub fn is_empty(&self) -> bool {
        self.core.bindings.is_empty()
    }

    /// Whether at least one binding exists for `key`
    pub fn contains(&self, key: &ContractKey) -> bool {
        self.core.slots_for(key).next().is_some()
    }

    /// Serializable description of every binding
    pub fn snapshot(&self) -> Vec<BindingSnapshot> {
        self.core.bindings.iter().map(Binding::describe).collect()
    }
}

impl Resolver for ServiceProvider {
    fn resolve(&self, key: &ContractKey) -> Result<Instance> {
        self.core.root_view(&InFlight::default()).resolve(key)
    }

    fn resolve_all(&self, key: &ContractKey) -> Result<Vec<Instance>> {
        self.core.root_view(&InFlight::default()).resolve_all(key)
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("bindings", &self.core.bindings.len())
            .finish()
    }
}

/// Resolution scope
///
/// Scoped bindings resolve to one instance per scope; singletons are shared
/// with the root provider.
pub struct ServiceScope {
    core: Arc<Core>,
    scoped: SlotCache,
}

impl ServiceScope {
    fn view<'a>(&'a self, in_flight: &'a InFlight) -> ScopeView<'a> {
        ScopeView {
            core: &self.core,
            scoped: &self.scoped,
            in_flight,
        }
    }
}

impl Resolver for ServiceScope {
    fn resolve(&self, key: &ContractKey) -> Result<Instance> {
        self.view(&InFlight::default()).resolve(key)
    }

    fn resolve_all(&self, key: &ContractKey) -> Result<Vec<Instance>> {
        self.view(&InFlight::default()).resolve_all(key)
    }
}

impl std::fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceScope").finish_non_exhaustive()
    }
}
