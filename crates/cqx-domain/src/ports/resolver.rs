//! Resolver Port
//!
//! Resolution of contract keys into instances. Construction closures
//! receive a resolver so they can pull their own dependencies.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value_objects::{ContractKey, Instance};

/// Resolves contract keys into instances, honoring binding lifetimes
pub trait Resolver: Send + Sync {
    /// Resolve the most recently registered binding for `key`
    fn resolve(&self, key: &ContractKey) -> Result<Instance>;

    /// Resolve every binding for `key`, in registration order
    fn resolve_all(&self, key: &ContractKey) -> Result<Vec<Instance>>;
}

/// Typed resolution helpers available on every [`Resolver`]
pub trait ResolverExt: Resolver {
    /// Resolve `key` and downcast to `Arc<T>`
    fn resolve_as<T: ?Sized + Send + Sync + 'static>(&self, key: &ContractKey) -> Result<Arc<T>> {
        let instance = self.resolve(key)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| Error::type_mismatch(key.to_string(), std::any::type_name::<T>()))
    }

    /// Resolve every binding for `key` and downcast each to `Arc<T>`
    fn resolve_all_as<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: &ContractKey,
    ) -> Result<Vec<Arc<T>>> {
        self.resolve_all(key)?
            .into_iter()
            .map(|instance| {
                instance.downcast::<T>().ok_or_else(|| {
                    Error::type_mismatch(key.to_string(), std::any::type_name::<T>())
                })
            })
            .collect()
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}
