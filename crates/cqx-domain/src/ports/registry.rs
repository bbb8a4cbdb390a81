//! Binding Registry Port
//!
//! Defines the ordered store of bindings that composition reads and
//! rewrites. The registry is populated during start-up and then frozen and
//! handed to a resolver.

use crate::error::Result;
use crate::value_objects::{Binding, BindingSnapshot, ContractKey, TypeIdentity};

/// Ordered binding store
///
/// Several bindings may share a contract key. Replacement is keyed by
/// contract, never by position, and keeps the relative order of the
/// replaced bindings.
pub trait BindingRegistry {
    /// Append a binding
    fn add(&mut self, binding: Binding);

    /// Replace every binding currently registered for `key`
    ///
    /// `replacements` must hold exactly one binding per existing binding of
    /// `key`, in the same order; otherwise the registry is left untouched
    /// and an error is returned.
    fn replace_by_key(&mut self, key: &ContractKey, replacements: Vec<Binding>) -> Result<()>;

    /// Distinct contract keys with the given base identity, in first-registration order
    fn keys_for_base(&self, base: &TypeIdentity) -> Vec<ContractKey>;

    /// Bindings currently registered for `key`, in registration order
    fn bindings_for(&self, key: &ContractKey) -> Vec<Binding>;

    /// Whether at least one binding exists for `key`
    fn contains(&self, key: &ContractKey) -> bool {
        !self.bindings_for(key).is_empty()
    }

    /// Total number of bindings
    fn len(&self) -> usize;

    /// Whether the registry holds no bindings
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializable description of every binding, in registration order
    fn snapshot(&self) -> Vec<BindingSnapshot>;
}
