//! Domain Value Objects
//!
//! Immutable descriptors the composition engine reasons about.
//!
//! | Module | Types |
//! |--------|-------|
//! | [`identity`] | `TypeIdentity`, `TypeKind`, `TypeInfo`, `ArgumentTuple` |
//! | [`contract`] | `ContractKey`, `ContractShape`, `ParameterConstraint`, `ShapeId` |
//! | [`binding`] | `Binding`, `Lifetime`, `ProviderKind`, `Instance` |
//! | [`component`] | `Component`, `ComponentBuilder` |

pub mod binding;
pub mod component;
pub mod contract;
pub mod identity;

pub use binding::{
    Binding, BindingSnapshot, Constructor, Instance, Lifetime, ProviderIdentity, ProviderKind,
};
pub use component::{Component, ComponentBuilder};
pub use contract::{ContractKey, ContractShape, ParameterConstraint, ShapeId, TypeParameter};
pub use identity::{ArgumentTuple, TypeIdentity, TypeInfo, TypeKind, TypeRef, format_arguments};
