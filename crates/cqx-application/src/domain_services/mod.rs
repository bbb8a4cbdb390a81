//! Domain Services
//!
//! Pure, registry-independent building blocks of the composition engine.

pub mod capability;
pub mod instantiator;
pub mod introspector;

pub use capability::{CapabilityMatcher, CapabilityTag};
pub use instantiator::Instantiator;
pub use introspector::{ContractIntrospector, Discovery};
