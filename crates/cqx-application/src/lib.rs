//! Application Layer - CQX
//!
//! The composition engine. Everything here runs once, synchronously,
//! during start-up, against a registry snapshot visible at call time.
//!
//! ## Architecture
//!
//! ```text
//! RegistrationDispatcher ──▶ ContractIntrospector ──▶ BindingRegistry (add)
//!
//! DecorationComposer ──▶ CapabilityMatcher
//!                    ──▶ Instantiator
//!                    ──▶ BindingRegistry (replace_by_key)
//! ```
//!
//! ## Modules
//!
//! - `domain_services::*`: pure building blocks (closing shapes, capability
//!   gating, component discovery)
//! - `use_cases::*`: the composition operations (`decorate_fixed`,
//!   `decorate_parameterized`, `scan_and_register`)
//! - `ports::registry`: compile-time component registration via `linkme`
//!
//! ## Dependencies
//!
//! This crate depends only on `cqx-domain` and pure libraries.

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::*;
pub use ports::*;
pub use use_cases::*;
