//! # CQX
//!
//! Convention-based composition for command/query style applications:
//! scan modules for handler implementations, register them against closed
//! generic contracts, and wrap them with decorators that compose in order
//! and can be gated on marker capabilities of the message type.
//!
//! ## Example
//!
//! ```ignore
//! use cqx::prelude::*;
//!
//! let handler = ContractShape::parameterized("CommandHandler", &["C"]);
//! let family = ShapeFamily::new().with(handler.clone());
//! let table = RegistrationTable::new().bind(&handler, RegistrationOp::transient());
//!
//! let mut root = init_composition(ConfigLoader::new().load()?)?
//!     .with_modules(LinkedModule::all());
//! root.scan(&family, &table)?;
//! root.decorate_generic("validation", &handler, &validation, &ContractShape::fixed("Validatable"))?;
//! let provider = root.build()?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Contract identities, bindings, errors and ports
//! - `application` - Discovery, closing, capability matching, decoration, registration
//! - `infrastructure` - Service collection and provider, module sources, config, logging

/// Domain layer - contract identities, bindings, errors and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use cqx_domain::*;
}

/// Application layer - the composition engine
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use cqx_application::*;
}

/// Infrastructure layer - DI runtime, config, and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use cqx_infrastructure::*;
}

/// Everything needed to compose an application
pub mod prelude {
    pub use cqx_application::ports::registry::{COMPONENTS, ComponentEntry};
    pub use cqx_application::use_cases::{
        DecorationComposer, Decorator, GenericDecorator, RegistrationOp, RegistrationTable,
        ScanReport, ShapeFamily,
    };
    pub use cqx_domain::{
        BindingRegistry, Component, ContractKey, ContractShape, Error, Instance, Lifetime,
        ModuleSource, ParameterConstraint, Resolver, ResolverExt, Result, TypeIdentity, TypeInfo,
    };
    pub use cqx_infrastructure::config::{AppConfig, ConfigLoader};
    pub use cqx_infrastructure::di::{
        CompositionRoot, LinkedModule, ServiceCollection, ServiceProvider, ServiceScope,
        StaticModule, init_composition,
    };
}

// Re-export commonly used domain types at the crate root
pub use domain::*;
