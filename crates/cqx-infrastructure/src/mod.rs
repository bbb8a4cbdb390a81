//! # Infrastructure Layer
//!
//! Runtime pieces around the composition engine: the concrete binding
//! registry, the lifetime-aware resolver, module sources, configuration and
//! logging.
//!
//! ## Module Categories
//!
//! ### Configuration & DI
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-layered TOML and environment configuration |
//! | [`di`] | Service collection, provider, module sources, composition root |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use error_ext::ErrorContext;
