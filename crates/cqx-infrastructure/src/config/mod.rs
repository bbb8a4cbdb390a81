//! Configuration management
//!
//! Layered configuration (defaults → TOML file → environment) loaded with
//! Figment. The resulting [`AppConfig`] is threaded explicitly through
//! composition; nothing reads ambient global state.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, CompositionConfig, LoggingConfig};
