//! Application Ports
//!
//! - **registry** - compile-time component registration slice

pub mod registry;

pub use registry::{COMPONENTS, ComponentEntry, components_in, list_modules};
