//! Composition configuration types

use serde::{Deserialize, Serialize};

/// Start-up composition settings
///
/// Optional integrations (validation, transactions, logging decorators, ...)
/// are registered as named decoration steps; listing a step here turns it
/// off without touching code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Names of decoration steps to skip
    pub disabled_decorators: Vec<String>,

    /// Construct every singleton when the provider is built
    pub eager_singletons: bool,
}

impl CompositionConfig {
    /// Whether the named decoration step should run
    pub fn is_enabled(&self, step: &str) -> bool {
        !self.disabled_decorators.iter().any(|d| d == step)
    }
}
