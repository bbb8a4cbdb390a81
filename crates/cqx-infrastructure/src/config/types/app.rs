//! Main application configuration

use serde::{Deserialize, Serialize};

use super::composition::CompositionConfig;
use super::logging::LoggingConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Composition settings
    #[serde(default)]
    pub composition: CompositionConfig,
}
