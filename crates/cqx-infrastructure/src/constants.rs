//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cqx.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "cqx";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CQX";

/// Separator for nested keys in environment variables (`CQX_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "CQX_LOG";

/// File name prefix for rolling log files
pub const LOG_FILE_PREFIX: &str = "cqx";
