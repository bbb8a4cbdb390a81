//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CQX composition and resolution
///
/// Composition-time variants (`ArityMismatch` through
/// `ModuleIntrospectionFailure`) are fatal to start-up and never retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Argument count does not match the parameter count of a shape
    #[error("Arity mismatch for {identity}: expected {expected} type arguments, got {actual}")]
    ArityMismatch {
        /// The shape (or shape pair) being closed
        identity: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// A type argument violates the constraint declared on its parameter
    #[error(
        "Type argument {argument} violates constraint `{constraint}` on parameter {parameter} of {identity}"
    )]
    ArgumentConstraintViolation {
        /// The shape being closed
        identity: String,
        /// Name of the parameter position
        parameter: String,
        /// The offending argument
        argument: String,
        /// Human readable constraint
        constraint: String,
    },

    /// A capability tag declares members and is therefore not a pure marker
    #[error("Invalid capability tag {tag}: marker contracts must have no members, found {members:?}")]
    InvalidCapabilityTag {
        /// The rejected tag
        tag: String,
        /// Members declared on the tag
        members: Vec<String>,
    },

    /// Decoration targeted a contract with no existing bindings
    #[error("Missing binding: no registration exists for {key}")]
    MissingBinding {
        /// The contract that had nothing to decorate
        key: String,
    },

    /// A module could not be enumerated
    #[error("Module introspection failed for {module}: {message}")]
    ModuleIntrospectionFailure {
        /// Module name
        module: String,
        /// Description of the failure
        message: String,
    },

    /// Resolution requested a contract with no binding
    #[error("Not registered: {key}")]
    NotRegistered {
        /// The unresolved contract
        key: String,
    },

    /// A resolved instance did not hold the requested type
    #[error("Type mismatch resolving {key}: instance is not a {expected}")]
    TypeMismatch {
        /// The contract that was resolved
        key: String,
        /// The requested Rust type
        expected: String,
    },

    /// Registry bookkeeping error
    #[error("Registry error: {message}")]
    Registry {
        /// Description of the registry error
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Composition error creation methods
impl Error {
    /// Create an arity mismatch error
    pub fn arity_mismatch<S: Into<String>>(identity: S, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            identity: identity.into(),
            expected,
            actual,
        }
    }

    /// Create an argument constraint violation error
    pub fn constraint_violation(
        identity: impl Into<String>,
        parameter: impl Into<String>,
        argument: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::ArgumentConstraintViolation {
            identity: identity.into(),
            parameter: parameter.into(),
            argument: argument.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an invalid capability tag error
    pub fn invalid_capability_tag<S: Into<String>>(tag: S, members: Vec<String>) -> Self {
        Self::InvalidCapabilityTag {
            tag: tag.into(),
            members,
        }
    }

    /// Create a missing binding error
    pub fn missing_binding<S: Into<String>>(key: S) -> Self {
        Self::MissingBinding { key: key.into() }
    }

    /// Create a module introspection failure
    pub fn module_introspection<M: Into<String>, S: Into<String>>(module: M, message: S) -> Self {
        Self::ModuleIntrospectionFailure {
            module: module.into(),
            message: message.into(),
        }
    }
}

// Resolution and registry error creation methods
impl Error {
    /// Create a not registered error
    pub fn not_registered<S: Into<String>>(key: S) -> Self {
        Self::NotRegistered { key: key.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<K: Into<String>, S: Into<String>>(key: K, expected: S) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Create a registry error
    pub fn registry<S: Into<String>>(message: S) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// Whether this error is an expected per-tuple filter rather than a structural fault
    ///
    /// Scanning and parameterized decoration skip tuples that fail with a
    /// constraint violation; every other error aborts the operation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ArgumentConstraintViolation { .. })
    }
}
