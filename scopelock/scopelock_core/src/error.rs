//! Error types for the scopelock system.
//!
//! Errors are organized by the phase in which they surface. Definition-time
//! errors are raised while a resource class is being assembled, contribution
//! errors while a scope is being resolved, and coordinator errors while locks
//! are taken or released.
//!
//! The root error type, `Error`, can wrap any of the phase-specific errors,
//! allowing for uniform error handling at the top level.

use std::time::Duration;

use thiserror::Error;

/// Root error type for scopelock.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors raised while defining units and classes
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Errors raised by a unit while a scope is being resolved
    #[error("Contribution error: {0}")]
    Contribution(#[from] ContributionError),

    /// Errors reported by the lock coordinator
    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A named class or unit does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors raised while a unit or a class is being defined.
///
/// All of these are configuration mistakes. They surface when the class is
/// built, never when its scope is queried.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// A resource name is empty or carries surrounding whitespace
    #[error("Invalid resource name: {0:?}")]
    InvalidResourceName(String),

    /// A class was defined without a name
    #[error("Class name cannot be empty")]
    EmptyClassName,

    /// A unit was defined without a name
    #[error("Unit name cannot be empty")]
    EmptyUnitName,

    /// The same unit was attached to a class more than once
    #[error("Unit '{unit}' is attached to class '{class}' more than once")]
    DuplicateUnit {
        /// Class being defined
        class: String,

        /// Unit attached twice
        unit: String,
    },

    /// A class with this name is already defined
    #[error("Class '{0}' is already defined")]
    DuplicateClass(String),

    /// A class refers to a unit that was never declared
    #[error("Class '{class}' refers to unknown unit '{unit}'")]
    UnknownUnit {
        /// Class being defined
        class: String,

        /// Unit that could not be found
        unit: String,
    },

    /// A unit could not produce its contribution while the class was defined
    #[error("Unit '{unit}' rejected while defining class '{class}': {source}")]
    UnitRejected {
        /// Class being defined
        class: String,

        /// Unit whose contribution failed
        unit: String,

        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Errors raised while a class resolves its scope.
#[derive(Debug, Error)]
pub enum ContributionError {
    /// An attached unit failed to contribute
    #[error("Unit '{unit}' of class '{class}' failed to contribute: {source}")]
    Failed {
        /// Class being resolved
        class: String,

        /// Unit that failed
        unit: String,

        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A unit signalled that it cannot produce a scope
    #[error("Contribution unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a lock coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The coordinator could not acquire the requested scope
    #[error("Lock acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// The coordinator could not release a handle
    #[error("Lock release failed: {0}")]
    ReleaseFailed(String),

    /// Acquisition did not complete in time
    #[error("Lock acquisition timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors related to configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    /// The configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for scopelock operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

impl Error {
    /// Returns true if this error was raised while defining a unit or class.
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Error::Definition(_) | Error::Config(_))
    }
}
