//! Error types for service resolution.

use thiserror::Error;

use crate::factories::UtilityError;

/// Service resolution errors
///
/// Every variant is a programmer or configuration error: nothing here is
/// transient, and nothing is retried. Errors surface to the original caller
/// of [`ServiceFactory::get`](crate::ServiceFactory::get) and no instance is
/// cached for a failed resolution.
///
/// # Examples
///
/// ```rust
/// use ferrous_services::DiError;
///
/// let unknown = DiError::UnknownType("app::DoesNotExist".to_string());
/// assert_eq!(unknown.to_string(), "Unknown type: app::DoesNotExist");
///
/// let cycle = DiError::Circular(vec!["A".into(), "B".into(), "A".into()]);
/// assert_eq!(cycle.to_string(), "Cyclic dependency discovered while loading A -> B -> A");
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// Requested or derived type name is not known to the registry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A required configuration parameter with no configuration available
    #[error("No configuration is available and is required by {parameter}")]
    MissingConfiguration {
        /// Name of the constructor parameter
        parameter: String,
    },

    /// No resolution rule produced a value and the parameter has no default
    #[error("Invalid service property {parameter}")]
    InvalidProperty {
        /// Name of the constructor parameter
        parameter: String,
        /// Utility factory failure that caused the rejection, if any
        #[source]
        source: Option<UtilityError>,
    },

    /// A service appears twice in the active resolution chain (includes path)
    #[error("Cyclic dependency discovered while loading {}", .0.join(" -> "))]
    Circular(Vec<String>),

    /// Utility resolution attempted with no utility factory configured
    #[error("Utility factory hasn't been initialized")]
    UninitializedUtilityFactory,

    /// Utility factory failure outside parameter resolution
    #[error(transparent)]
    Utility(#[from] UtilityError),

    /// Typed access to a value holding something else
    #[error("Type mismatch for {name}: expected {expected}")]
    TypeMismatch {
        /// Parameter or service name being accessed
        name: String,
        /// Requested Rust type
        expected: &'static str,
    },

    /// The data-access factory could not produce an instance
    #[error("Data access error for {type_name}: {message}")]
    DataAccess {
        /// Requested data-access type
        type_name: String,
        /// Factory-provided reason
        message: String,
    },

    /// A service constructor reported failure
    #[error("Failed to construct {type_name}: {message}")]
    Construction {
        /// Service being constructed
        type_name: String,
        /// Constructor-provided reason
        message: String,
    },

    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// Configuration tree could not be built
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DiError {
    /// Shorthand for a constructor failure on `type_name`.
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        DiError::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Returns the cycle path if this is a circular dependency error.
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            DiError::Circular(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type for resolution operations
pub type DiResult<T> = Result<T, DiError>;
