//! Error types for pgfluent

use crate::mapper::FieldKind;
use thiserror::Error;

/// Result type alias for pgfluent operations
pub type FluentResult<T> = Result<T, FluentError>;

/// Error types for statement building, row mapping and execution
#[derive(Debug, Error)]
pub enum FluentError {
    /// Invalid builder input (empty join/filter parts, empty payload, ...)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A mapping operation was handed an empty row mapping
    #[error("The row mapping is empty, nothing to map")]
    EmptyResult,

    /// A row value cannot be coerced to the field's declared kind
    #[error("Type mismatch on field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },

    /// A matched field has no write accessor
    #[error("Can't set the value for field: {0}")]
    NotSettable(String),

    /// A single-row fetch returned no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement preparation failed
    #[error("Prepare error: {0}")]
    Prepare(#[source] tokio_postgres::Error),

    /// Statement execution (no rows expected) failed
    #[error("Execute error: {0}")]
    Execute(#[source] tokio_postgres::Error),

    /// Query execution (rows expected) failed
    #[error("Query error: {0}")]
    Query(#[source] tokio_postgres::Error),

    /// Column decode error while reading a result row
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FluentError {
    /// Create a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Create a type mismatch error for a specific field
    pub fn mismatch(field: impl Into<String>, expected: FieldKind, found: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found,
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a type mismatch error
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Check if this is a malformed input error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }

    /// The underlying driver error, if the failure came from the database layer.
    pub fn as_db_error(&self) -> Option<&tokio_postgres::Error> {
        match self {
            Self::Prepare(e) | Self::Execute(e) | Self::Query(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for FluentError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<toml::de::Error> for FluentError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
