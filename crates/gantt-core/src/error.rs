//! Error types for the Gantt chart library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all chart operations.
#[derive(Error, Debug)]
pub enum GanttError {
    /// The operation would break a structural invariant (cycles, hidden
    /// parents, disabled gestures, inverted date ranges)
    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },
    /// A visible-row index outside the current bounds
    #[error("Index {index} is out of range for {len} visible rows")]
    IndexOutOfRange { index: usize, len: usize },
    /// The operation cannot honor its contract in the current configuration
    #[error("Unsupported operation: {reason}")]
    UnsupportedOperation { reason: String },
    /// Step not found for the given identifier
    #[error("Step with ID {uid} not found")]
    StepNotFound { uid: String },
    /// A step with the same identifier is already part of the chart
    #[error("Step with ID {uid} already exists")]
    DuplicateStep { uid: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// An observer or listener rejected a notification
    #[error("Callback failed: {message}")]
    Callback { message: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> GanttError {
        GanttError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> GanttError {
        GanttError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl GanttError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for [`GanttError::InvalidOperation`].
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`GanttError::StepNotFound`].
    pub fn step_not_found(uid: impl ToString) -> Self {
        Self::StepNotFound {
            uid: uid.to_string(),
        }
    }

    /// Shorthand for [`GanttError::Callback`], for use inside observers.
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| GanttError::database(message).with_source(e))
    }
}

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, GanttError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GanttError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Index 7 is out of range for 3 visible rows");

        let err = GanttError::invalid_input("background_color").with_reason("not a hex color");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'background_color': not a hex color"
        );

        let err = GanttError::step_not_found("abc");
        assert_eq!(err.to_string(), "Step with ID abc not found");
    }

    #[test]
    fn test_db_context_wraps_source() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.db_context("Failed to load steps").unwrap_err();
        assert!(matches!(err, GanttError::Database { ref message, .. } if message == "Failed to load steps"));
    }
}
