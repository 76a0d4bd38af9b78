//! Error types for the tracker library.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::models::TaskStatus;

/// Comprehensive error type for all tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A sprint generation stage failed; nothing from the run was kept
    #[error("failed to {stage}: {source}")]
    Generation {
        stage: GenerationStage,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// Plan task template not found for the given ID
    #[error("Plan task with ID {id} not found")]
    PlanTaskNotFound { id: u64 },
    /// Plan task step template not found for the given ID
    #[error("Template step with ID {id} not found")]
    TemplateStepNotFound { id: u64 },
    /// Client not found for the given ID
    #[error("Client with ID {id} not found")]
    ClientNotFound { id: u64 },
    /// No client uses the given slug
    #[error("No client found for code '{slug}'")]
    ClientSlugNotFound { slug: String },
    /// More than one client uses the given slug
    #[error("Code '{slug}' matches more than one client")]
    DuplicateClientSlug { slug: String },
    /// Client task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: u64 },
    /// Client task step not found for the given ID
    #[error("Task step with ID {id} not found")]
    TaskStepNotFound { id: u64 },
    /// The requested status change is not part of the task lifecycle
    #[error("Cannot move a task from '{from}' to '{to}'")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
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

/// The stages of sprint task generation, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    FetchTemplates,
    FetchExisting,
    FetchSteps,
    InsertTasks,
    InsertSteps,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GenerationStage::FetchTemplates => "fetch templates",
            GenerationStage::FetchExisting => "fetch existing",
            GenerationStage::FetchSteps => "fetch steps",
            GenerationStage::InsertTasks => "insert tasks",
            GenerationStage::InsertSteps => "insert steps",
        };
        f.write_str(label)
    }
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
    pub fn with_source(self, source: rusqlite::Error) -> TrackerError {
        TrackerError::Database {
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
    pub fn with_reason(self, reason: impl Into<String>) -> TrackerError {
        TrackerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TrackerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Maps a failed `spawn_blocking` join into a configuration error.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
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
        self.map_err(|e| TrackerError::database(message).with_source(e))
    }
}

/// Labels store failures with the generation stage they happened in.
pub trait GenerationResultExt<T> {
    fn at_stage(self, stage: GenerationStage) -> Result<T>;
}

impl<T> GenerationResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn at_stage(self, stage: GenerationStage) -> Result<T> {
        self.map_err(|source| TrackerError::Generation { stage, source })
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_names_the_stage() {
        let err: Result<()> = Err(rusqlite::Error::QueryReturnedNoRows)
            .at_stage(GenerationStage::InsertTasks);
        let message = err.unwrap_err().to_string();
        assert!(message.starts_with("failed to insert tasks:"));
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = TrackerError::invalid_input("title").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'title': must not be empty"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = TrackerError::InvalidTransition {
            from: TaskStatus::Rejected,
            to: TaskStatus::Queued,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move a task from 'rejected' to 'queued'"
        );
    }
}
