//! Error types for the image pipeline.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// File path errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
}

/// Failure reported by a task.
///
/// Both kinds are terminal for the event that owns the task: the worker stops
/// executing that event's remaining tasks and sends an error outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TaskError {
    /// The task was built with invalid parameters, or a required input is
    /// absent or invalid. The caller's request cannot proceed.
    #[error("Malformed task: {0}")]
    Malformed(String),

    /// A valid request could not be completed (I/O, unsupported format,
    /// missing image).
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Convenience result type for task operations.
pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    pub fn malformed<T: Into<String>>(msg: T) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::ProcessingFailed(_) => "processing_failed",
        }
    }

    /// The bare message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Malformed(msg) | Self::ProcessingFailed(msg) => msg,
        }
    }
}

/// Errors raised while loading or validating a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::Invalid(msg.into())
    }
}

// Convert std::io::Error to TaskError
impl From<io::Error> for TaskError {
    fn from(err: io::Error) -> Self {
        Self::ProcessingFailed(err.to_string())
    }
}

// Decoding/encoding failures are runtime failures of an otherwise valid request
impl From<image::ImageError> for TaskError {
    fn from(err: image::ImageError) -> Self {
        Self::ProcessingFailed(err.to_string())
    }
}

// A missing or invalid required input is a structural problem with the task
impl From<PathError> for TaskError {
    fn from(err: PathError) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_errors_become_malformed() {
        let err: TaskError = PathError::NotFound(PathBuf::from("/nope.png")).into();
        assert_eq!(err.as_label(), "malformed");
        assert_eq!(err.message(), "File not found: /nope.png");
    }

    #[test]
    fn io_errors_become_processing_failures() {
        let err: TaskError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err, TaskError::processing("denied"));
        assert_eq!(err.to_string(), "Processing failed: denied");
    }
}
