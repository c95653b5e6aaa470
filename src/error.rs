//! Error types for the publisher
//!
//! Provides structured error handling with context and proper error chains.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the publisher
#[derive(Error, Debug)]
pub enum PublisherError {
    /// Errors constructing the ephemeral build environment
    #[error("Environment construction error: {message}")]
    EnvironmentConstruction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors producing the source distribution artifact
    #[error("Packaging error: {message}")]
    Packaging {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors uploading artifacts to the package registry
    #[error("Publish error: {message}")]
    Publish {
        message: String,
        artifacts: Vec<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors reading or validating source metadata
    #[error("Metadata error: {message}")]
    Metadata {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Process execution errors
    #[error("Process error: {command} failed")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl PublisherError {
    /// Create a new environment construction error
    pub fn environment(message: impl Into<String>) -> Self {
        Self::EnvironmentConstruction {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new packaging error
    pub fn packaging(message: impl Into<String>) -> Self {
        Self::Packaging {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new publish error
    pub fn publish(message: impl Into<String>, artifacts: Vec<PathBuf>) -> Self {
        Self::Publish {
            message: message.into(),
            artifacts,
            source: None,
        }
    }

    /// Create a new metadata error
    pub fn metadata<P: Into<PathBuf>>(message: impl Into<String>, path: P) -> Self {
        Self::Metadata {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            source: None,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Exit code reported by a failed inner process, if any
    pub fn process_exit_code(&self) -> Option<i32> {
        match self {
            Self::Process { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PublisherError>;
