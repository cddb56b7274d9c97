//! Error types and handling for fileferry
//!
//! This module provides the structured error type shared across the fileferry
//! crates, with constructors for the common failure categories and a coarse
//! error-kind classification used for reporting.

use std::path::PathBuf;

/// Main error type for fileferry operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// A configured folder does not exist or is not a directory
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// Path that was expected to be a directory
        path: PathBuf,
    },

    /// Destination file already exists and overwriting is disabled
    #[error("Destination already exists: {path}")]
    DestinationExists {
        /// Path of the colliding destination file
        path: PathBuf,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A secret reference could not be resolved
    #[error("Secret not found: {reference}")]
    SecretNotFound {
        /// The unresolved secret reference
        reference: String,
    },

    /// Writing a log artifact failed
    #[error("Artifact write error: {message}")]
    ArtifactWrite {
        /// Error message describing the write failure
        message: String,
    },

    /// Writing to the system event log failed
    #[error("Event log error: {message}")]
    EventLog {
        /// Error message describing the event log failure
        message: String,
    },

    /// Sending a notification failed
    #[error("Notification error: {message}")]
    Notification {
        /// Error message describing the transport failure
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors, including missing folders and collisions
    Io,
    /// Configuration and secret resolution errors
    Config,
    /// Failures in a downstream sink (artifact, event log, notification)
    Sink,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::DirectoryNotFound { .. } | Self::DestinationExists { .. } => {
                ErrorKind::Io
            }
            Self::Config { .. } | Self::SecretNotFound { .. } => ErrorKind::Config,
            Self::ArtifactWrite { .. } | Self::EventLog { .. } | Self::Notification { .. } => {
                ErrorKind::Sink
            }
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Check whether this error comes from a reporting sink rather than task work
    pub fn is_sink_error(&self) -> bool {
        self.kind() == ErrorKind::Sink
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new artifact write error
    pub fn artifact_write<S: Into<String>>(message: S) -> Self {
        Self::ArtifactWrite {
            message: message.into(),
        }
    }

    /// Create a new event log error
    pub fn event_log<S: Into<String>>(message: S) -> Self {
        Self::EventLog {
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
