//! Error types for the decisionflow pipeline.
//!
//! Two error kinds exist on the stage path: [`TransportError`] for anything
//! that goes wrong talking to the generation endpoint, and [`FormatError`]
//! for generated text that cannot be turned into a schema-valid artifact.
//! Both are absorbed by the stage runner and never reach the orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The crate-level error type.
///
/// Only the configuration and bootstrap surface returns this; a pipeline run
/// itself has no fatal error path.
#[derive(Debug, Error)]
pub enum DecisionflowError {
    /// The configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The workflow request is missing fields a run requires.
    #[error("{0}")]
    InvalidRequest(#[from] RequestValidationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure talking to the generation endpoint.
///
/// `status` carries the HTTP status of a non-success response, or `0` for a
/// network-level failure where no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Transport error (status {status}): {details}")]
pub struct TransportError {
    /// HTTP status code, or 0 when no response was received.
    pub status: u16,
    /// Error payload returned by the endpoint, or the network error message.
    pub details: String,
}

impl TransportError {
    /// Creates a transport error for a non-success HTTP response.
    #[must_use]
    pub fn http(status: u16, details: impl Into<String>) -> Self {
        Self {
            status,
            details: details.into(),
        }
    }

    /// Creates a transport error for a failure with no HTTP response.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            details: message.into(),
        }
    }

    /// Returns true if no response was received at all.
    #[must_use]
    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

/// Generated text that is not valid JSON or does not match a stage's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatError {
    /// The error message.
    pub message: String,
    /// The offending field, if the failure is field-specific.
    pub field: Option<String>,
}

impl FormatError {
    /// Creates a new format error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a format error for a specific field.
    #[must_use]
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "Format error in field '{}': {}", field, self.message)
        } else {
            write!(f, "Format error: {}", self.message)
        }
    }
}

impl std::error::Error for FormatError {}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Any failure on the live path of a single stage attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// The generation call failed.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The generated text could not be parsed or validated.
    #[error("{0}")]
    Format(#[from] FormatError),
}

impl StageError {
    /// A short machine-readable label for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Format(_) => "format",
        }
    }
}

/// Error raised when a request is missing fields that a run requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Workflow request is missing required fields: {}", .missing.join(", "))]
pub struct RequestValidationError {
    /// Names of the missing fields, in request field order.
    pub missing: Vec<String>,
}

/// Result type alias for decisionflow operations.
pub type Result<T> = std::result::Result<T, DecisionflowError>;
