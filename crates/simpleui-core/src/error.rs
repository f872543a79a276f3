//! Error types for SimpleUI.

use thiserror::Error;

/// Result type alias for SimpleUI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling views against a scene.
///
/// None of these are fatal. Reconciliation reports them through an error
/// reporter and carries on with the remaining items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No visual template is registered for the requested kind.
    #[error("no template registered for kind '{kind}'")]
    MissingTemplate { kind: String },

    /// The scene-graph collaborator failed an operation.
    #[error("scene operation '{operation}' failed: {message}")]
    Scene {
        operation: &'static str,
        message: String,
    },

    /// The referenced scene node does not exist.
    #[error("scene node not found")]
    NodeNotFound,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Create a missing-template error.
    pub fn missing_template(kind: impl Into<String>) -> Self {
        Self::MissingTemplate { kind: kind.into() }
    }

    /// Create a scene failure error.
    pub fn scene(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Scene {
            operation,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
