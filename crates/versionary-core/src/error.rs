//! Error types for version conventions

use thiserror::Error;

/// Errors raised while declaring or resolving version conventions.
///
/// Both variants are local and synchronous; misconfiguration is meant to fail
/// fast at startup, so nothing here is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConventionError {
    /// An unset or malformed version was passed to a declaration call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resolution was requested for something that was never registered
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ConventionError {
    /// Unknown action under a controller
    pub fn unknown_action(controller: impl std::fmt::Display, action: impl std::fmt::Display) -> Self {
        Self::InvalidState(format!(
            "action '{}' is not registered on controller '{}'",
            action, controller
        ))
    }

    /// Unknown controller
    pub fn unknown_controller(controller: impl std::fmt::Display) -> Self {
        Self::InvalidState(format!("controller '{}' is not registered", controller))
    }
}

/// Result type alias for convention operations
pub type Result<T, E = ConventionError> = std::result::Result<T, E>;
