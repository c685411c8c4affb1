//! Unified error handling for admin.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::forms::FormError;

/// Errors surfaced by an update controller's save.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The form could not be converted back into an entity.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// The backend rejected or failed the request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Application-level error type for the admin library.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Form editing failed.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Saving an entity failed.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

impl AdminError {
    /// Whether the error came from the backend rather than local input.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Api(_) | Self::Controller(ControllerError::Api(_))
        )
    }
}
