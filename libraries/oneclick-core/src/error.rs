/// Core error types for OneClick Player
use thiserror::Error;
use crate::types::LampId;

/// Result type alias using `OneClickError`
pub type Result<T> = std::result::Result<T, OneClickError>;

/// Errors raised across the collaborator boundaries.
///
/// Callers treat these as opaque failures to report; nothing in the core
/// inspects them to decide on a retry.
#[derive(Error, Debug)]
pub enum OneClickError {
    /// Network or service failure talking to the streaming service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The streaming service rejected our credentials
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Writing a lamp level failed
    #[error("Hardware write failed on lamp {lamp}: {message}")]
    HardwareWrite { lamp: LampId, message: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl OneClickError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an authorization error
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a hardware write error for `lamp`
    pub fn hardware(lamp: LampId, msg: impl Into<String>) -> Self {
        Self::HardwareWrite {
            lamp,
            message: msg.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from the lamp hardware
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::HardwareWrite { .. })
    }
}
