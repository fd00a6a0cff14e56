//! Error types for the indicator

use oneclick_core::OneClickError;
use thiserror::Error;

/// Indicator setup errors
///
/// Failures while a session runs are not errors of the launcher; they end
/// that session as `SessionState::Failed` and are reported in its
/// `SessionReport`.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// The lamp bank is empty
    #[error("No lamps configured")]
    NoLamps,

    /// Claiming or clearing a lamp failed
    #[error("Lamp hardware error: {0}")]
    Hardware(#[from] OneClickError),
}

/// Result type for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;
