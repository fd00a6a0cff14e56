/// Application error types
use oneclick_core::OneClickError;
use oneclick_indicator::IndicatorError;
use oneclick_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingKey(String),

    #[error("No playback device matches \"{0}\"")]
    DeviceNotFound(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("GPIO error: {0}")]
    Hardware(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Playback source error: {0}")]
    Source(#[from] OneClickError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
