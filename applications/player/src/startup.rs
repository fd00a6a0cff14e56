/// Startup steps shared by the run and simulate commands
use crate::config::SpeakerSettings;
use crate::error::{AppError, Result};
use oneclick_core::{DeviceId, PlaybackSource};
use tracing::info;

/// Resolve the speaker and apply its default volume
///
/// A missing device is fatal; the process has nothing to play on.
pub async fn prepare_device(source: &dyn PlaybackSource, speaker: &SpeakerSettings) -> Result<DeviceId> {
    let device = source
        .resolve_device(&speaker.name)
        .await?
        .ok_or_else(|| AppError::DeviceNotFound(speaker.name.clone()))?;

    source.set_volume(speaker.default_volume, &device).await?;
    info!(
        device = %device,
        volume = speaker.default_volume,
        "Speaker ready"
    );
    Ok(device)
}
