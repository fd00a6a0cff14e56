//! Fakes for the playback service and the lamp bank

use async_trait::async_trait;
use oneclick_core::{
    DeviceId, IndicatorDriver, LampId, Level, OneClickError, PlaybackSource, PlaylistId, TrackUri,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory streaming service
#[derive(Default)]
pub struct FakeSource {
    devices: Vec<(String, DeviceId)>,
    playlists: HashMap<PlaylistId, Vec<TrackUri>>,
    failing_fetches: AtomicUsize,
    pub fetches: AtomicUsize,
    pub played: Mutex<Vec<TrackUri>>,
    pub volume: Mutex<Option<(u8, DeviceId)>>,
}

impl FakeSource {
    /// Playlists `A`, `B`, `C` with two tracks each, one speaker `Kitchen Speaker`
    pub fn three_by_two() -> Self {
        let mut source = Self::default();
        for name in ["A", "B", "C"] {
            source.playlists.insert(
                playlist(name),
                (0..2).map(|i| TrackUri::new(format!("spotify:track:{name}{i}"))).collect(),
            );
        }
        source
            .devices
            .push(("Kitchen Speaker".into(), DeviceId::new("dev-kitchen")));
        source
    }

    pub fn fail_next_fetches(&self, n: usize) {
        self.failing_fetches.store(n, Ordering::SeqCst);
    }

    pub fn played(&self) -> Vec<String> {
        self.played
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.as_str().trim_start_matches("spotify:track:").to_string())
            .collect()
    }
}

pub fn playlist(name: &str) -> PlaylistId {
    PlaylistId::new(format!("spotify:playlist:{name}"))
}

#[async_trait]
impl PlaybackSource for FakeSource {
    async fn resolve_device(&self, name: &str) -> oneclick_core::Result<Option<DeviceId>> {
        Ok(self
            .devices
            .iter()
            .find(|(device, _)| device.starts_with(name))
            .map(|(_, id)| id.clone()))
    }

    async fn set_volume(&self, percent: u8, device: &DeviceId) -> oneclick_core::Result<()> {
        *self.volume.lock().unwrap() = Some((percent, device.clone()));
        Ok(())
    }

    async fn fetch_playlist_tracks(
        &self,
        playlist: &PlaylistId,
    ) -> oneclick_core::Result<Vec<TrackUri>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_fetches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(OneClickError::transport("connection reset"));
        }
        self.playlists
            .get(playlist)
            .cloned()
            .ok_or_else(|| OneClickError::not_found("playlist", playlist.as_str()))
    }

    async fn start_playback(&self, _device: &DeviceId, track: &TrackUri) -> oneclick_core::Result<()> {
        self.played.lock().unwrap().push(track.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LampWrite {
    pub at: tokio::time::Instant,
    pub lamp: LampId,
    pub level: Level,
}

/// Lamp bank that records every write; clones share the log
#[derive(Clone, Default)]
pub struct RecordingLamps {
    writes: Arc<Mutex<Vec<LampWrite>>>,
}

impl RecordingLamps {
    pub fn writes(&self) -> Vec<LampWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn all_dark(&self) -> bool {
        let mut levels = HashMap::new();
        for write in self.writes() {
            levels.insert(write.lamp, write.level);
        }
        levels.values().all(|level| *level == Level::Inactive)
    }
}

impl IndicatorDriver for RecordingLamps {
    fn configure_output(&self, _lamp: LampId) -> oneclick_core::Result<()> {
        Ok(())
    }

    fn set_lamp(&self, lamp: LampId, level: Level) -> oneclick_core::Result<()> {
        self.writes.lock().unwrap().push(LampWrite {
            at: tokio::time::Instant::now(),
            lamp,
            level,
        });
        Ok(())
    }
}
