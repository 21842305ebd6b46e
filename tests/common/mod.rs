//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

use watchtime::activity::{EngineSettings, RawActivityRecord, VideoDetails, WatchReportEngine};
use watchtime::youtube::{
    ChannelPlaylists, Credential, PlatformError, PlatformResult, PlaylistKind, VideoPlatform,
};

pub const UPLOADS_PLAYLIST: &str = "UU_uploads";
pub const HISTORY_PLAYLIST: &str = "HL_history";

/// In-memory stand-in for the YouTube API
#[derive(Default)]
pub struct MockPlatform {
    pub channel: Option<ChannelPlaylists>,
    pub uploads: Vec<RawActivityRecord>,
    pub history: Vec<RawActivityRecord>,
    pub activities: Vec<RawActivityRecord>,
    pub search: Vec<RawActivityRecord>,
    pub details: HashMap<String, VideoDetails>,
    /// Calls named here fail: "channel", "uploads", "history", "activities",
    /// "search", or a video id
    pub failing: HashSet<String>,
    /// Per-video artificial latency in milliseconds
    pub latency_ms: HashMap<String, u64>,
    pub detail_calls: AtomicUsize,
}

impl MockPlatform {
    pub fn with_channel() -> Self {
        Self {
            channel: Some(ChannelPlaylists {
                channel_title: "My Channel".to_string(),
                uploads: Some(UPLOADS_PLAYLIST.to_string()),
                watch_history: Some(HISTORY_PLAYLIST.to_string()),
            }),
            ..Default::default()
        }
    }

    pub fn fail(mut self, call: &str) -> Self {
        self.failing.insert(call.to_string());
        self
    }

    pub fn with_video(mut self, details: VideoDetails) -> Self {
        self.details.insert(details.video_id.clone(), details);
        self
    }

    fn check(&self, call: &str) -> PlatformResult<()> {
        if self.failing.contains(call) {
            Err(PlatformError::Status {
                status: 403,
                body: format!("{call} forbidden"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn own_channel(&self, _credential: &Credential) -> PlatformResult<Option<ChannelPlaylists>> {
        self.check("channel")?;
        Ok(self.channel.clone())
    }

    async fn playlist_items(
        &self,
        _credential: &Credential,
        playlist_id: &str,
        kind: PlaylistKind,
    ) -> PlatformResult<Vec<RawActivityRecord>> {
        match kind {
            PlaylistKind::Uploads => {
                self.check("uploads")?;
                assert_eq!(playlist_id, UPLOADS_PLAYLIST);
                Ok(self.uploads.clone())
            }
            PlaylistKind::WatchHistory => {
                self.check("history")?;
                assert_eq!(playlist_id, HISTORY_PLAYLIST);
                Ok(self.history.clone())
            }
        }
    }

    async fn activities(&self, _credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>> {
        self.check("activities")?;
        Ok(self.activities.clone())
    }

    async fn search_own_videos(&self, _credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>> {
        self.check("search")?;
        Ok(self.search.clone())
    }

    async fn video_details(
        &self,
        _credential: &Credential,
        video_id: &str,
    ) -> PlatformResult<Option<VideoDetails>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ms) = self.latency_ms.get(video_id) {
            sleep(Duration::from_millis(*ms)).await;
        }
        self.check(video_id)?;
        Ok(self.details.get(video_id).cloned())
    }
}

pub fn video(id: &str, published_at: &str, duration: &str) -> VideoDetails {
    VideoDetails {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        channel_title: "Channel".to_string(),
        published_at: published_at.to_string(),
        duration: duration.to_string(),
        view_count: Some(100),
    }
}

pub fn upload(id: &str) -> RawActivityRecord {
    RawActivityRecord::Upload {
        video_id: id.to_string(),
    }
}

pub fn history(id: &str, watched_at: &str) -> RawActivityRecord {
    RawActivityRecord::HistoryItem {
        video_id: id.to_string(),
        added_at: watched_at.to_string(),
    }
}

pub fn seeded_settings(seed: u64) -> EngineSettings {
    EngineSettings {
        synthetic_seed: Some(seed),
        ..EngineSettings::default()
    }
}

pub fn engine(platform: MockPlatform, settings: EngineSettings) -> (WatchReportEngine, Arc<MockPlatform>) {
    let platform = Arc::new(platform);
    let engine = WatchReportEngine::new(platform.clone(), settings);
    (engine, platform)
}
