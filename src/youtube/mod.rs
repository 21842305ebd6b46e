//! YouTube Data API access
//!
//! The engine only talks to [`VideoPlatform`]; [`YouTubeClient`] is the
//! production implementation, tests plug in their own.

pub mod client;
mod wire;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::activity::models::{RawActivityRecord, VideoDetails};

pub use client::YouTubeClient;

/// OAuth access token for the YouTube Data API
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("access token rejected by the YouTube API")]
    Unauthorized,
    #[error("YouTube API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request to the YouTube API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid YouTube API URL: {0}")]
    Url(String),
    #[error("{0}")]
    Other(String),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Playlists related to the authenticated channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPlaylists {
    pub channel_title: String,
    pub uploads: Option<String>,
    pub watch_history: Option<String>,
}

/// Which kind of playlist is being listed; decides the raw record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Uploads,
    WatchHistory,
}

#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// The caller's own channel, `None` if the account has none
    async fn own_channel(&self, credential: &Credential) -> PlatformResult<Option<ChannelPlaylists>>;

    async fn playlist_items(
        &self,
        credential: &Credential,
        playlist_id: &str,
        kind: PlaylistKind,
    ) -> PlatformResult<Vec<RawActivityRecord>>;

    async fn activities(&self, credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>>;

    async fn search_own_videos(&self, credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>>;

    /// Content details for one video, `None` if the id is unknown
    async fn video_details(
        &self,
        credential: &Credential,
        video_id: &str,
    ) -> PlatformResult<Option<VideoDetails>>;
}
