use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::wire::{Activity, Channel, ListResponse, PlaylistItem, SearchResult, Video};
use super::{
    ChannelPlaylists, Credential, PlatformError, PlatformResult, PlaylistKind, VideoPlatform,
};
use crate::activity::models::{RawActivityRecord, VideoDetails};
use crate::config::YouTubeConfig;

/// YouTube Data API v3 client.
///
/// Video details are public, so they are cached across callers keyed by id.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    max_results: u32,
    details_cache: Cache<String, Option<VideoDetails>>,
}

impl YouTubeClient {
    pub fn from_config(config: &YouTubeConfig) -> PlatformResult<Self> {
        let client = Client::builder()
            .user_agent("watchtime/0.1.0")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let details_cache = Cache::builder()
            .max_capacity(config.details_cache_max_entries)
            .time_to_live(Duration::from_secs(config.details_cache_ttl_secs.max(1)))
            .build();

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results.clamp(1, 50),
            details_cache,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> PlatformResult<T> {
        let url = Url::parse_with_params(&format!("{}/{endpoint}", self.base_url), params)
            .map_err(|e| PlatformError::Url(e.to_string()))?;

        debug!(endpoint, "YouTube API request");

        let response = self
            .client
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch_details(
        &self,
        credential: &Credential,
        video_id: &str,
    ) -> PlatformResult<Option<VideoDetails>> {
        let response: ListResponse<Video> = self
            .get(
                credential,
                "videos",
                &[("part", "contentDetails,snippet,statistics"), ("id", video_id)],
            )
            .await?;

        Ok(response.items.into_iter().next().map(|video| VideoDetails {
            video_id: video.id,
            title: video.snippet.title.unwrap_or_default(),
            channel_title: video.snippet.channel_title.unwrap_or_default(),
            published_at: video.snippet.published_at.unwrap_or_default(),
            duration: video.content_details.duration.unwrap_or_default(),
            view_count: video
                .statistics
                .view_count
                .and_then(|v| v.parse::<u64>().ok()),
        }))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn own_channel(&self, credential: &Credential) -> PlatformResult<Option<ChannelPlaylists>> {
        let response: ListResponse<Channel> = self
            .get(
                credential,
                "channels",
                &[("part", "contentDetails,snippet"), ("mine", "true")],
            )
            .await?;

        Ok(response.items.into_iter().next().map(|channel| {
            let playlists = channel.content_details.related_playlists;
            ChannelPlaylists {
                channel_title: channel.snippet.title.unwrap_or_default(),
                uploads: playlists.uploads.filter(|id| !id.is_empty()),
                watch_history: playlists.watch_history.filter(|id| !id.is_empty()),
            }
        }))
    }

    async fn playlist_items(
        &self,
        credential: &Credential,
        playlist_id: &str,
        kind: PlaylistKind,
    ) -> PlatformResult<Vec<RawActivityRecord>> {
        let max_results = self.max_results.to_string();
        let response: ListResponse<PlaylistItem> = self
            .get(
                credential,
                "playlistItems",
                &[
                    ("part", "snippet,contentDetails"),
                    ("playlistId", playlist_id),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(response
            .items
            .iter()
            .filter_map(|item| {
                let video_id = item.video_id()?.to_string();
                Some(match kind {
                    PlaylistKind::Uploads => RawActivityRecord::Upload { video_id },
                    PlaylistKind::WatchHistory => RawActivityRecord::HistoryItem {
                        video_id,
                        added_at: item.snippet.published_at.clone().unwrap_or_default(),
                    },
                })
            })
            .collect())
    }

    async fn activities(&self, credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>> {
        let max_results = self.max_results.to_string();
        let response: ListResponse<Activity> = self
            .get(
                credential,
                "activities",
                &[
                    ("part", "snippet,contentDetails"),
                    ("mine", "true"),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(response
            .items
            .iter()
            .filter_map(|activity| {
                Some(RawActivityRecord::Activity {
                    video_id: activity.video_id()?.to_string(),
                    published_at: activity.snippet.published_at.clone().unwrap_or_default(),
                    title: activity.snippet.title.clone(),
                    channel_title: activity.snippet.channel_title.clone(),
                })
            })
            .collect())
    }

    async fn search_own_videos(&self, credential: &Credential) -> PlatformResult<Vec<RawActivityRecord>> {
        let max_results = self.max_results.to_string();
        let response: ListResponse<SearchResult> = self
            .get(
                credential,
                "search",
                &[
                    ("part", "snippet"),
                    ("forMine", "true"),
                    ("type", "video"),
                    ("order", "date"),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|result| {
                Some(RawActivityRecord::SearchResult {
                    video_id: result.id.video_id?,
                    published_at: result.snippet.published_at.unwrap_or_default(),
                    title: result.snippet.title,
                    channel_title: result.snippet.channel_title,
                })
            })
            .collect())
    }

    async fn video_details(
        &self,
        credential: &Credential,
        video_id: &str,
    ) -> PlatformResult<Option<VideoDetails>> {
        if let Some(cached) = self.details_cache.get(video_id).await {
            return Ok(cached);
        }

        let details = self.fetch_details(credential, video_id).await?;
        self.details_cache
            .insert(video_id.to_string(), details.clone())
            .await;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> YouTubeConfig {
        YouTubeConfig {
            api_base_url: "https://www.googleapis.com/youtube/v3/".to_string(),
            max_results: 500,
            request_timeout_secs: 5,
            details_cache_ttl_secs: 60,
            details_cache_max_entries: 100,
        }
    }

    #[tokio::test]
    async fn test_from_config_normalizes_settings() {
        let client = YouTubeClient::from_config(&config()).unwrap();
        assert_eq!(client.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(client.max_results, 50);
    }

    #[tokio::test]
    async fn test_cached_details_skip_the_network() {
        let mut config = config();
        // Unroutable base URL: any real request would fail.
        config.api_base_url = "http://127.0.0.1:9".to_string();
        let client = YouTubeClient::from_config(&config).unwrap();

        client.details_cache.insert("known".to_string(), None).await;
        let details = client
            .video_details(&Credential::new("token"), "known")
            .await
            .unwrap();
        assert!(details.is_none());
    }
}
