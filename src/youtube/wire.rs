//! Response shapes of the YouTube Data API v3 endpoints we call

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub published_at: Option<String>,
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
    pub watch_history: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItemContentDetails {
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .resource_id
            .as_ref()
            .and_then(|r| r.video_id.as_deref())
            .or(self.content_details.video_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ActivityContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityContentDetails {
    pub upload: Option<ResourceId>,
    pub like: Option<ResourceRef>,
    pub favorite: Option<ResourceRef>,
    pub playlist_item: Option<ResourceRef>,
    pub recommendation: Option<ResourceRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceRef {
    pub resource_id: ResourceId,
}

impl Activity {
    /// Video the activity refers to; activities without one (subscriptions,
    /// bulletins, ...) yield `None`
    pub fn video_id(&self) -> Option<&str> {
        let details = &self.content_details;
        details
            .upload
            .as_ref()
            .and_then(|u| u.video_id.as_deref())
            .or_else(|| {
                [
                    &details.like,
                    &details.favorite,
                    &details.playlist_item,
                    &details.recommendation,
                ]
                .into_iter()
                .flatten()
                .find_map(|r| r.resource_id.video_id.as_deref())
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: ResourceId,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: VideoContentDetails,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    /// The API encodes counters as strings
    pub view_count: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_video_id_sources() {
        let upload: Activity = serde_json::from_str(
            r#"{"snippet":{"publishedAt":"2024-01-05T10:00:00Z"},
                "contentDetails":{"upload":{"videoId":"up1"}}}"#,
        )
        .unwrap();
        assert_eq!(upload.video_id(), Some("up1"));

        let like: Activity = serde_json::from_str(
            r#"{"contentDetails":{"like":{"resourceId":{"kind":"youtube#video","videoId":"lk1"}}}}"#,
        )
        .unwrap();
        assert_eq!(like.video_id(), Some("lk1"));

        let subscription: Activity =
            serde_json::from_str(r#"{"contentDetails":{"subscription":{}}}"#).unwrap();
        assert_eq!(subscription.video_id(), None);
    }

    #[test]
    fn test_playlist_item_video_id() {
        let item: PlaylistItem = serde_json::from_str(
            r#"{"snippet":{"publishedAt":"2024-01-05T10:00:00Z","resourceId":{"videoId":"v1"}}}"#,
        )
        .unwrap();
        assert_eq!(item.video_id(), Some("v1"));

        let item: PlaylistItem =
            serde_json::from_str(r#"{"contentDetails":{"videoId":"v2"}}"#).unwrap();
        assert_eq!(item.video_id(), Some("v2"));
    }

    #[test]
    fn test_missing_items_is_empty() {
        let list: ListResponse<Video> = serde_json::from_str(r#"{"kind":"youtube#videoListResponse"}"#).unwrap();
        assert!(list.items.is_empty());
    }
}
