//! Raw upstream record → canonical [`WatchRecord`]

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::duration::{parse_duration, DurationError, DurationMode};
use super::models::{Provenance, RawActivityRecord, VideoDetails, WatchRecord};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("no content details for video {0}")]
    MissingDetails(String),
    #[error("video {video_id}: {source}")]
    Duration {
        video_id: String,
        #[source]
        source: DurationError,
    },
    #[error("video {video_id}: invalid timestamp '{value}'")]
    Timestamp { video_id: String, value: String },
}

/// Normalize one raw record.
///
/// Every shape needs the video's content details for its duration; a record
/// whose lookup failed (`details == None`) is rejected.
pub fn normalize(
    raw: &RawActivityRecord,
    details: Option<&VideoDetails>,
    mode: DurationMode,
) -> Result<WatchRecord, NormalizeError> {
    let video_id = raw.video_id();
    let details = details.ok_or_else(|| NormalizeError::MissingDetails(video_id.to_string()))?;

    let (watched_at, title, channel_title) = match raw {
        RawActivityRecord::Upload { .. } => (
            details.published_at.as_str(),
            details.title.clone(),
            details.channel_title.clone(),
        ),
        RawActivityRecord::HistoryItem { added_at, .. } => (
            added_at.as_str(),
            details.title.clone(),
            details.channel_title.clone(),
        ),
        RawActivityRecord::Activity {
            published_at,
            title,
            channel_title,
            ..
        } => (
            published_at.as_str(),
            prefer(&details.title, title.as_deref()),
            prefer(&details.channel_title, channel_title.as_deref()),
        ),
        RawActivityRecord::SearchResult {
            published_at,
            title,
            channel_title,
            ..
        } => (
            published_at.as_str(),
            prefer_own(title.as_deref(), &details.title),
            prefer_own(channel_title.as_deref(), &details.channel_title),
        ),
    };

    let watched_at = parse_timestamp(watched_at).ok_or_else(|| NormalizeError::Timestamp {
        video_id: video_id.to_string(),
        value: watched_at.to_string(),
    })?;

    let duration = parse_duration(&details.duration).map_err(|source| NormalizeError::Duration {
        video_id: video_id.to_string(),
        source,
    })?;

    Ok(WatchRecord {
        title,
        watched_at,
        duration_minutes: duration.minutes(mode),
        external_id: video_id.to_string(),
        channel_title,
        provenance: Provenance::Real,
        source: Some(raw.source()),
        view_count: details.view_count,
    })
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Details value unless blank, then the record's own value
fn prefer(details: &str, fallback: Option<&str>) -> String {
    if !details.trim().is_empty() {
        return details.to_string();
    }
    fallback.unwrap_or_default().to_string()
}

/// Record's own value unless missing or blank, then the details value
fn prefer_own(own: Option<&str>, details: &str) -> String {
    match own {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => details.to_string(),
    }
}
