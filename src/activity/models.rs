//! Data models for watch activity reports

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::diagnostics::Diagnostic;

/// Where a watch record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fetched from the YouTube API
    Real,
    /// Generated filler
    Synthetic,
}

/// Upstream source that produced a real record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    Upload,
    History,
    Activity,
    Search,
}

/// Raw record as returned by one of the upstream listing endpoints.
///
/// Every variant carries the external video id; the duration always comes
/// from a secondary [`VideoDetails`] lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawActivityRecord {
    /// Item of the account's uploads playlist
    Upload { video_id: String },

    /// Item of the watch-history playlist, `added_at` is when it was watched
    HistoryItem { video_id: String, added_at: String },

    /// Entry of the account's activity feed
    Activity {
        video_id: String,
        published_at: String,
        title: Option<String>,
        channel_title: Option<String>,
    },

    /// Result of a `forMine` video search
    SearchResult {
        video_id: String,
        published_at: String,
        title: Option<String>,
        channel_title: Option<String>,
    },
}

impl RawActivityRecord {
    pub fn video_id(&self) -> &str {
        match self {
            Self::Upload { video_id }
            | Self::HistoryItem { video_id, .. }
            | Self::Activity { video_id, .. }
            | Self::SearchResult { video_id, .. } => video_id,
        }
    }

    pub fn source(&self) -> RecordSource {
        match self {
            Self::Upload { .. } => RecordSource::Upload,
            Self::HistoryItem { .. } => RecordSource::History,
            Self::Activity { .. } => RecordSource::Activity,
            Self::SearchResult { .. } => RecordSource::Search,
        }
    }
}

/// Content details of a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    /// RFC 3339 publish timestamp
    pub published_at: String,
    /// ISO 8601 duration, e.g. `PT4M13S`
    pub duration: String,
    pub view_count: Option<u64>,
}

/// Canonical watch record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    pub title: String,
    pub watched_at: DateTime<Utc>,
    pub duration_minutes: f64,
    pub external_id: String,
    pub channel_title: String,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RecordSource>,
    /// Public view count when the details lookup returned statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,
}

impl WatchRecord {
    /// UTC calendar day the record falls on
    pub fn watched_on(&self) -> NaiveDate {
        self.watched_at.date_naive()
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }
}

/// Accumulated watch time for one calendar day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub total_minutes: f64,
    pub video_count: u32,
}

impl DailyStat {
    pub fn add(&mut self, other: &DailyStat) {
        self.total_minutes += other.total_minutes;
        self.video_count += other.video_count;
    }
}

/// Provenance flags of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceSummary {
    pub is_demo: bool,
    pub is_mixed: bool,
    pub real_data_count: usize,
}

/// One row of the tabular view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRow {
    /// 1-based, chronological
    pub day: u32,
    pub date: NaiveDate,
    pub minutes: i64,
}

/// Chart-ready series, parallel to the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<u32>,
    pub data: Vec<i64>,
}

/// Watch report returned by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub watch_history: Vec<WatchRecord>,
    pub daily_stats: BTreeMap<NaiveDate, DailyStat>,
    #[serde(flatten)]
    pub summary: ProvenanceSummary,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub table: Vec<DailyRow>,
    pub chart: ChartSeries,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn real_records(&self) -> impl Iterator<Item = &WatchRecord> {
        self.watch_history.iter().filter(|r| !r.is_synthetic())
    }

    pub fn synthetic_records(&self) -> impl Iterator<Item = &WatchRecord> {
        self.watch_history.iter().filter(|r| r.is_synthetic())
    }
}
