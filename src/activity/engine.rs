//! Request-scoped orchestration: fetch → normalize → blend → report

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::blending::{BlendPolicy, DemoReason};
use super::diagnostics::Diagnostics;
use super::duration::DurationMode;
use super::models::{RawActivityRecord, Report, VideoDetails, WatchRecord};
use super::normalizer::normalize;
use super::report::ReportBuilder;
use super::synthetic::{SyntheticBatch, SyntheticGenerator};
use crate::youtube::{Credential, PlatformError, PlaylistKind, VideoPlatform};

/// Upstream listing the engine can pull records from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Uploads,
    History,
    Activities,
    Search,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Uploads,
        SourceKind::History,
        SourceKind::Activities,
        SourceKind::Search,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Uploads => "uploads",
            Self::History => "history",
            Self::Activities => "activities",
            Self::Search => "search",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "uploads" | "upload" => Some(Self::Uploads),
            "history" | "watch_history" => Some(Self::History),
            "activities" | "activity" => Some(Self::Activities),
            "search" => Some(Self::Search),
            _ => None,
        }
    }
}

/// Who is asking for a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    Authenticated(Credential),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(credential) => Some(credential),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub window_days: u32,
    pub top_up_target: usize,
    pub duration_mode: DurationMode,
    pub sources: Vec<SourceKind>,
    pub lookup_concurrency: usize,
    /// Fixed seed for synthetic data; `None` uses the thread RNG
    pub synthetic_seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_up_target: super::blending::DEFAULT_TOP_UP_TARGET,
            duration_mode: DurationMode::Rounded,
            sources: SourceKind::ALL.to_vec(),
            lookup_concurrency: 8,
            synthetic_seed: None,
        }
    }
}

/// Builds watch reports. Holds no per-request state; clone freely.
#[derive(Clone)]
pub struct WatchReportEngine {
    platform: Arc<dyn VideoPlatform>,
    settings: EngineSettings,
    generator: SyntheticGenerator,
}

/// Records gathered from every enabled source
struct Harvest {
    records: Vec<WatchRecord>,
    failed_sources: usize,
}

impl WatchReportEngine {
    pub fn new(platform: Arc<dyn VideoPlatform>, settings: EngineSettings) -> Self {
        Self {
            platform,
            settings,
            generator: SyntheticGenerator::default(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub async fn get_watch_report(&self, identity: &Identity) -> Report {
        self.get_watch_report_at(identity, Utc::now()).await
    }

    /// Same as [`Self::get_watch_report`] with an explicit clock
    pub async fn get_watch_report_at(&self, identity: &Identity, now: DateTime<Utc>) -> Report {
        let today = now.date_naive();
        let mut diagnostics = Diagnostics::new();

        let (harvest, demo_reason) = match identity {
            Identity::Anonymous => {
                diagnostics.info("engine", "anonymous caller, serving demo data");
                (None, DemoReason::Anonymous)
            }
            Identity::Authenticated(credential) => {
                let harvest = self.harvest(credential, &mut diagnostics).await;
                let reason = if harvest.records.is_empty() && harvest.failed_sources > 0 {
                    DemoReason::ApiError
                } else {
                    DemoReason::NoRealData
                };
                (Some(harvest), reason)
            }
        };

        let real = harvest.map(|h| h.records).unwrap_or_default();
        let real_count = real.len();

        let policy = BlendPolicy::new(self.settings.top_up_target);
        let blend = policy.blend(real, || self.synthetic_batch(today), demo_reason);
        diagnostics.info(
            "blend",
            format!(
                "{:?}: {real_count} real, {} synthetic records",
                blend.outcome,
                blend.synthetic.len()
            ),
        );

        let error = match demo_reason {
            DemoReason::ApiError if blend.summary.is_demo => {
                diagnostics.first_error().map(|d| d.message.clone())
            }
            _ => None,
        };

        ReportBuilder::new(self.settings.window_days, today).build(blend, error, diagnostics)
    }

    fn synthetic_batch(&self, today: NaiveDate) -> SyntheticBatch {
        let window = self.settings.window_days;
        match self.settings.synthetic_seed {
            Some(seed) => self
                .generator
                .generate(&mut StdRng::seed_from_u64(seed), window, today),
            None => self.generator.generate(&mut rand::rng(), window, today),
        }
    }

    /// Pull raw records from every enabled source, resolve details, normalize.
    /// Source failures are recorded and skipped.
    async fn harvest(&self, credential: &Credential, diagnostics: &mut Diagnostics) -> Harvest {
        let mut raw = Vec::new();
        let mut failed_sources = 0;

        let wants = |kind: SourceKind| self.settings.sources.contains(&kind);

        if wants(SourceKind::Uploads) || wants(SourceKind::History) {
            match self.platform.own_channel(credential).await {
                Ok(Some(channel)) => {
                    diagnostics.info("channel", format!("found channel '{}'", channel.channel_title));

                    let playlists = [
                        (SourceKind::Uploads, PlaylistKind::Uploads, channel.uploads),
                        (SourceKind::History, PlaylistKind::WatchHistory, channel.watch_history),
                    ];
                    for (source, kind, playlist) in playlists {
                        if !wants(source) {
                            continue;
                        }
                        let Some(playlist_id) = playlist else {
                            diagnostics.debug(source.name(), "playlist not exposed for this channel");
                            continue;
                        };
                        let result = self
                            .platform
                            .playlist_items(credential, &playlist_id, kind)
                            .await;
                        failed_sources += absorb_source(source, result, &mut raw, diagnostics);
                    }
                }
                Ok(None) => diagnostics.info("channel", "account has no channel"),
                Err(err) => {
                    failed_sources += 1;
                    diagnostics.error("channel", format!("channel lookup failed: {err}"));
                }
            }
        }

        if wants(SourceKind::Activities) {
            let result = self.platform.activities(credential).await;
            failed_sources += absorb_source(SourceKind::Activities, result, &mut raw, diagnostics);
        }

        if wants(SourceKind::Search) {
            let result = self.platform.search_own_videos(credential).await;
            failed_sources += absorb_source(SourceKind::Search, result, &mut raw, diagnostics);
        }

        let details = self.lookup_details(credential, &raw, diagnostics).await;

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(raw.len());
        for item in &raw {
            match normalize(item, details.get(item.video_id()), self.settings.duration_mode) {
                Ok(record) => {
                    if seen.insert((record.external_id.clone(), record.watched_at)) {
                        records.push(record);
                    } else {
                        diagnostics.debug("normalize", format!("duplicate record for {}", record.external_id));
                    }
                }
                Err(err) => diagnostics.warn("normalize", format!("skipping record: {err}")),
            }
        }

        Harvest {
            records,
            failed_sources,
        }
    }

    /// Resolve content details for each distinct video id, concurrently.
    async fn lookup_details(
        &self,
        credential: &Credential,
        raw: &[RawActivityRecord],
        diagnostics: &mut Diagnostics,
    ) -> HashMap<String, VideoDetails> {
        let mut ids: Vec<String> = Vec::new();
        let mut queued = HashSet::new();
        for item in raw {
            if queued.insert(item.video_id()) {
                ids.push(item.video_id().to_string());
            }
        }

        let permits = Arc::new(Semaphore::new(self.settings.lookup_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for video_id in ids {
            let platform = Arc::clone(&self.platform);
            let credential = credential.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => platform.video_details(&credential, &video_id).await,
                    Err(_) => Err(PlatformError::Other("lookup limiter closed".to_string())),
                };
                (video_id, result)
            });
        }

        let mut details = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((video_id, Ok(Some(found)))) => {
                    details.insert(video_id, found);
                }
                Ok((video_id, Ok(None))) => {
                    diagnostics.warn("details", format!("video {video_id} not found"));
                }
                Ok((video_id, Err(err))) => {
                    diagnostics.warn("details", format!("lookup for video {video_id} failed: {err}"));
                }
                Err(err) => diagnostics.error("details", format!("lookup task failed: {err}")),
            }
        }

        details
    }
}

/// Append a source's records; returns 1 if the source failed
fn absorb_source(
    source: SourceKind,
    result: Result<Vec<RawActivityRecord>, PlatformError>,
    raw: &mut Vec<RawActivityRecord>,
    diagnostics: &mut Diagnostics,
) -> usize {
    match result {
        Ok(items) => {
            diagnostics.info(source.name(), format!("found {} items", items.len()));
            raw.extend(items);
            0
        }
        Err(err) => {
            diagnostics.error(source.name(), format!("{} unavailable: {err}", source.name()));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse(" Uploads "), Some(SourceKind::Uploads));
        assert_eq!(SourceKind::parse("watch_history"), Some(SourceKind::History));
        assert_eq!(SourceKind::parse("likes"), None);
    }

    #[test]
    fn test_identity_credential() {
        assert!(!Identity::Anonymous.is_authenticated());
        let identity = Identity::Authenticated(Credential::new("t"));
        assert_eq!(identity.credential().map(|c| c.token()), Some("t"));
    }
}
