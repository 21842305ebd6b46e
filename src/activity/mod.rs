//! Watch-activity aggregation engine
//!
//! Turns the partial, heterogeneous records the YouTube API exposes into a
//! gap-filled daily watch-time report. When the API supplies little or no
//! real history, the report is topped up with synthetic records tagged as
//! such.

pub mod blending;
pub mod buckets;
pub mod diagnostics;
pub mod duration;
pub mod engine;
pub mod models;
pub mod normalizer;
pub mod report;
pub mod synthetic;

pub use blending::{Blend, BlendPolicy, DemoReason, Outcome};
pub use buckets::{DailyBucketIndex, MAX_WINDOW_DAYS};
pub use diagnostics::{Diagnostic, DiagnosticLevel, Diagnostics};
pub use duration::{parse_duration, parse_minutes, DurationError, DurationMode, VideoDuration};
pub use engine::{EngineSettings, Identity, SourceKind, WatchReportEngine};
pub use models::{
    ChartSeries, DailyRow, DailyStat, Provenance, ProvenanceSummary, RawActivityRecord,
    RecordSource, Report, VideoDetails, WatchRecord,
};
pub use normalizer::{normalize, NormalizeError};
pub use report::ReportBuilder;
pub use synthetic::{SyntheticBatch, SyntheticGenerator};
