//! Real/synthetic blending policy

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::{DailyStat, ProvenanceSummary, WatchRecord};
use super::synthetic::SyntheticBatch;

pub const DEFAULT_TOP_UP_TARGET: usize = 50;

pub const MESSAGE_ANONYMOUS: &str =
    "Demo data: the YouTube API does not provide full watch history";
pub const MESSAGE_NO_REAL_DATA: &str = "Demo data: the YouTube API does not expose watch history \
     for privacy reasons. Export your real history through Google Takeout.";
pub const MESSAGE_API_ERROR: &str = "Demo data due to a YouTube API error";
pub const MESSAGE_MIXED: &str =
    "Mixed data: partly real, partly demo (the YouTube API limits access to watch history)";
pub const MESSAGE_REAL: &str = "Real data from the YouTube API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    SyntheticOnly,
    Mixed,
    RealOnly,
}

/// Why a report ended up synthetic-only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoReason {
    Anonymous,
    NoRealData,
    ApiError,
}

impl DemoReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::Anonymous => MESSAGE_ANONYMOUS,
            Self::NoRealData => MESSAGE_NO_REAL_DATA,
            Self::ApiError => MESSAGE_API_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendPolicy {
    /// Total record count a mixed report is topped up to; real data at or
    /// above this count is returned as-is
    pub target_total: usize,
}

impl Default for BlendPolicy {
    fn default() -> Self {
        Self {
            target_total: DEFAULT_TOP_UP_TARGET,
        }
    }
}

/// Records chosen by the policy, real records first
#[derive(Debug, Clone)]
pub struct Blend {
    pub outcome: Outcome,
    pub real: Vec<WatchRecord>,
    pub synthetic: Vec<WatchRecord>,
    /// Per-day totals of `synthetic`, kept when the whole batch was taken.
    /// A trimmed batch carries `None` and is refolded from its records.
    pub synthetic_stats: Option<BTreeMap<NaiveDate, DailyStat>>,
    pub summary: ProvenanceSummary,
    pub message: &'static str,
}

impl Blend {
    pub fn len(&self) -> usize {
        self.real.len() + self.synthetic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Real then synthetic, arrival order preserved
    pub fn into_records(self) -> Vec<WatchRecord> {
        let mut records = self.real;
        records.extend(self.synthetic);
        records
    }
}

impl BlendPolicy {
    pub fn new(target_total: usize) -> Self {
        Self {
            target_total: target_total.max(1),
        }
    }

    pub fn outcome(&self, real_count: usize) -> Outcome {
        if real_count == 0 {
            Outcome::SyntheticOnly
        } else if real_count < self.target_total {
            Outcome::Mixed
        } else {
            Outcome::RealOnly
        }
    }

    /// Decide and merge. `synthetic` is only consulted when `real` is short of
    /// the target; `demo_reason` picks the message for the synthetic-only case.
    pub fn blend(
        &self,
        real: Vec<WatchRecord>,
        synthetic: impl FnOnce() -> SyntheticBatch,
        demo_reason: DemoReason,
    ) -> Blend {
        let real_count = real.len();

        match self.outcome(real_count) {
            Outcome::SyntheticOnly => {
                let batch = synthetic();
                Blend {
                    outcome: Outcome::SyntheticOnly,
                    real,
                    synthetic: batch.records,
                    synthetic_stats: Some(batch.daily_stats),
                    summary: ProvenanceSummary {
                        is_demo: true,
                        is_mixed: false,
                        real_data_count: 0,
                    },
                    message: demo_reason.message(),
                }
            }
            Outcome::Mixed => {
                let slots = self.target_total - real_count;
                let filler = synthetic().records.into_iter().take(slots).collect();
                Blend {
                    outcome: Outcome::Mixed,
                    real,
                    synthetic: filler,
                    synthetic_stats: None,
                    summary: ProvenanceSummary {
                        is_demo: false,
                        is_mixed: true,
                        real_data_count: real_count,
                    },
                    message: MESSAGE_MIXED,
                }
            }
            Outcome::RealOnly => Blend {
                outcome: Outcome::RealOnly,
                real,
                synthetic: Vec::new(),
                synthetic_stats: None,
                summary: ProvenanceSummary {
                    is_demo: false,
                    is_mixed: false,
                    real_data_count: real_count,
                },
                message: MESSAGE_REAL,
            },
        }
    }
}
