//! Synthetic filler for accounts whose real history is unavailable

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::RngExt;
use std::collections::BTreeMap;

use super::buckets::window_start;
use super::models::{DailyStat, Provenance, WatchRecord};

/// Upper bound (inclusive) of generated videos per day
pub const MAX_VIDEOS_PER_DAY: u32 = 5;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleVideo {
    pub title: &'static str,
    pub channel: &'static str,
    pub minutes: u32,
}

pub const SAMPLE_CATALOG: &[SampleVideo] = &[
    SampleVideo { title: "JavaScript Tutorial - Full Course", channel: "CodeSchool", minutes: 45 },
    SampleVideo { title: "React Hooks Explained", channel: "TechTalks", minutes: 28 },
    SampleVideo { title: "Node.js Best Practices", channel: "WebDev Pro", minutes: 35 },
    SampleVideo { title: "CSS Grid Layout Guide", channel: "DesignMaster", minutes: 22 },
    SampleVideo { title: "API Design Patterns", channel: "DevTips", minutes: 40 },
    SampleVideo { title: "Database Optimization Tips", channel: "DataGuru", minutes: 33 },
    SampleVideo { title: "Machine Learning Basics", channel: "AI Academy", minutes: 55 },
    SampleVideo { title: "Python for Beginners", channel: "CodePython", minutes: 42 },
    SampleVideo { title: "Docker Complete Guide", channel: "DevOps Hub", minutes: 38 },
    SampleVideo { title: "Git Workflow Strategies", channel: "GitMaster", minutes: 25 },
];

/// Generated records plus per-day totals (days without videos are absent).
/// A report built from the whole batch merges `daily_stats` directly.
#[derive(Debug, Clone, Default)]
pub struct SyntheticBatch {
    pub records: Vec<WatchRecord>,
    pub daily_stats: BTreeMap<NaiveDate, DailyStat>,
}

#[derive(Debug, Clone, Copy)]
pub struct SyntheticGenerator {
    catalog: &'static [SampleVideo],
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new(SAMPLE_CATALOG)
    }
}

impl SyntheticGenerator {
    /// An empty catalog falls back to the built-in one
    pub fn new(catalog: &'static [SampleVideo]) -> Self {
        let catalog = if catalog.is_empty() {
            SAMPLE_CATALOG
        } else {
            catalog
        };
        Self { catalog }
    }

    /// Generate `window_days` days of filler ending at `end_date`, oldest
    /// day first. Records within a day keep generation order.
    pub fn generate<R>(&self, rng: &mut R, window_days: u32, end_date: NaiveDate) -> SyntheticBatch
    where
        R: RngExt + ?Sized,
    {
        let (start, window_days) = window_start(window_days, end_date);
        let mut batch = SyntheticBatch::default();

        let dates = start
            .iter_days()
            .take(window_days as usize)
            .take_while(|date| *date <= end_date);

        for (day, date) in dates.enumerate() {
            let videos_today = rng.random_range(0..=MAX_VIDEOS_PER_DAY);
            let midnight = date.and_time(NaiveTime::MIN).and_utc();
            let mut stat = DailyStat::default();

            for n in 0..videos_today {
                let sample = self.catalog[rng.random_range(0..self.catalog.len())];
                let offset = rng.random_range(0..SECONDS_PER_DAY);

                batch.records.push(WatchRecord {
                    title: sample.title.to_string(),
                    watched_at: midnight + Duration::seconds(offset),
                    duration_minutes: f64::from(sample.minutes),
                    external_id: format!("demo_{day}_{n}"),
                    channel_title: sample.channel.to_string(),
                    provenance: Provenance::Synthetic,
                    source: None,
                    view_count: None,
                });

                stat.total_minutes += f64::from(sample.minutes);
                stat.video_count += 1;
            }

            if stat.video_count > 0 {
                batch.daily_stats.insert(date, stat);
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let generator = SyntheticGenerator::default();
        let a = generator.generate(&mut StdRng::seed_from_u64(7), 30, end());
        let b = generator.generate(&mut StdRng::seed_from_u64(7), 30, end());

        assert_eq!(a.records, b.records);
        assert_eq!(a.daily_stats, b.daily_stats);
    }

    #[test]
    fn test_records_stay_inside_window() {
        let generator = SyntheticGenerator::default();
        let batch = generator.generate(&mut StdRng::seed_from_u64(1), 30, end());
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        for record in &batch.records {
            assert!(record.is_synthetic());
            assert!(record.watched_on() >= start && record.watched_on() <= end());
            assert!(record.external_id.starts_with("demo_"));
        }
    }

    #[test]
    fn test_per_day_counts_and_stats_agree() {
        let generator = SyntheticGenerator::default();

        for seed in 0..20 {
            let batch = generator.generate(&mut StdRng::seed_from_u64(seed), 30, end());

            let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
            for record in &batch.records {
                *counts.entry(record.watched_on()).or_default() += 1;
            }

            for (date, count) in &counts {
                assert!(*count <= MAX_VIDEOS_PER_DAY);
                assert_eq!(batch.daily_stats[date].video_count, *count);
            }
            assert_eq!(counts.len(), batch.daily_stats.len());
            assert!(batch.daily_stats.values().all(|s| s.total_minutes > 0.0));
        }
    }

    #[test]
    fn test_oversized_window_is_capped() {
        use crate::activity::buckets::MAX_WINDOW_DAYS;

        let batch = SyntheticGenerator::default().generate(
            &mut StdRng::seed_from_u64(5),
            200_000_000,
            end(),
        );
        let earliest = end() - chrono::Duration::days(i64::from(MAX_WINDOW_DAYS - 1));
        assert!(batch.records.iter().all(|r| r.watched_on() >= earliest && r.watched_on() <= end()));
    }

    #[test]
    fn test_single_entry_catalog() {
        const ONLY: &[SampleVideo] = &[SampleVideo {
            title: "Only",
            channel: "One",
            minutes: 10,
        }];
        let batch = SyntheticGenerator::new(ONLY).generate(&mut StdRng::seed_from_u64(3), 5, end());
        assert!(batch.records.iter().all(|r| r.title == "Only" && r.duration_minutes == 10.0));
    }
}
