//! Trailing calendar window of daily accumulators

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

use super::models::DailyStat;

/// Longest window a report may cover, about ten years
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// First day of a `window_days` window ending at `end_date`, with the window
/// clamped to `1..=MAX_WINDOW_DAYS`
pub(crate) fn window_start(window_days: u32, end_date: NaiveDate) -> (NaiveDate, u32) {
    let window_days = window_days.clamp(1, MAX_WINDOW_DAYS);
    let start = end_date
        .checked_sub_days(Days::new(u64::from(window_days - 1)))
        .unwrap_or(NaiveDate::MIN);
    (start, window_days)
}

/// Date-ordered map covering exactly `window_days` days ending at `end_date`.
///
/// Contributions for dates outside the window are dropped; the window never
/// grows or shrinks after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucketIndex {
    start: NaiveDate,
    end: NaiveDate,
    days: BTreeMap<NaiveDate, DailyStat>,
}

impl DailyBucketIndex {
    /// Build a zero-initialized window. `window_days` is clamped to
    /// `1..=MAX_WINDOW_DAYS`.
    pub fn build(window_days: u32, end_date: NaiveDate) -> Self {
        let (start, window_days) = window_start(window_days, end_date);

        let days = start
            .iter_days()
            .take(window_days as usize)
            .take_while(|date| *date <= end_date)
            .map(|date| (date, DailyStat::default()))
            .collect();

        Self {
            start,
            end: end_date,
            days,
        }
    }

    /// Add one video's minutes to `date`. Returns `false` if `date` is outside
    /// the window.
    pub fn accumulate(&mut self, date: NaiveDate, minutes: f64) -> bool {
        match self.days.get_mut(&date) {
            Some(stat) => {
                stat.total_minutes += minutes.max(0.0);
                stat.video_count += 1;
                true
            }
            None => false,
        }
    }

    /// Add every in-window day of `other` onto this index
    pub fn merge(&mut self, other: &DailyBucketIndex) {
        self.merge_stats(other.days.iter().map(|(date, stat)| (*date, stat)));
    }

    /// Add arbitrary per-date stats; dates outside the window are ignored
    pub fn merge_stats<'a, I>(&mut self, stats: I)
    where
        I: IntoIterator<Item = (NaiveDate, &'a DailyStat)>,
    {
        for (date, stat) in stats {
            if let Some(existing) = self.days.get_mut(&date) {
                existing.add(stat);
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyStat> {
        self.days.get(&date)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in chronological order
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DailyStat)> {
        self.days.iter()
    }

    pub fn total_minutes(&self) -> f64 {
        self.days.values().map(|s| s.total_minutes).sum()
    }

    pub fn total_videos(&self) -> u32 {
        self.days.values().map(|s| s.video_count).sum()
    }

    pub fn into_map(self) -> BTreeMap<NaiveDate, DailyStat> {
        self.days
    }
}
