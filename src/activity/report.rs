//! Folds blended records into the daily window and renders the views

use chrono::NaiveDate;

use super::blending::Blend;
use super::buckets::{DailyBucketIndex, MAX_WINDOW_DAYS};
use super::diagnostics::Diagnostics;
use super::models::{ChartSeries, DailyRow, Report, WatchRecord};

#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    window_days: u32,
    end_date: NaiveDate,
}

impl ReportBuilder {
    pub fn new(window_days: u32, end_date: NaiveDate) -> Self {
        Self {
            window_days: window_days.clamp(1, MAX_WINDOW_DAYS),
            end_date,
        }
    }

    /// Fold `records` into a fresh window. Returns the index and the number of
    /// records that fell outside it.
    pub fn fold<'a, I>(&self, records: I) -> (DailyBucketIndex, usize)
    where
        I: IntoIterator<Item = &'a WatchRecord>,
    {
        let mut index = DailyBucketIndex::build(self.window_days, self.end_date);
        let mut dropped = 0;

        for record in records {
            if !index.accumulate(record.watched_on(), record.duration_minutes) {
                dropped += 1;
            }
        }

        (index, dropped)
    }

    pub fn build(&self, mut blend: Blend, error: Option<String>, mut diagnostics: Diagnostics) -> Report {
        let (mut daily, dropped) = self.fold(&blend.real);
        if dropped > 0 {
            diagnostics.info(
                "report",
                format!("{dropped} real records fall outside the {}-day window", self.window_days),
            );
        }

        match blend.synthetic_stats.take() {
            Some(stats) => daily.merge_stats(stats.iter().map(|(date, stat)| (*date, stat))),
            None => {
                let (synthetic, _) = self.fold(&blend.synthetic);
                daily.merge(&synthetic);
            }
        }

        let table = table(&daily);
        let chart = chart(&table);

        Report {
            summary: blend.summary,
            message: blend.message.to_string(),
            watch_history: blend.into_records(),
            daily_stats: daily.into_map(),
            error,
            table,
            chart,
            diagnostics: diagnostics.into_events(),
        }
    }
}

/// Chronological rows with minutes rounded to whole numbers
pub fn table(index: &DailyBucketIndex) -> Vec<DailyRow> {
    index
        .days()
        .enumerate()
        .map(|(i, (date, stat))| DailyRow {
            day: i as u32 + 1,
            date: *date,
            minutes: stat.total_minutes.round() as i64,
        })
        .collect()
}

pub fn chart(rows: &[DailyRow]) -> ChartSeries {
    ChartSeries {
        labels: rows.iter().map(|r| r.day).collect(),
        data: rows.iter().map(|r| r.minutes).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::blending::{BlendPolicy, DemoReason};
    use crate::activity::models::{DailyStat, Provenance, RecordSource};
    use chrono::{TimeZone, Utc};

    fn record(id: &str, day: u32, minutes: f64) -> WatchRecord {
        WatchRecord {
            title: id.to_string(),
            watched_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 30, 0).unwrap(),
            duration_minutes: minutes,
            external_id: id.to_string(),
            channel_title: "Channel".to_string(),
            provenance: Provenance::Real,
            source: Some(RecordSource::History),
            view_count: None,
        }
    }

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 30).unwrap()
    }

    #[test]
    fn test_fold_counts_dropped_records() {
        let builder = ReportBuilder::new(7, end());
        let records = vec![record("a", 28, 3.0), record("b", 2, 4.0)];
        let (index, dropped) = builder.fold(&records);

        assert_eq!(dropped, 1);
        assert_eq!(index.total_videos(), 1);
        assert_eq!(index.total_minutes(), 3.0);
    }

    #[test]
    fn test_table_rounds_and_numbers_days() {
        let builder = ReportBuilder::new(3, end());
        let records = vec![
            record("a", 28, 0.5),
            record("b", 30, 10.25),
            record("c", 30, 10.25),
        ];
        let (index, _) = builder.fold(&records);
        let rows = table(&index);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].day, 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
        assert_eq!(rows[0].minutes, 1);
        assert_eq!(rows[1].minutes, 0);
        assert_eq!(rows[2].day, 3);
        assert_eq!(rows[2].minutes, 21);

        let series = chart(&rows);
        assert_eq!(series.labels, vec![1, 2, 3]);
        assert_eq!(series.data, vec![1, 0, 21]);
    }

    #[test]
    fn test_demo_report_uses_batch_stats() {
        use crate::activity::synthetic::SyntheticGenerator;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let batch = SyntheticGenerator::default().generate(&mut StdRng::seed_from_u64(11), 30, end());
        let expected = batch.daily_stats.clone();
        let blend = BlendPolicy::default().blend(Vec::new(), move || batch, DemoReason::Anonymous);
        let report = ReportBuilder::new(30, end()).build(blend, None, Diagnostics::new());

        assert_eq!(report.daily_stats.len(), 30);
        for (date, stat) in &report.daily_stats {
            match expected.get(date) {
                Some(generated) => assert_eq!(stat, generated),
                None => assert_eq!(*stat, DailyStat::default()),
            }
        }

        let folded: u32 = report.daily_stats.values().map(|s| s.video_count).sum();
        assert_eq!(folded as usize, report.watch_history.len());
    }

    #[test]
    fn test_build_real_only_report() {
        let builder = ReportBuilder::new(30, end());
        let records = vec![record("a", 5, 10.0), record("b", 6, 20.0)];
        let blend = BlendPolicy::new(2).blend(records, Default::default, DemoReason::NoRealData);
        let report = builder.build(blend, None, Diagnostics::new());

        assert_eq!(report.watch_history.len(), 2);
        assert_eq!(report.daily_stats.len(), 30);
        assert_eq!(report.table.len(), 30);
        assert_eq!(report.chart.data.iter().sum::<i64>(), 30);
        assert!(!report.summary.is_demo);
        assert_eq!(report.summary.real_data_count, 2);
    }
}
