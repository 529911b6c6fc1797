/// Group-by aggregations over the loaded datasets.
///
/// Every function here is pure: it borrows the source records and returns a
/// freshly built summary table. Groups are keyed in a `BTreeMap`, so output
/// is always ascending by (year, code) and only observed combinations
/// produce a row (no zero-filling).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::logging::{self, Stage};
use crate::model::{
    DailyRecord, HourlyRecord, HourlySummary, MonthlySummary, Season, SeasonalSummary, Year,
};

// ---------------------------------------------------------------------------
// Daily aggregations
// ---------------------------------------------------------------------------

/// Total rentals per (year, season).
pub fn seasonal_totals(daily: &[DailyRecord]) -> Vec<SeasonalSummary> {
    let mut groups: BTreeMap<(Year, Season), u64> = BTreeMap::new();
    for record in daily {
        *groups.entry((record.year, record.season)).or_insert(0) += record.count;
    }

    let summaries: Vec<SeasonalSummary> = groups
        .into_iter()
        .map(|((year, season), total)| SeasonalSummary { year, season, total })
        .collect();

    logging::log_stage_summary(Stage::Aggregator, "seasonal totals", daily.len(), summaries.len());
    summaries
}

/// Total rentals per (year, month), in chronological order.
///
/// The trend fit reads this sequence positionally, so the ordering is part
/// of the contract.
pub fn monthly_totals(daily: &[DailyRecord]) -> Vec<MonthlySummary> {
    let mut groups: BTreeMap<(Year, u8), u64> = BTreeMap::new();
    for record in daily {
        *groups.entry((record.year, record.month)).or_insert(0) += record.count;
    }

    let summaries: Vec<MonthlySummary> = groups
        .into_iter()
        .map(|((year, month), total)| MonthlySummary { year, month, total })
        .collect();

    logging::log_stage_summary(Stage::Aggregator, "monthly totals", daily.len(), summaries.len());
    summaries
}

// ---------------------------------------------------------------------------
// Hourly aggregations
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HourAccumulator {
    sum: u64,
    max: u64,
    min: u64,
    n: usize,
}

impl HourAccumulator {
    fn push(&mut self, count: u64) {
        if self.n == 0 {
            self.max = count;
            self.min = count;
        } else {
            self.max = self.max.max(count);
            self.min = self.min.min(count);
        }
        self.sum += count;
        self.n += 1;
    }
}

/// Mean, max and min rentals per (year, hour-of-day).
pub fn hourly_stats(hourly: &[HourlyRecord]) -> Vec<HourlySummary> {
    let mut groups: BTreeMap<(Year, u8), HourAccumulator> = BTreeMap::new();
    for record in hourly {
        groups.entry((record.year, record.hour)).or_default().push(record.count);
    }

    let summaries: Vec<HourlySummary> = groups
        .into_iter()
        .map(|((year, hour), acc)| HourlySummary {
            year,
            hour,
            mean: acc.sum as f64 / acc.n as f64,
            max: acc.max,
            min: acc.min,
            observations: acc.n,
        })
        .collect();

    logging::log_stage_summary(Stage::Aggregator, "hourly stats", hourly.len(), summaries.len());
    summaries
}

// ---------------------------------------------------------------------------
// Per-year partitioning
// ---------------------------------------------------------------------------

/// Rows that carry a year, so they can be split into per-year subsets.
pub trait YearKeyed {
    fn year(&self) -> Year;
}

impl YearKeyed for SeasonalSummary {
    fn year(&self) -> Year {
        self.year
    }
}

impl YearKeyed for HourlySummary {
    fn year(&self) -> Year {
        self.year
    }
}

/// The rows of one year, in their original relative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPartition<T> {
    pub year: Year,
    pub rows: Vec<T>,
}

/// Splits `rows` by year, one partition per observed year, ascending.
///
/// Peaks are computed inside each partition, never as an offset into the
/// combined table.
pub fn partition_by_year<T: YearKeyed + Clone>(rows: &[T]) -> Vec<YearPartition<T>> {
    let mut groups: BTreeMap<Year, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.year()).or_default().push(row.clone());
    }
    groups
        .into_iter()
        .map(|(year, rows)| YearPartition { year, rows })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: Year, season: Season, month: u8, count: u64) -> DailyRecord {
        DailyRecord { year, season, month, count }
    }

    fn hour(year: Year, hour: u8, count: u64) -> HourlyRecord {
        HourlyRecord { year, hour, count }
    }

    fn sample_days() -> Vec<DailyRecord> {
        vec![
            day(Year::Y2012, Season::Spring, 1, 2294),
            day(Year::Y2011, Season::Spring, 1, 985),
            day(Year::Y2011, Season::Spring, 1, 801),
            day(Year::Y2011, Season::Summer, 4, 1500),
            day(Year::Y2011, Season::Spring, 3, 1200),
            day(Year::Y2012, Season::Fall, 7, 7000),
        ]
    }

    // --- Seasonal -----------------------------------------------------------

    #[test]
    fn test_seasonal_totals_sum_matches_input_sum() {
        let days = sample_days();
        let totals = seasonal_totals(&days);
        let grouped: u64 = totals.iter().map(|s| s.total).sum();
        let raw: u64 = days.iter().map(|d| d.count).sum();
        assert_eq!(grouped, raw, "no rentals should be lost or double-counted");
    }

    #[test]
    fn test_seasonal_totals_one_row_per_observed_pair() {
        let totals = seasonal_totals(&sample_days());
        assert_eq!(
            totals,
            vec![
                SeasonalSummary { year: Year::Y2011, season: Season::Spring, total: 2986 },
                SeasonalSummary { year: Year::Y2011, season: Season::Summer, total: 1500 },
                SeasonalSummary { year: Year::Y2012, season: Season::Spring, total: 2294 },
                SeasonalSummary { year: Year::Y2012, season: Season::Fall, total: 7000 },
            ]
        );
    }

    #[test]
    fn test_seasonal_totals_of_empty_input_is_empty() {
        assert!(seasonal_totals(&[]).is_empty());
    }

    // --- Monthly ------------------------------------------------------------

    #[test]
    fn test_monthly_totals_are_chronological() {
        let totals = monthly_totals(&sample_days());
        let keys: Vec<(Year, u8)> = totals.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(
            keys,
            vec![(Year::Y2011, 1), (Year::Y2011, 3), (Year::Y2011, 4), (Year::Y2012, 1), (Year::Y2012, 7)]
        );
        assert_eq!(totals[0].total, 985 + 801);
    }

    #[test]
    fn test_monthly_totals_cover_full_two_year_calendar() {
        let days: Vec<DailyRecord> = [Year::Y2011, Year::Y2012]
            .iter()
            .flat_map(|&y| (1..=12).map(move |m| day(y, Season::Spring, m, m as u64)))
            .collect();
        assert_eq!(monthly_totals(&days).len(), 24);
    }

    // --- Hourly -------------------------------------------------------------

    #[test]
    fn test_hourly_stats_mean_max_min() {
        let hours = vec![
            hour(Year::Y2011, 17, 100),
            hour(Year::Y2011, 17, 300),
            hour(Year::Y2011, 17, 200),
            hour(Year::Y2011, 3, 5),
        ];
        let stats = hourly_stats(&hours);
        assert_eq!(stats.len(), 2);

        let h3 = &stats[0];
        assert_eq!((h3.hour, h3.mean, h3.max, h3.min), (3, 5.0, 5, 5));

        let h17 = &stats[1];
        assert_eq!(h17.hour, 17);
        assert!((h17.mean - 200.0).abs() < 1e-12);
        assert_eq!((h17.max, h17.min, h17.observations), (300, 100, 3));
    }

    #[test]
    fn test_hourly_stats_min_le_mean_le_max() {
        let hours: Vec<HourlyRecord> = (0..500u64)
            .map(|i| {
                let year = if i % 2 == 0 { Year::Y2011 } else { Year::Y2012 };
                hour(year, (i % 24) as u8, (i * 37) % 977)
            })
            .collect();
        for s in hourly_stats(&hours) {
            assert!(
                s.min as f64 <= s.mean && s.mean <= s.max as f64,
                "min <= mean <= max violated for {:?}",
                s
            );
        }
    }

    #[test]
    fn test_hourly_stats_skip_unobserved_hours() {
        let stats = hourly_stats(&[hour(Year::Y2012, 8, 10)]);
        assert_eq!(stats.len(), 1, "no zero-filled rows for hours never observed");
    }

    // --- Partitioning -------------------------------------------------------

    #[test]
    fn test_partition_by_year_splits_and_preserves_order() {
        let totals = seasonal_totals(&sample_days());
        let parts = partition_by_year(&totals);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].year, Year::Y2011);
        assert_eq!(parts[0].rows.len(), 2);
        assert_eq!(parts[1].year, Year::Y2012);
        assert_eq!(parts[1].rows[1].season, Season::Fall);
    }

    #[test]
    fn test_partition_by_year_omits_unobserved_years() {
        let stats = hourly_stats(&[hour(Year::Y2012, 8, 10)]);
        let parts = partition_by_year(&stats);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].year, Year::Y2012);
    }
}
