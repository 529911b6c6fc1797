/// Peak identification for chart highlighting.
///
/// `argmax` returns the position of the first maximal element, so ties go
/// to the earliest row. Peaks are always looked up inside a single year's
/// partition.

use serde::Serialize;

use crate::analysis::groupings::{partition_by_year, YearKeyed};
use crate::model::{HourlySummary, SeasonalSummary, Year};

/// Index of the first element with the largest `key`, or `None` if empty.
///
/// Keys that compare as unordered (NaN) never replace the current best.
pub fn argmax<T, K, F>(records: &[T], key: F) -> Option<usize>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let mut best: Option<(usize, K)> = None;
    for (i, record) in records.iter().enumerate() {
        let k = key(record);
        if k.partial_cmp(&k).is_none() {
            continue;
        }
        let replace = match &best {
            None => true,
            Some((_, current)) => k > *current,
        };
        if replace {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

/// One year's rows with the index of its peak row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPeak<T> {
    pub year: Year,
    pub rows: Vec<T>,
    /// Index into `rows`.
    pub peak_index: usize,
}

impl<T> YearPeak<T> {
    pub fn peak(&self) -> &T {
        &self.rows[self.peak_index]
    }
}

fn peaks_by_year<T, K, F>(rows: &[T], key: F) -> Vec<YearPeak<T>>
where
    T: YearKeyed + Clone,
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    partition_by_year(rows)
        .into_iter()
        .filter_map(|part| {
            argmax(&part.rows, &key).map(|peak_index| YearPeak {
                year: part.year,
                rows: part.rows,
                peak_index,
            })
        })
        .collect()
}

/// Busiest season of each year, by total rentals.
pub fn seasonal_peaks(seasonal: &[SeasonalSummary]) -> Vec<YearPeak<SeasonalSummary>> {
    peaks_by_year(seasonal, |s| s.total)
}

/// Busiest hour of each year, by mean rentals.
pub fn hourly_peaks(hourly: &[HourlySummary]) -> Vec<YearPeak<HourlySummary>> {
    peaks_by_year(hourly, |h| h.mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Season;

    fn season(year: Year, season: Season, total: u64) -> SeasonalSummary {
        SeasonalSummary { year, season, total }
    }

    fn hour(year: Year, hour: u8, mean: f64) -> HourlySummary {
        HourlySummary { year, hour, mean, max: mean as u64 + 10, min: 0, observations: 365 }
    }

    #[test]
    fn test_argmax_first_wins_on_tie() {
        assert_eq!(argmax(&[3, 7, 7, 1], |x| *x), Some(1));
        assert_eq!(argmax(&[5, 5, 5], |x| *x), Some(0));
    }

    #[test]
    fn test_argmax_of_empty_is_none() {
        let empty: [u64; 0] = [];
        assert_eq!(argmax(&empty, |x| *x), None);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f64::NAN, 2.0, 1.0], |x| *x), Some(1));
    }

    #[test]
    fn test_fall_is_peak_season_for_year_0() {
        let totals = vec![
            season(Year::Y2011, Season::Fall, 1000),
            season(Year::Y2011, Season::Spring, 200),
            season(Year::Y2011, Season::Summer, 500),
            season(Year::Y2011, Season::Winter, 300),
        ];
        let peaks = seasonal_peaks(&totals);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].peak().season, Season::Fall);
    }

    #[test]
    fn test_peaks_computed_independently_per_year() {
        // 2012 totals dwarf 2011; a global argmax would never land in 2011.
        let totals = vec![
            season(Year::Y2011, Season::Spring, 150),
            season(Year::Y2011, Season::Summer, 300),
            season(Year::Y2011, Season::Fall, 400),
            season(Year::Y2011, Season::Winter, 250),
            season(Year::Y2012, Season::Spring, 900),
            season(Year::Y2012, Season::Summer, 600),
            season(Year::Y2012, Season::Fall, 700),
            season(Year::Y2012, Season::Winter, 500),
        ];
        let peaks = seasonal_peaks(&totals);
        assert_eq!(peaks[0].year, Year::Y2011);
        assert_eq!(peaks[0].peak_index, 2);
        assert_eq!(peaks[1].year, Year::Y2012);
        assert_eq!(peaks[1].peak_index, 0, "index is within the 2012 partition");
        assert_eq!(peaks[1].peak().season, Season::Spring);
    }

    #[test]
    fn test_hour_17_peaks_in_both_years() {
        let rows: Vec<HourlySummary> = [Year::Y2011, Year::Y2012]
            .iter()
            .flat_map(|&y| {
                (0..24u8).map(move |h| {
                    let base = if y == Year::Y2011 { 100.0 } else { 200.0 };
                    let mean = if h == 17 { base * 4.0 } else { base + h as f64 };
                    hour(y, h, mean)
                })
            })
            .collect();
        let peaks = hourly_peaks(&rows);
        assert_eq!(peaks.len(), 2);
        for peak in &peaks {
            assert_eq!(peak.peak().hour, 17, "year {:?}", peak.year);
            assert_eq!(peak.rows.len(), 24);
        }
    }
}
