/// Dashboard assembly and rendering.
///
/// Runs the aggregation pipeline over the loaded datasets and packages
/// everything a front end needs: the labelled monthly series with its fitted
/// curve, per-year season and hour breakdowns with their peak rows marked,
/// and a few findings written from the numbers. Rendering is plain text or
/// JSON; charts are left to whatever consumes the JSON.
///
/// # Clock injection
/// `build_dashboard_at` takes the generation timestamp as a parameter so
/// tests stay deterministic; `build_dashboard` stamps with `Utc::now()`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::analysis::groupings::{hourly_stats, monthly_totals, seasonal_totals};
use crate::analysis::peaks::{hourly_peaks, seasonal_peaks, YearPeak};
use crate::analysis::trend::{fit_monthly_trend, TrendAxis};
use crate::config::TrendConfig;
use crate::labels::{self, month_label, year_label, LabelledMonth, LabelledSeason};
use crate::logging::{self, Stage};
use crate::model::{
    DailyRecord, DashboardError, HourlyRecord, HourlySummary, SeasonalSummary, Year,
};

pub const DASHBOARD_TITLE: &str = "Bike Sharing Dashboard";

// ---------------------------------------------------------------------------
// Dashboard value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSection {
    pub axis: TrendAxis,
    pub degree: usize,
    /// Highest power first.
    pub coefficients: Vec<f64>,
    pub months: Vec<LabelledMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonShare {
    pub season: LabelledSeason,
    /// Percentage of the year's rentals, 0–100.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalYear {
    pub year: Year,
    pub year_label: &'static str,
    pub seasons: Vec<SeasonShare>,
    /// Index into `seasons` of the busiest season.
    pub peak_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyYear {
    pub year: Year,
    pub year_label: &'static str,
    pub hours: Vec<HourlySummary>,
    /// Index into `hours` of the hour with the highest mean.
    pub peak_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    pub trend: TrendSection,
    pub seasonal: Vec<SeasonalYear>,
    pub hourly: Vec<HourlyYear>,
    pub findings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

pub fn build_dashboard(
    daily: &[DailyRecord],
    hourly: &[HourlyRecord],
    trend: &TrendConfig,
) -> Result<Dashboard, DashboardError> {
    build_dashboard_at(daily, hourly, trend, Utc::now())
}

pub fn build_dashboard_at(
    daily: &[DailyRecord],
    hourly: &[HourlyRecord],
    trend: &TrendConfig,
    now: DateTime<Utc>,
) -> Result<Dashboard, DashboardError> {
    let monthly = monthly_totals(daily);
    let fitted = fit_monthly_trend(&monthly, trend.axis, trend.degree)?;
    let months = labels::label_monthly(&fitted.points)?;

    let seasonal = seasonal_peaks(&seasonal_totals(daily))
        .into_iter()
        .map(seasonal_year)
        .collect::<Result<Vec<_>, _>>()?;

    let hourly = hourly_peaks(&hourly_stats(hourly))
        .into_iter()
        .map(hourly_year)
        .collect::<Result<Vec<_>, _>>()?;

    let trend = TrendSection {
        axis: fitted.axis,
        degree: fitted.polynomial.degree(),
        coefficients: fitted.polynomial.coefficients().to_vec(),
        months,
    };

    let mut findings = Vec::new();
    findings.extend(trend_findings(&trend)?);
    findings.extend(season_findings(&seasonal));
    findings.extend(hour_findings(&hourly));

    logging::info(
        Stage::Presenter,
        None,
        &format!(
            "Dashboard ready: {} months, {} season years, {} hour years",
            trend.months.len(),
            seasonal.len(),
            hourly.len()
        ),
    );

    Ok(Dashboard {
        title: DASHBOARD_TITLE,
        generated_at: now,
        trend,
        seasonal,
        hourly,
        findings,
    })
}

fn seasonal_year(peak: YearPeak<SeasonalSummary>) -> Result<SeasonalYear, DashboardError> {
    let year_total: u64 = peak.rows.iter().map(|s| s.total).sum();
    let seasons = labels::label_seasonal(&peak.rows)?
        .into_iter()
        .map(|season| SeasonShare {
            share_pct: percentage(season.summary.total, year_total),
            season,
        })
        .collect();

    Ok(SeasonalYear {
        year: peak.year,
        year_label: year_label(peak.year.index())?,
        seasons,
        peak_index: peak.peak_index,
    })
}

fn hourly_year(peak: YearPeak<HourlySummary>) -> Result<HourlyYear, DashboardError> {
    Ok(HourlyYear {
        year: peak.year,
        year_label: year_label(peak.year.index())?,
        hours: peak.rows,
        peak_index: peak.peak_index,
    })
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// `17` → `"5:00 PM"`, `0` → `"12:00 AM"`.
pub fn hour_label(hour: u8) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let twelve = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", twelve, suffix)
}

/// Joins year labels as "2011", "2011 and 2012", "2011, 2012 and 2013".
fn join_years(years: &[&str]) -> String {
    match years {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn trend_findings(trend: &TrendSection) -> Result<Vec<String>, DashboardError> {
    let mut findings = Vec::new();

    let mut by_year: BTreeMap<Year, u64> = BTreeMap::new();
    for month in &trend.months {
        *by_year.entry(month.point.summary.year).or_insert(0) += month.point.summary.total;
    }
    let totals: Vec<(Year, u64)> = by_year.into_iter().collect();
    if let [(first_year, first), .., (last_year, last)] = totals.as_slice() {
        let direction = if last > first {
            "an increase"
        } else if last < first {
            "a decrease"
        } else {
            "no change"
        };
        // No relative change can be stated from a zero base.
        let change = if *first == 0 {
            format!("{} to {} rentals", first, last)
        } else {
            format!(
                "{} to {} rentals, {:+.1}%",
                first,
                last,
                percentage(*last, *first) - 100.0
            )
        };
        findings.push(format!(
            "The trend of bike rentals experienced {} between {} and {} ({}).",
            direction,
            year_label(first_year.index())?,
            year_label(last_year.index())?,
            change
        ));
    }

    // The vertex of a downward quadratic on the month axis reads as the
    // month the fitted curve peaks in.
    if trend.axis == TrendAxis::MonthOfYear && trend.degree == 2 {
        let (a, b) = (trend.coefficients[0], trend.coefficients[1]);
        if a < 0.0 {
            let vertex = (-b / (2.0 * a)).round().clamp(1.0, 12.0) as u8;
            findings.push(vertex_finding(vertex)?);
        }
    }

    Ok(findings)
}

/// Describes the month a downward fitted curve peaks in. Only a peak in
/// April–September is called mid-year.
fn vertex_finding(vertex: u8) -> Result<String, DashboardError> {
    let month = month_label(vertex)?;
    if (4..=9).contains(&vertex) {
        Ok(format!(
            "Rentals tend to peak in the middle of the year: the fitted curve tops out around {}, \
             rising from the start of the year and falling towards its end.",
            month
        ))
    } else {
        Ok(format!("The fitted curve of monthly rentals tops out around {}.", month))
    }
}

fn season_findings(seasonal: &[SeasonalYear]) -> Vec<String> {
    let mut findings = Vec::new();

    let peak_names: Vec<&str> = seasonal
        .iter()
        .map(|y| y.seasons[y.peak_index].season.label)
        .collect();
    if let Some(first) = peak_names.first() {
        let years: Vec<&str> = seasonal.iter().map(|y| y.year_label).collect();
        if peak_names.iter().all(|name| name == first) {
            findings.push(format!(
                "The highest bike rentals occurred during {}, in {}.",
                first.to_lowercase(),
                join_years(&years)
            ));
        } else {
            for year in seasonal {
                findings.push(format!(
                    "The highest bike rentals in {} occurred during {}.",
                    year.year_label,
                    year.seasons[year.peak_index].season.label.to_lowercase()
                ));
            }
        }
    }

    for year in seasonal {
        let mut ranked: Vec<&SeasonShare> = year.seasons.iter().collect();
        ranked.sort_by(|a, b| b.season.summary.total.cmp(&a.season.summary.total));
        let order: Vec<&str> = ranked.iter().map(|s| s.season.label).collect();
        findings.push(format!(
            "Season ranking in {}, highest to lowest: {}.",
            year.year_label,
            order.join(", ")
        ));
    }

    findings
}

fn hour_findings(hourly: &[HourlyYear]) -> Vec<String> {
    let peak_hours: Vec<u8> = hourly.iter().map(|y| y.hours[y.peak_index].hour).collect();
    let Some(&first) = peak_hours.first() else {
        return Vec::new();
    };

    if peak_hours.iter().all(|&h| h == first) {
        let years: Vec<&str> = hourly.iter().map(|y| y.year_label).collect();
        vec![format!(
            "The highest average number of bike rentals per hour occurred at {}, in {}.",
            hour_label(first),
            join_years(&years)
        )]
    } else {
        hourly
            .iter()
            .map(|y| {
                format!(
                    "The highest average number of bike rentals per hour in {} occurred at {}.",
                    y.year_label,
                    hour_label(y.hours[y.peak_index].hour)
                )
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_json(dashboard: &Dashboard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(dashboard)
}

pub fn render_text<W: Write>(dashboard: &Dashboard, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", dashboard.title)?;
    writeln!(out, "{}", "=".repeat(dashboard.title.len()))?;
    writeln!(out, "Generated {}", dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;

    let axis = match dashboard.trend.axis {
        TrendAxis::MonthOfYear => "month of year",
        TrendAxis::Continuous => "continuous month index",
    };
    writeln!(
        out,
        "Number of Bike Rentals per Month (polynomial fit, degree {}, {} axis)",
        dashboard.trend.degree,
        axis
    )?;
    for month in &dashboard.trend.months {
        writeln!(
            out,
            "  {:<10} {:>8}   fit {:>10.1}",
            month.label, month.point.summary.total, month.point.fitted_value
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Percentage of Bike Rentals per Season")?;
    for year in &dashboard.seasonal {
        writeln!(out, "  {}", year.year_label)?;
        for (i, share) in year.seasons.iter().enumerate() {
            let marker = if i == year.peak_index { " *" } else { "" };
            writeln!(
                out,
                "    {:<7} {:>8} {:>6.1}%{}",
                share.season.label, share.season.summary.total, share.share_pct, marker
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Average Number of Bike Rentals per Hour")?;
    for year in &dashboard.hourly {
        writeln!(out, "  {}   {:>8} {:>6} {:>6}", year.year_label, "mean", "max", "min")?;
        for (i, h) in year.hours.iter().enumerate() {
            let marker = if i == year.peak_index { " *" } else { "" };
            writeln!(
                out,
                "    {:02}:00 {:>8.1} {:>6} {:>6}{}",
                h.hour, h.mean, h.max, h.min, marker
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Findings")?;
    for finding in &dashboard.findings {
        writeln!(out, "  - {}", finding)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
