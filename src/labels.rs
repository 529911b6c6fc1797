/// Display labels for month, season and year codes.
///
/// The lookup tables are the single source of truth for how codes are shown
/// on the dashboard; other modules should go through the functions here
/// rather than formatting codes themselves.

use serde::Serialize;

use crate::logging::{self, Stage};
use crate::model::{CodeKind, DashboardError, MonthlySummary, MonthlyTrendPoint, SeasonalSummary};

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Three-letter month labels, indexed by month number - 1.
pub static MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Season names, indexed by season code - 1.
pub static SEASON_NAMES: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

/// Calendar years, indexed by year-index.
pub static YEAR_LABELS: [&str; 2] = ["2011", "2012"];

fn lookup(table: &'static [&'static str], kind: CodeKind, code: i64, first: i64) -> Result<&'static str, DashboardError> {
    usize::try_from(code - first)
        .ok()
        .and_then(|i| table.get(i).copied())
        .ok_or(DashboardError::UnknownCode { kind, code })
}

/// `1` → `"Jan"` ... `12` → `"Dec"`.
pub fn month_label(month: u8) -> Result<&'static str, DashboardError> {
    lookup(&MONTH_LABELS, CodeKind::Month, month as i64, 1)
}

/// `1` → `"Spring"` ... `4` → `"Winter"`.
pub fn season_label(code: u8) -> Result<&'static str, DashboardError> {
    lookup(&SEASON_NAMES, CodeKind::Season, code as i64, 1)
}

/// `0` → `"2011"`, `1` → `"2012"`.
pub fn year_label(index: u8) -> Result<&'static str, DashboardError> {
    lookup(&YEAR_LABELS, CodeKind::Year, index as i64, 0)
}

/// `"{month}, {year}"`, e.g. `"Jan, 2011"`.
pub fn month_year_label(summary: &MonthlySummary) -> Result<String, DashboardError> {
    Ok(format!(
        "{}, {}",
        month_label(summary.month)?,
        year_label(summary.year.index())?
    ))
}

// ---------------------------------------------------------------------------
// Labelled rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledMonth {
    pub label: String,
    pub point: MonthlyTrendPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledSeason {
    pub label: &'static str,
    pub summary: SeasonalSummary,
}

/// Attaches a `"{month}, {year}"` label to every trend row.
pub fn label_monthly(points: &[MonthlyTrendPoint]) -> Result<Vec<LabelledMonth>, DashboardError> {
    let labelled = points
        .iter()
        .map(|point| {
            Ok(LabelledMonth {
                label: month_year_label(&point.summary)?,
                point: *point,
            })
        })
        .collect::<Result<Vec<_>, DashboardError>>();

    if let Err(ref e) = labelled {
        logging::error(Stage::Formatter, None, &e.to_string());
    }
    labelled
}

/// Attaches the season name to every seasonal row.
pub fn label_seasonal(rows: &[SeasonalSummary]) -> Result<Vec<LabelledSeason>, DashboardError> {
    rows.iter()
        .map(|summary| {
            Ok(LabelledSeason {
                label: season_label(summary.season.code())?,
                summary: *summary,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
