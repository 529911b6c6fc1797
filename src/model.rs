/// Core data types for the bike-sharing dashboard.
///
/// This module defines the shared domain model imported by all other modules:
/// the raw daily/hourly records, the derived summary rows, the small code
/// enums (year, season) and the error taxonomy. It contains no I/O.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Observed calendar year. The datasets encode it as a year-index:
/// 0 = 2011, 1 = 2012.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Year {
    Y2011,
    Y2012,
}

impl Year {
    /// Decodes a dataset year-index.
    pub fn from_index(index: u8) -> Result<Self, DashboardError> {
        match index {
            0 => Ok(Year::Y2011),
            1 => Ok(Year::Y2012),
            other => Err(DashboardError::UnknownCode {
                kind: CodeKind::Year,
                code: other as i64,
            }),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Year::Y2011 => 0,
            Year::Y2012 => 1,
        }
    }
}

/// Meteorological season as coded in the daily dataset (1–4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_code(code: u8) -> Result<Self, DashboardError> {
        match code {
            1 => Ok(Season::Spring),
            2 => Ok(Season::Summer),
            3 => Ok(Season::Fall),
            4 => Ok(Season::Winter),
            other => Err(DashboardError::UnknownCode {
                kind: CodeKind::Season,
                code: other as i64,
            }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Source records
// ---------------------------------------------------------------------------

/// One row of the daily dataset, reduced to the columns the dashboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    pub year: Year,
    pub season: Season,
    pub month: u8, // 1–12
    pub count: u64,
}

/// One row of the hourly dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyRecord {
    pub year: Year,
    pub hour: u8, // 0–23
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Derived summaries
// ---------------------------------------------------------------------------

/// Total rentals for one (year, season) group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalSummary {
    pub year: Year,
    pub season: Season,
    pub total: u64,
}

/// Total rentals for one (year, month) group, before fitting and labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: Year,
    pub month: u8,
    pub total: u64,
}

/// A monthly total with its value on the fitted trend curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTrendPoint {
    pub summary: MonthlySummary,
    /// The x-position the fit used for this row.
    pub x: f64,
    pub fitted_value: f64,
}

/// Mean/max/min rentals for one (year, hour-of-day) group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlySummary {
    pub year: Year,
    pub hour: u8,
    pub mean: f64,
    pub max: u64,
    pub min: u64,
    pub observations: usize,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Which lookup table a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Month,
    Season,
    Year,
    Hour,
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeKind::Month => write!(f, "month"),
            CodeKind::Season => write!(f, "season"),
            CodeKind::Year => write!(f, "year-index"),
            CodeKind::Hour => write!(f, "hour"),
        }
    }
}

/// Errors that abort a dashboard run. None of them are recovered from:
/// every chart depends on the whole pipeline succeeding.
#[derive(Debug, PartialEq)]
pub enum DashboardError {
    /// A dataset could not be read, lacks an expected column, or has a row
    /// that does not parse into the expected types.
    DataUnavailable { source: String, reason: String },
    /// Too few distinct x-values to determine the requested polynomial.
    InsufficientData { distinct_x: usize, required: usize },
    /// A code has no entry in its lookup table.
    UnknownCode { kind: CodeKind, code: i64 },
    /// The configuration file exists but could not be parsed.
    Config(String),
}

impl DashboardError {
    pub fn unavailable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::DataUnavailable {
            source: source.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::DataUnavailable { source, reason } => {
                write!(f, "Data unavailable from {}: {}", source, reason)
            }
            DashboardError::InsufficientData { distinct_x, required } => write!(
                f,
                "Insufficient data for trend fit: {} distinct x-values, need at least {}",
                distinct_x, required
            ),
            DashboardError::UnknownCode { kind, code } => {
                write!(f, "Unknown {} code: {}", kind, code)
            }
            DashboardError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {}
