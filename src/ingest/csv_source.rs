/// Bike-sharing CSV loader
///
/// Reads the daily (`day.csv`) and hourly (`hour.csv`) exports of the UCI
/// bike-sharing dataset. Only the columns the dashboard uses are decoded;
/// everything else in the file (`dteday`, `temp`, `weathersit`, ...) is
/// ignored. The expected columns are checked against the header row before
/// any data row is read.

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::logging::{self, Stage};
use crate::model::{CodeKind, DailyRecord, DashboardError, HourlyRecord, Season, Year};

// ---------------------------------------------------------------------------
// Expected columns
// ---------------------------------------------------------------------------

/// Columns the daily dataset must provide.
pub const DAILY_COLUMNS: &[&str] = &["yr", "season", "mnth", "cnt"];

/// Columns the hourly dataset must provide.
pub const HOURLY_COLUMNS: &[&str] = &["yr", "hr", "cnt"];

// ---------------------------------------------------------------------------
// Raw row shapes
// ---------------------------------------------------------------------------

// Codes are read as signed integers so an out-of-range code surfaces as
// `UnknownCode` rather than an opaque parse failure.

#[derive(Debug, Deserialize)]
struct DailyRow {
    yr: i64,
    season: i64,
    mnth: i64,
    cnt: u64,
}

#[derive(Debug, Deserialize)]
struct HourlyRow {
    yr: i64,
    hr: i64,
    cnt: u64,
}

impl DailyRow {
    fn into_record(self) -> Result<DailyRecord, DashboardError> {
        Ok(DailyRecord {
            year: Year::from_index(small_code(CodeKind::Year, self.yr)?)?,
            season: Season::from_code(small_code(CodeKind::Season, self.season)?)?,
            month: ranged_code(CodeKind::Month, self.mnth, 1, 12)?,
            count: self.cnt,
        })
    }
}

impl HourlyRow {
    fn into_record(self) -> Result<HourlyRecord, DashboardError> {
        Ok(HourlyRecord {
            year: Year::from_index(small_code(CodeKind::Year, self.yr)?)?,
            hour: ranged_code(CodeKind::Hour, self.hr, 0, 23)?,
            count: self.cnt,
        })
    }
}

fn small_code(kind: CodeKind, raw: i64) -> Result<u8, DashboardError> {
    u8::try_from(raw).map_err(|_| DashboardError::UnknownCode { kind, code: raw })
}

fn ranged_code(kind: CodeKind, raw: i64, min: u8, max: u8) -> Result<u8, DashboardError> {
    let code = small_code(kind, raw)?;
    if code < min || code > max {
        return Err(DashboardError::UnknownCode { kind, code: raw });
    }
    Ok(code)
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

/// Load the daily dataset from a file path.
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>, DashboardError> {
    let source = path.display().to_string();
    let file = open(path)?;
    load_daily_from_reader(BufReader::new(file), &source)
}

/// Load the hourly dataset from a file path.
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>, DashboardError> {
    let source = path.display().to_string();
    let file = open(path)?;
    load_hourly_from_reader(BufReader::new(file), &source)
}

/// Load daily records from any reader. `source` names the input in errors
/// and log lines.
pub fn load_daily_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<DailyRecord>, DashboardError> {
    let rows: Vec<DailyRow> = read_rows(reader, source, DAILY_COLUMNS)?;
    let records = rows
        .into_iter()
        .map(DailyRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    logging::info(
        Stage::Loader,
        Some(source),
        &format!("Loaded {} daily records", records.len()),
    );
    Ok(records)
}

/// Load hourly records from any reader.
pub fn load_hourly_from_reader<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<HourlyRecord>, DashboardError> {
    let rows: Vec<HourlyRow> = read_rows(reader, source, HOURLY_COLUMNS)?;
    let records = rows
        .into_iter()
        .map(HourlyRow::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    logging::info(
        Stage::Loader,
        Some(source),
        &format!("Loaded {} hourly records", records.len()),
    );
    Ok(records)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<File, DashboardError> {
    File::open(path).map_err(|e| {
        DashboardError::unavailable(path.display().to_string(), format!("failed to open: {}", e))
    })
}

/// Reads every row of a headered CSV into `T`, after checking that the
/// header names all `required` columns. The first bad row aborts the load.
fn read_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    source: &str,
    required: &[&str],
) -> Result<Vec<T>, DashboardError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DashboardError::unavailable(source, format!("failed to read header: {}", e)))?
        .clone();
    ensure_required_columns(&headers, required, source)?;

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.deserialize::<T>().enumerate() {
        let line = row_idx + 2; // 1-based, after the header
        let row = result.map_err(|e| {
            DashboardError::unavailable(source, format!("row {}: {}", line, e))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn ensure_required_columns(
    headers: &StringRecord,
    required: &[&str],
    source: &str,
) -> Result<(), DashboardError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::unavailable(
            source,
            format!("missing expected column(s): {}", missing.join(", ")),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
