/// Dataset ingestion.
///
/// Submodules:
/// - `csv_source` — reads the daily and hourly bike-sharing CSV exports.

pub mod csv_source;
