/// Bike-sharing rental dashboard.
///
/// Loads the daily and hourly rental datasets, aggregates them into
/// seasonal, monthly and hourly summaries, fits a polynomial trend to the
/// monthly totals, labels everything for display and packages the result
/// as a `report::Dashboard`.
///
/// The whole pipeline runs once per invocation with no state kept between
/// runs; any error aborts the run.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod labels;
pub mod logging;
pub mod model;
pub mod report;

use crate::config::DashboardConfig;
use crate::ingest::csv_source;
use crate::model::DashboardError;
use crate::report::Dashboard;

/// Loads both datasets named in `config` and builds the dashboard.
pub fn run(config: &DashboardConfig) -> Result<Dashboard, DashboardError> {
    let daily = csv_source::load_daily(&config.data.daily_path)?;
    let hourly = csv_source::load_hourly(&config.data.hourly_path)?;
    report::build_dashboard(&daily, &hourly, &config.trend)
}
