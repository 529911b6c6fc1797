/// Aggregation and derived metrics for the dashboard.
///
/// Submodules:
/// - `groupings` — seasonal/monthly totals, hourly statistics, per-year partitions.
/// - `trend`     — least-squares polynomial fit over the monthly totals.
/// - `peaks`     — first-wins argmax used to highlight the busiest row per year.

pub mod groupings;
pub mod peaks;
pub mod trend;
