mod engine;
mod format;
mod report;
mod scenario;
mod types;

pub use engine::{calc_real_series, calc_series, inflation_factor, run_projection};
pub use format::{format_full, format_short, format_signed_full, format_signed_short};
pub use report::{
    ChartModel, InflationBreakdown, PeriodTable, ProjectionReport, Summary, build_report, chart,
    inflation_breakdown, period_table, summary,
};
pub use scenario::ScenarioInput;
pub use types::{
    Checkpoint, DEFAULT_INFLATION_PERCENT, HORIZON_MONTHS, MAX_RATES, ProjectionResult,
    RATE_COLORS, Scenario, ScenarioError, Series,
};
