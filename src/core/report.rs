use serde::Serialize;

use super::engine::inflation_factor;
use super::format::{
    format_full, format_percent, format_short, format_signed_full, format_signed_short,
};
use super::types::{Checkpoint, ProjectionResult, Scenario, rate_color};

const PRINCIPAL_COLOR: &str = "#94a3b8";
const Y_TICKS: u32 = 5;
const Y_HEADROOM: f64 = 1.05;
const X_TICK_STEP_MONTHS: u32 = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub rate: f64,
    pub label: String,
    pub color: &'static str,
    pub value: f64,
    pub value_display: String,
    pub profit: f64,
    pub profit_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub horizon_months: u32,
    pub principal: f64,
    pub principal_display: String,
    pub principal_note: String,
    pub cards: Vec<SummaryCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationCard {
    pub rate: f64,
    pub label: String,
    pub color: &'static str,
    pub principal: f64,
    pub principal_display: String,
    pub nominal_value: f64,
    pub nominal_value_display: String,
    pub nominal_profit: f64,
    pub nominal_profit_display: String,
    pub real_value: f64,
    pub real_value_display: String,
    pub real_profit: f64,
    pub real_profit_display: String,
    pub is_gain: bool,
    pub approx_real_rate: f64,
    pub approx_real_rate_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationBreakdown {
    pub checkpoint: Checkpoint,
    pub month: u32,
    pub label: &'static str,
    pub inflation_rate_percent: f64,
    pub inflation_factor: f64,
    pub inflation_factor_display: String,
    pub cards: Vec<InflationCard>,
    pub footnote: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCell {
    pub rate: f64,
    pub color: &'static str,
    pub value: f64,
    pub value_display: String,
    pub profit: f64,
    pub profit_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    pub checkpoint: Checkpoint,
    pub month: u32,
    pub label: &'static str,
    pub principal: f64,
    pub principal_display: String,
    pub cells: Vec<PeriodCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTable {
    pub headers: Vec<String>,
    pub rows: Vec<PeriodRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub month: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthTick {
    pub month: u32,
    pub label: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Faded,
    Dashed,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
    pub style: LineStyle,
}

/// One rate's lines. The browser reads the actual values from the series at
/// `series_index` of the projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLine {
    pub series_index: usize,
    pub rate: f64,
    pub color: &'static str,
    pub checkpoint_points: Vec<ChartPoint>,
}

/// Everything needed to draw the growth chart at any pixel size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub horizon_months: u32,
    pub y_max: f64,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<MonthTick>,
    pub markers: Vec<MonthTick>,
    pub principal_line: [ChartPoint; 2],
    pub principal_color: &'static str,
    pub lines: Vec<ChartLine>,
    pub legend: Vec<LegendEntry>,
}

/// Full response for one run: the raw projection plus every derived view.
/// All three inflation breakdowns are included so switching the period tab
/// never goes back to the engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub projection: ProjectionResult,
    pub summary: Summary,
    pub inflation: Vec<InflationBreakdown>,
    pub table: PeriodTable,
    pub chart: ChartModel,
}

fn rate_label(rate: f64) -> String {
    format!("{} p.a.", format_percent(rate))
}

pub fn summary(result: &ProjectionResult) -> Summary {
    let scenario = &result.scenario;
    let months = result.horizon_months;
    let principal = scenario.principal_at(months);

    let cards = scenario
        .rates()
        .iter()
        .enumerate()
        .map(|(i, &rate)| {
            let value = result.nominal_at(i, months);
            let profit = value - principal;
            SummaryCard {
                rate,
                label: rate_label(rate),
                color: rate_color(i),
                value,
                value_display: format_short(value),
                profit,
                profit_display: format_signed_short(profit),
            }
        })
        .collect();

    Summary {
        horizon_months: months,
        principal,
        principal_display: format_short(principal),
        principal_note: format!(
            "initial {} + monthly {} x {months} months",
            format_short(scenario.initial_amount()),
            format_short(scenario.monthly_contribution()),
        ),
        cards,
    }
}

/// Nominal versus inflation-adjusted outcome of every rate at one checkpoint.
pub fn inflation_breakdown(result: &ProjectionResult, checkpoint: Checkpoint) -> InflationBreakdown {
    let scenario = &result.scenario;
    let month = checkpoint.month();
    let inflation = scenario.inflation_rate_percent();
    let principal = scenario.principal_at(month);
    let factor = inflation_factor(inflation, month);

    let cards = scenario
        .rates()
        .iter()
        .enumerate()
        .map(|(i, &rate)| {
            let nominal_value = result.nominal_at(i, month);
            let real_value = result.real_at(i, month);
            let nominal_profit = nominal_value - principal;
            let real_profit = real_value - principal;
            let approx_real_rate = rate - inflation;
            InflationCard {
                rate,
                label: rate_label(rate),
                color: rate_color(i),
                principal,
                principal_display: format_full(principal),
                nominal_value,
                nominal_value_display: format_full(nominal_value),
                nominal_profit,
                nominal_profit_display: format_signed_full(nominal_profit),
                real_value,
                real_value_display: format_full(real_value),
                real_profit,
                real_profit_display: format_signed_full(real_profit),
                is_gain: real_profit >= 0.0,
                approx_real_rate,
                approx_real_rate_display: format!(
                    "{approx_real_rate:.1}% p.a. ({} - {})",
                    format_percent(rate),
                    format_percent(inflation)
                ),
            }
        })
        .collect();

    InflationBreakdown {
        checkpoint,
        month,
        label: checkpoint.label(),
        inflation_rate_percent: inflation,
        inflation_factor: factor,
        inflation_factor_display: format!("x{factor:.3}"),
        cards,
        footnote: format!(
            "Real value = nominal value / (1 + {}/12)^{month}; real gain = real value - principal",
            format_percent(inflation)
        ),
    }
}

pub fn period_table(result: &ProjectionResult) -> PeriodTable {
    let scenario = &result.scenario;

    let mut headers = vec!["Period".to_string(), "Principal".to_string()];
    headers.extend(scenario.rates().iter().map(|&r| rate_label(r)));

    let rows = Checkpoint::ALL
        .into_iter()
        .map(|checkpoint| {
            let month = checkpoint.month();
            let principal = scenario.principal_at(month);
            let cells = scenario
                .rates()
                .iter()
                .enumerate()
                .map(|(i, &rate)| {
                    let value = result.nominal_at(i, month);
                    let profit = value - principal;
                    PeriodCell {
                        rate,
                        color: rate_color(i),
                        value,
                        value_display: format_full(value),
                        profit,
                        profit_display: format_signed_short(profit),
                    }
                })
                .collect();
            PeriodRow {
                checkpoint,
                month,
                label: checkpoint.label(),
                principal,
                principal_display: format_full(principal),
                cells,
            }
        })
        .collect();

    PeriodTable { headers, rows }
}

fn chart_y_max(result: &ProjectionResult) -> f64 {
    let peak = result
        .nominal_series_by_rate
        .iter()
        .chain(&result.real_series_by_rate)
        .flat_map(|s| s.iter())
        .chain([result.scenario.principal_at(result.horizon_months)])
        .fold(0.0_f64, f64::max);

    if peak > 0.0 { peak * Y_HEADROOM } else { 1.0 }
}

pub fn chart(result: &ProjectionResult) -> ChartModel {
    let scenario: &Scenario = &result.scenario;
    let horizon = result.horizon_months;
    let y_max = chart_y_max(result);

    let y_ticks = (0..=Y_TICKS)
        .map(|i| {
            let value = y_max / f64::from(Y_TICKS) * f64::from(i);
            AxisTick {
                value,
                label: format_short(value),
            }
        })
        .collect();

    let x_ticks = (0..=horizon)
        .step_by(X_TICK_STEP_MONTHS as usize)
        .map(|month| MonthTick {
            month,
            label: format!("{}y", month / 12),
        })
        .collect();

    let markers = Checkpoint::ALL
        .into_iter()
        .filter(|c| c.month() <= horizon)
        .map(|c| MonthTick {
            month: c.month(),
            label: c.label().to_string(),
        })
        .collect();

    let lines = scenario
        .rates()
        .iter()
        .enumerate()
        .map(|(i, &rate)| ChartLine {
            series_index: i,
            rate,
            color: rate_color(i),
            checkpoint_points: Checkpoint::ALL
                .into_iter()
                .filter(|c| c.month() <= horizon)
                .map(|c| ChartPoint {
                    month: c.month(),
                    value: result.nominal_at(i, c.month()),
                })
                .collect(),
        })
        .collect();

    let mut legend = Vec::with_capacity(scenario.rates().len() * 2 + 1);
    for (i, &rate) in scenario.rates().iter().enumerate() {
        legend.push(LegendEntry {
            label: format!("{} (nominal)", rate_label(rate)),
            color: rate_color(i),
            style: LineStyle::Solid,
        });
        legend.push(LegendEntry {
            label: format!("{} (real)", rate_label(rate)),
            color: rate_color(i),
            style: LineStyle::Faded,
        });
    }
    legend.push(LegendEntry {
        label: "Principal".to_string(),
        color: PRINCIPAL_COLOR,
        style: LineStyle::Dashed,
    });

    ChartModel {
        horizon_months: horizon,
        y_max,
        y_ticks,
        x_ticks,
        markers,
        principal_line: [
            ChartPoint {
                month: 0,
                value: scenario.principal_at(0),
            },
            ChartPoint {
                month: horizon,
                value: scenario.principal_at(horizon),
            },
        ],
        principal_color: PRINCIPAL_COLOR,
        lines,
        legend,
    }
}

pub fn build_report(result: ProjectionResult) -> ProjectionReport {
    ProjectionReport {
        summary: summary(&result),
        inflation: Checkpoint::ALL
            .into_iter()
            .map(|c| inflation_breakdown(&result, c))
            .collect(),
        table: period_table(&result),
        chart: chart(&result),
        projection: result,
    }
}
