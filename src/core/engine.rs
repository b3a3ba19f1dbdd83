use super::types::{HORIZON_MONTHS, ProjectionResult, Scenario, Series};

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Future value of a monthly contribution stream plus a lump sum, for every
/// month in `0..=months`.
///
/// A zero rate takes the linear branch so the output is exactly
/// `initial + monthly * m`. Otherwise the closed form
/// `monthly * ((1+r)^m - 1) / r + initial * (1+r)^m` is evaluated per month,
/// with `exp_m1`/`ln_1p` keeping the annuity term accurate for very small `r`.
pub fn calc_series(monthly: f64, initial: f64, annual_rate_percent: f64, months: u32) -> Series {
    let r = monthly_rate(annual_rate_percent);

    (0..=months)
        .map(|m| {
            let m = f64::from(m);
            if r == 0.0 {
                initial + monthly * m
            } else {
                let log_growth = m * r.ln_1p();
                let annuity = log_growth.exp_m1() / r;
                monthly * annuity + initial * log_growth.exp()
            }
        })
        .collect()
}

/// Cumulative price multiplier after `months` of monthly-compounded inflation.
/// Below 1 under deflation; exactly 1 at month 0.
pub fn inflation_factor(inflation_rate_percent: f64, months: u32) -> f64 {
    if months == 0 {
        return 1.0;
    }
    (1.0 + monthly_rate(inflation_rate_percent)).powf(f64::from(months))
}

/// Deflates a nominal series into today's purchasing power, month by month.
pub fn calc_real_series(nominal: &Series, inflation_rate_percent: f64) -> Series {
    nominal
        .iter()
        .zip(0u32..)
        .map(|(value, m)| value / inflation_factor(inflation_rate_percent, m))
        .collect()
}

/// Nominal and real series for every rate of the scenario over the fixed
/// ten-year horizon.
pub fn run_projection(scenario: &Scenario) -> ProjectionResult {
    let nominal_series_by_rate: Vec<Series> = scenario
        .rates()
        .iter()
        .map(|&rate| {
            calc_series(
                scenario.monthly_contribution(),
                scenario.initial_amount(),
                rate,
                HORIZON_MONTHS,
            )
        })
        .collect();

    let real_series_by_rate = nominal_series_by_rate
        .iter()
        .map(|series| calc_real_series(series, scenario.inflation_rate_percent()))
        .collect();

    ProjectionResult {
        scenario: scenario.clone(),
        horizon_months: HORIZON_MONTHS,
        nominal_series_by_rate,
        real_series_by_rate,
    }
}
