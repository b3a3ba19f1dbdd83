use serde::Serialize;
use thiserror::Error;

/// Number of months every projection covers (10 years).
pub const HORIZON_MONTHS: u32 = 120;

/// Upper bound on the number of rates compared side by side.
pub const MAX_RATES: usize = 3;

pub const DEFAULT_INFLATION_PERCENT: f64 = 2.5;

/// Display colors, one per rate slot.
pub const RATE_COLORS: [&str; MAX_RATES] = ["#4f46e5", "#10b981", "#f59e0b"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("no valid annual rate supplied")]
    NoValidRates,
    #[error("at most 3 rates can be compared, got {0}")]
    TooManyRates(usize),
    #[error("{field} must be a finite amount >= 0, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("annual rate must be a finite percentage >= 0, got {0}")]
    InvalidRate(f64),
    #[error("inflation rate must be a finite percentage above -1200, got {0}")]
    InvalidInflation(f64),
}

/// User inputs for one projection run. Percentages are kept as entered
/// (5 means 5%).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    monthly_contribution: f64,
    initial_amount: f64,
    inflation_rate_percent: f64,
    rates: Vec<f64>,
}

impl Scenario {
    pub fn new(
        monthly_contribution: f64,
        initial_amount: f64,
        inflation_rate_percent: f64,
        rates: Vec<f64>,
    ) -> Result<Self, ScenarioError> {
        for (field, value) in [
            ("monthly contribution", monthly_contribution),
            ("initial amount", initial_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidAmount { field, value });
            }
        }

        if !inflation_rate_percent.is_finite() || inflation_rate_percent <= -1200.0 {
            return Err(ScenarioError::InvalidInflation(inflation_rate_percent));
        }

        if rates.is_empty() {
            return Err(ScenarioError::NoValidRates);
        }
        if rates.len() > MAX_RATES {
            return Err(ScenarioError::TooManyRates(rates.len()));
        }
        if let Some(&bad) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(ScenarioError::InvalidRate(bad));
        }

        Ok(Self {
            monthly_contribution,
            initial_amount,
            inflation_rate_percent,
            rates,
        })
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn initial_amount(&self) -> f64 {
        self.initial_amount
    }

    pub fn inflation_rate_percent(&self) -> f64 {
        self.inflation_rate_percent
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Amount paid in by `month`: the lump sum plus every contribution so far.
    pub fn principal_at(&self, month: u32) -> f64 {
        self.initial_amount + self.monthly_contribution * f64::from(month)
    }
}

/// Asset values indexed by elapsed month, starting at month 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<f64>);

impl Series {
    pub fn value_at(&self, month: u32) -> Option<f64> {
        self.0.get(month as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Output of one projection run. Replaced wholesale on the next run and
/// passed explicitly to whatever re-renders from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub scenario: Scenario,
    pub horizon_months: u32,
    pub nominal_series_by_rate: Vec<Series>,
    pub real_series_by_rate: Vec<Series>,
}

impl ProjectionResult {
    /// Nominal value for rate slot `index` at `month`, 0 when out of range.
    pub fn nominal_at(&self, index: usize, month: u32) -> f64 {
        self.nominal_series_by_rate
            .get(index)
            .and_then(|s| s.value_at(month))
            .unwrap_or(0.0)
    }

    pub fn real_at(&self, index: usize, month: u32) -> f64 {
        self.real_series_by_rate
            .get(index)
            .and_then(|s| s.value_at(month))
            .unwrap_or(0.0)
    }
}

/// Fixed horizons the summary views report on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Checkpoint {
    ThreeYears,
    FiveYears,
    TenYears,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 3] = [
        Checkpoint::ThreeYears,
        Checkpoint::FiveYears,
        Checkpoint::TenYears,
    ];

    pub fn month(self) -> u32 {
        match self {
            Checkpoint::ThreeYears => 36,
            Checkpoint::FiveYears => 60,
            Checkpoint::TenYears => 120,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Checkpoint::ThreeYears => "3 years",
            Checkpoint::FiveYears => "5 years",
            Checkpoint::TenYears => "10 years",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

pub fn rate_color(index: usize) -> &'static str {
    RATE_COLORS[index % RATE_COLORS.len()]
}
