use super::types::{DEFAULT_INFLATION_PERCENT, MAX_RATES, Scenario, ScenarioError};

/// Raw form fields as typed by the user, before any numeric parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioInput {
    pub monthly: Option<String>,
    pub initial: Option<String>,
    pub inflation: Option<String>,
    pub rates: Vec<Option<String>>,
}

impl ScenarioInput {
    /// Lenient parse of the form fields.
    ///
    /// Amounts that are missing or unusable count as 0, inflation falls back to
    /// the default, and rate fields that are not a number >= 0 are dropped.
    /// `NoValidRates` means nothing should be computed or rendered.
    pub fn parse(&self) -> Result<Scenario, ScenarioError> {
        if self.rates.len() > MAX_RATES {
            return Err(ScenarioError::TooManyRates(self.rates.len()));
        }

        let monthly = parse_amount(self.monthly.as_deref());
        let initial = parse_amount(self.initial.as_deref());
        let inflation = parse_inflation(self.inflation.as_deref());
        let rates: Vec<f64> = self
            .rates
            .iter()
            .filter_map(|field| parse_rate(field.as_deref()))
            .collect();

        Scenario::new(monthly, initial, inflation, rates)
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_amount(raw: Option<&str>) -> f64 {
    match parse_number(raw) {
        Some(v) if v >= 0.0 => v,
        Some(v) => {
            tracing::debug!(value = v, "negative amount treated as 0");
            0.0
        }
        None => 0.0,
    }
}

fn parse_inflation(raw: Option<&str>) -> f64 {
    // Monthly factor must stay positive.
    match parse_number(raw) {
        Some(v) if v > -1200.0 => v,
        _ => {
            if raw.is_some_and(|s| !s.trim().is_empty()) {
                tracing::debug!(raw = ?raw, "unusable inflation input, using default");
            }
            DEFAULT_INFLATION_PERCENT
        }
    }
}

fn parse_rate(raw: Option<&str>) -> Option<f64> {
    parse_number(raw).filter(|v| *v >= 0.0)
}
