use chime::Scenario;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Parameters {
    #[serde(flatten)]
    pub scenario: Scenario,
    /// Rows kept in the admissions table; defaults to ten days short of the
    /// horizon.
    pub chart_days: Option<i64>,
}

impl Parameters {
    pub fn chart_days(&self) -> i64 {
        self.chart_days
            .unwrap_or(self.scenario.inputs.n_days as i64 - 10)
    }
}
