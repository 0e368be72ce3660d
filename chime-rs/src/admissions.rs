use serde::Deserialize;
use tracing::debug;

use crate::error::ModelError;
use crate::parameters::PerCategory;
use crate::simulation::SimulationResult;

/// Which daily flow out of the SIR run is converted into admissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionsBasis {
    /// Day-over-day growth of the infected compartment, `I[t] - I[t-1]`.
    #[default]
    InfectedGrowth,
    /// People leaving the susceptible compartment, `S[t-1] - S[t]`.
    NewInfections,
}

impl AdmissionsBasis {
    fn flow(self, result: &SimulationResult, day: usize) -> f64 {
        let states = result.states();
        let (prev, curr) = (&states[day - 1], &states[day]);
        match self {
            Self::InfectedGrowth => curr.infected - prev.infected,
            Self::NewInfections => prev.susceptible - curr.susceptible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyAdmissions {
    pub day: usize,
    pub admits: PerCategory<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionsProjection {
    rows: Vec<DailyAdmissions>,
}

impl AdmissionsProjection {
    pub fn rows(&self) -> &[DailyAdmissions] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `limit` days; empty for a non-positive limit.
    pub fn head(&self, limit: i64) -> Self {
        let limit = usize::try_from(limit).unwrap_or(0);
        Self {
            rows: self.rows.iter().take(limit).copied().collect(),
        }
    }
}

/// Converts a simulation into daily admissions for the modeled hospital.
///
/// Day 0 has no history and is all zeros. Each later day is
/// `market_share * rate * flow`, floored at zero, where the flow is picked by
/// `basis`.
pub fn project_admissions(
    result: &SimulationResult,
    rates: PerCategory<f64>,
    market_share: f64,
    basis: AdmissionsBasis,
) -> Result<AdmissionsProjection, ModelError> {
    for (name, rate) in [
        ("hospitalization_rate", rates.hospitalized),
        ("icu_rate", rates.icu),
        ("ventilated_rate", rates.ventilated),
        ("market_share", market_share),
    ] {
        if !(rate.is_finite() && (0.0..=1.0).contains(&rate)) {
            return Err(ModelError::domain(name, rate, "within [0, 1]"));
        }
    }

    if result.is_empty() {
        return Ok(AdmissionsProjection::default());
    }

    let mut rows = Vec::with_capacity(result.len());
    rows.push(DailyAdmissions::default());
    for day in 1..result.len() {
        let flow = basis.flow(result, day);
        let admits = rates.map(|rate| (market_share * rate * flow).max(0.0));
        rows.push(DailyAdmissions { day, admits });
    }

    debug!(days = rows.len(), ?basis, "projected admissions");
    Ok(AdmissionsProjection { rows })
}
