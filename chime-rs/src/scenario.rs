use serde::Deserialize;
use tracing::info;

use crate::admissions::{AdmissionsBasis, AdmissionsProjection, project_admissions};
use crate::census::{CensusProjection, project_census};
use crate::error::{ModelError, non_negative};
use crate::parameters::{DerivedParameters, ScenarioInputs, derive_parameters};
use crate::schedule::{PolicyPhase, PolicySchedule, Transmission};
use crate::simulation::{SimulationResult, simulate};

/// A future change in social contact, lasting `days` days.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Intervention {
    pub relative_contact_rate: f64,
    pub days: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    #[serde(flatten)]
    pub inputs: ScenarioInputs,
    pub admissions_basis: AdmissionsBasis,
    /// Daily multiplicative decay of beta. Ignored when interventions are set.
    pub beta_decay: f64,
    /// Phases following the current contact rate, in order. The current rate
    /// holds for `current_phase_days` before the first one starts.
    pub interventions: Vec<Intervention>,
    pub current_phase_days: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub parameters: DerivedParameters,
    pub simulation: SimulationResult,
    pub admissions: AdmissionsProjection,
    pub census: CensusProjection,
}

impl Scenario {
    pub fn new(inputs: ScenarioInputs) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    /// How beta evolves for these inputs.
    pub fn transmission(&self, parameters: &DerivedParameters) -> Result<Transmission, ModelError> {
        let n_days = self.inputs.n_days;
        if !self.interventions.is_empty() {
            let mut phases = vec![PolicyPhase {
                beta: parameters.beta,
                days: self.current_phase_days,
            }];
            for intervention in &self.interventions {
                phases.push(PolicyPhase {
                    beta: parameters.beta_for_contact_rate(intervention.relative_contact_rate)?,
                    days: intervention.days,
                });
            }
            return Transmission::scheduled(parameters.gamma, PolicySchedule::new(phases)?);
        }
        if non_negative("beta_decay", self.beta_decay)? > 0.0 {
            let schedule = PolicySchedule::decaying(parameters.beta, self.beta_decay, n_days)?;
            return Transmission::scheduled(parameters.gamma, schedule);
        }
        Ok(parameters.rates().into())
    }

    pub fn run(&self) -> Result<ScenarioReport, ModelError> {
        let parameters = derive_parameters(&self.inputs)?;
        info!(
            beta = parameters.beta,
            gamma = parameters.gamma,
            r_t = parameters.r_t,
            initial_infections = parameters.initial_infections,
            "derived parameters"
        );

        let transmission = self.transmission(&parameters)?;
        let simulation = simulate(parameters.initial_state, &transmission, self.inputs.n_days)?;
        let admissions = project_admissions(
            &simulation,
            self.inputs.rates,
            self.inputs.market_share,
            self.admissions_basis,
        )?;
        let census = project_census(&admissions, self.inputs.length_of_stay)?;

        info!(n_days = self.inputs.n_days, "scenario projected");
        Ok(ScenarioReport {
            parameters,
            simulation,
            admissions,
            census,
        })
    }
}
