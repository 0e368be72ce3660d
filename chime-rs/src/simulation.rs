use tracing::debug;

use crate::error::ModelError;
use crate::schedule::Transmission;
use crate::sir::{EpidemicState, sir_step};

/// Daily compartment sizes of one run, day 0 being the initial condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    states: Vec<EpidemicState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SirColumns {
    pub day: Vec<usize>,
    pub susceptible: Vec<f64>,
    pub infected: Vec<f64>,
    pub recovered: Vec<f64>,
}

impl SimulationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[EpidemicState] {
        &self.states
    }

    pub fn get(&self, day: usize) -> Option<&EpidemicState> {
        self.states.get(day)
    }

    pub fn first(&self) -> Option<&EpidemicState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&EpidemicState> {
        self.states.last()
    }

    pub fn to_tuples(&self) -> Vec<(f64, f64, f64)> {
        self.states.iter().map(EpidemicState::as_tuple).collect()
    }

    pub fn to_columns(&self) -> SirColumns {
        let mut columns = SirColumns::default();
        for (day, state) in self.states.iter().enumerate() {
            columns.day.push(day);
            columns.susceptible.push(state.susceptible);
            columns.infected.push(state.infected);
            columns.recovered.push(state.recovered);
        }
        columns
    }
}

/// Runs the SIR model for `n_days` days and returns `n_days + 1` states.
///
/// The population conserved by every step is the initial `S + I + R`.
pub fn simulate(
    initial: EpidemicState,
    transmission: &Transmission,
    n_days: usize,
) -> Result<SimulationResult, ModelError> {
    let population = initial.total();
    let gamma = transmission.opening_rates()?.gamma;

    let mut states = Vec::with_capacity(n_days + 1);
    states.push(initial);

    let mut state = initial;
    match transmission {
        Transmission::Constant(rates) => {
            for _ in 0..n_days {
                state = sir_step(state, rates.beta, gamma, population)?;
                states.push(state);
            }
        }
        Transmission::Scheduled { schedule, .. } => {
            let mut cursor = schedule.cursor();
            let mut phase = cursor.phase_index();
            for day in 1..=n_days {
                let beta = cursor.next_beta();
                if cursor.phase_index() != phase {
                    phase = cursor.phase_index();
                    debug!(day, phase, beta, "policy phase change");
                }
                state = sir_step(state, beta, gamma, population)?;
                states.push(state);
            }
        }
    }

    debug!(
        n_days,
        population,
        final_infected = state.infected,
        "simulation finished"
    );
    Ok(SimulationResult { states })
}
