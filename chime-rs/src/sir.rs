use crate::error::{ModelError, non_negative};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EpidemicState {
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
}

impl EpidemicState {
    pub fn new(susceptible: f64, infected: f64, recovered: f64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
        }
    }

    pub fn total(&self) -> f64 {
        self.susceptible + self.infected + self.recovered
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.susceptible, self.infected, self.recovered)
    }

    /// Clamps every compartment at zero and rescales the three so they sum to
    /// `population`.
    ///
    /// Applied after each step to remove floating point drift, which keeps
    /// `S + I + R == N` for the whole run.
    pub fn renormalized(self, population: f64) -> Result<Self, ModelError> {
        let susceptible = self.susceptible.max(0.0);
        let infected = self.infected.max(0.0);
        let recovered = self.recovered.max(0.0);

        let total = susceptible + infected + recovered;
        if total == 0.0 {
            return Err(ModelError::ZeroPopulation { target: population });
        }
        let scale = population / total;

        Ok(Self {
            susceptible: susceptible * scale,
            infected: infected * scale,
            recovered: recovered * scale,
        })
    }

    fn validate(&self) -> Result<(), ModelError> {
        non_negative("susceptible", self.susceptible)?;
        non_negative("infected", self.infected)?;
        non_negative("recovered", self.recovered)?;
        Ok(())
    }
}

impl From<(f64, f64, f64)> for EpidemicState {
    fn from((susceptible, infected, recovered): (f64, f64, f64)) -> Self {
        Self::new(susceptible, infected, recovered)
    }
}

/// Transmission and recovery rates of the SIR model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateParameters {
    /// Per-contact transmission rate.
    pub beta: f64,
    /// Recovery rate, the inverse of the infectious period.
    pub gamma: f64,
}

impl RateParameters {
    pub fn new(beta: f64, gamma: f64) -> Result<Self, ModelError> {
        non_negative("beta", beta)?;
        non_negative("gamma", gamma)?;
        if gamma == 0.0 {
            return Err(ModelError::domain("gamma", gamma, "> 0"));
        }
        Ok(Self { beta, gamma })
    }
}

/// Advances the compartments by one day.
///
/// `population` is the total the result is rescaled to; for a run this is
/// `S0 + I0 + R0`.
pub fn sir_step(
    state: EpidemicState,
    beta: f64,
    gamma: f64,
    population: f64,
) -> Result<EpidemicState, ModelError> {
    state.validate()?;
    non_negative("beta", beta)?;
    non_negative("gamma", gamma)?;
    non_negative("population", population)?;

    let EpidemicState {
        susceptible: s,
        infected: i,
        recovered: r,
    } = state;

    let next = EpidemicState {
        susceptible: -beta * s * i + s,
        infected: beta * s * i - gamma * i + i,
        recovered: gamma * i + r,
    };
    next.renormalized(population)
}
