use crate::error::{ModelError, non_negative};
use crate::sir::RateParameters;

/// A stretch of days simulated with a fixed beta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyPhase {
    pub beta: f64,
    pub days: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicySchedule {
    phases: Vec<PolicyPhase>,
}

impl PolicySchedule {
    /// Builds a schedule from phases applied in order. The last phase's beta
    /// stays in effect once every phase has run its course.
    pub fn new(phases: Vec<PolicyPhase>) -> Result<Self, ModelError> {
        if phases.is_empty() {
            return Err(ModelError::EmptySchedule);
        }
        for phase in &phases {
            non_negative("beta", phase.beta)?;
        }
        Ok(Self { phases })
    }

    /// Geometric decay of beta: day `t` (counting from 1) uses
    /// `beta * (1 - decay)^(t - 1)`.
    ///
    /// One single-day phase is emitted per simulated day, so `n_days` must be
    /// the horizon of the run the schedule is used for.
    pub fn decaying(beta: f64, decay: f64, n_days: usize) -> Result<Self, ModelError> {
        non_negative("beta_decay", decay)?;
        if decay > 1.0 {
            return Err(ModelError::domain("beta_decay", decay, "within [0, 1]"));
        }
        let mut phases = Vec::with_capacity(n_days.max(1));
        let mut current = beta;
        for _ in 0..n_days.max(1) {
            phases.push(PolicyPhase {
                beta: current,
                days: 1,
            });
            current *= 1.0 - decay;
        }
        Self::new(phases)
    }

    pub fn phases(&self) -> &[PolicyPhase] {
        &self.phases
    }

    /// Beta in effect before any phase boundary is crossed.
    pub fn initial_beta(&self) -> f64 {
        self.phases[0].beta
    }

    pub fn cursor(&self) -> BetaCursor<'_> {
        BetaCursor {
            phases: &self.phases,
            index: 0,
            remaining: self.phases[0].days,
        }
    }
}

/// Current phase and days left in it, handing out one beta per simulated day.
#[derive(Debug, Clone)]
pub struct BetaCursor<'a> {
    phases: &'a [PolicyPhase],
    index: usize,
    remaining: usize,
}

impl BetaCursor<'_> {
    pub fn phase_index(&self) -> usize {
        self.index
    }

    /// Returns the beta for the next simulated day, moving to the following
    /// phase when the current one has no days left.
    pub fn next_beta(&mut self) -> f64 {
        while self.remaining == 0 && self.index + 1 < self.phases.len() {
            self.index += 1;
            self.remaining = self.phases[self.index].days;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.phases[self.index].beta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transmission {
    Constant(RateParameters),
    Scheduled {
        gamma: f64,
        schedule: PolicySchedule,
    },
}

impl Transmission {
    pub fn scheduled(gamma: f64, schedule: PolicySchedule) -> Result<Self, ModelError> {
        // Validates gamma with the schedule's opening beta.
        RateParameters::new(schedule.initial_beta(), gamma)?;
        Ok(Self::Scheduled { gamma, schedule })
    }

    pub fn gamma(&self) -> f64 {
        match self {
            Self::Constant(rates) => rates.gamma,
            Self::Scheduled { gamma, .. } => *gamma,
        }
    }

    /// Rates in effect on the first simulated day, checked like
    /// [`RateParameters::new`]. Later scheduled betas are checked when the
    /// schedule is built.
    pub fn opening_rates(&self) -> Result<RateParameters, ModelError> {
        match self {
            Self::Constant(rates) => RateParameters::new(rates.beta, rates.gamma),
            Self::Scheduled { gamma, schedule } => {
                RateParameters::new(schedule.initial_beta(), *gamma)
            }
        }
    }
}

impl From<RateParameters> for Transmission {
    fn from(rates: RateParameters) -> Self {
        Self::Constant(rates)
    }
}
