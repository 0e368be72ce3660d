use std::fmt;

use serde::Deserialize;

use crate::error::ModelError;
use crate::sir::{EpidemicState, RateParameters};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct PerCategory<T> {
    pub hospitalized: T,
    pub icu: T,
    pub ventilated: T,
}

impl<T> PerCategory<T> {
    pub fn new(hospitalized: T, icu: T, ventilated: T) -> Self {
        Self {
            hospitalized,
            icu,
            ventilated,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerCategory<U> {
        PerCategory {
            hospitalized: f(self.hospitalized),
            icu: f(self.icu),
            ventilated: f(self.ventilated),
        }
    }
}

/// Planner inputs for one scenario.
///
/// Every field has a default so a partial envelope deserializes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioInputs {
    /// COVID-19 patients in the hospital today.
    pub current_hospitalized: i64,
    /// Days for infections to double before distancing.
    pub doubling_time: f64,
    /// Fractional reduction in contacts, in `[0, 1)`.
    pub relative_contact_rate: f64,
    pub rates: PerCategory<f64>,
    pub length_of_stay: PerCategory<u32>,
    /// Share of regional patients presenting to this hospital.
    pub market_share: f64,
    pub infectious_period: f64,
    /// Susceptible regional population at day 0.
    pub population: u64,
    /// Confirmed regional infections, only used for the detection probability.
    pub known_infections: u64,
    pub n_days: usize,
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            current_hospitalized: 4,
            doubling_time: 6.0,
            relative_contact_rate: 0.0,
            rates: PerCategory::new(0.05, 0.02, 0.01),
            length_of_stay: PerCategory::new(7, 9, 10),
            market_share: 0.15,
            infectious_period: 14.0,
            population: 4_119_405,
            known_infections: 91,
            n_days: 60,
        }
    }
}

impl ScenarioInputs {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.current_hospitalized < 0 {
            return Err(ModelError::domain(
                "current_hospitalized",
                self.current_hospitalized as f64,
                ">= 0 patients",
            ));
        }
        if !(self.doubling_time.is_finite() && self.doubling_time > 0.0) {
            return Err(ModelError::domain(
                "doubling_time",
                self.doubling_time,
                "> 0 days",
            ));
        }
        check_contact_rate(self.relative_contact_rate)?;
        check_fraction(
            "hospitalization_rate",
            self.rates.hospitalized,
            false,
            "within (0, 1]",
        )?;
        check_fraction("icu_rate", self.rates.icu, true, "within [0, 1]")?;
        check_fraction(
            "ventilated_rate",
            self.rates.ventilated,
            true,
            "within [0, 1]",
        )?;
        check_fraction("market_share", self.market_share, false, "within (0, 1]")?;
        if !(self.infectious_period.is_finite() && self.infectious_period > 0.0) {
            return Err(ModelError::domain(
                "infectious_period",
                self.infectious_period,
                "> 0 days",
            ));
        }
        if self.population == 0 {
            return Err(ModelError::domain("population", 0.0, "> 0 people"));
        }
        Ok(())
    }
}

fn check_fraction(
    name: &'static str,
    value: f64,
    allow_zero: bool,
    expected: &'static str,
) -> Result<(), ModelError> {
    let above_floor = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if value.is_finite() && above_floor && value <= 1.0 {
        Ok(())
    } else {
        Err(ModelError::domain(name, value, expected))
    }
}

fn check_contact_rate(value: f64) -> Result<(), ModelError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::domain(
            "relative_contact_rate",
            value,
            "within [0, 1)",
        ))
    }
}

/// Model parameters implied by a [`ScenarioInputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedParameters {
    pub doubling_time: f64,
    pub relative_contact_rate: f64,
    /// Daily growth of infections before distancing.
    pub intrinsic_growth_rate: f64,
    pub gamma: f64,
    pub beta: f64,
    /// Regional infections implied by the hospital census.
    pub initial_infections: f64,
    /// Share of true infections that have been confirmed, when defined.
    pub detection_probability: Option<f64>,
    pub r_naught: f64,
    pub r_t: f64,
    pub growth_rate_t: f64,
    /// Doubling time after distancing; negative when infections shrink. None
    /// when infections hold steady or more than the whole infected compartment
    /// would recover in a day.
    pub doubling_time_t: Option<f64>,
    pub initial_state: EpidemicState,
}

impl DerivedParameters {
    pub fn rates(&self) -> RateParameters {
        RateParameters {
            beta: self.beta,
            gamma: self.gamma,
        }
    }

    /// Beta under a different contact reduction, holding everything else fixed.
    pub fn beta_for_contact_rate(&self, relative_contact_rate: f64) -> Result<f64, ModelError> {
        check_contact_rate(relative_contact_rate)?;
        Ok((self.intrinsic_growth_rate + self.gamma) / self.initial_state.susceptible
            * (1.0 - relative_contact_rate))
    }
}

impl fmt::Display for DerivedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "An initial doubling time of {:.1} days ",
            self.doubling_time
        )?;
        match self.detection_probability {
            Some(p) => write!(
                f,
                "and a detection probability of {:.0}% imply {:.0} regional infections. ",
                p * 100.0,
                self.initial_infections
            )?,
            None => write!(f, "with no hospitalized patients implies no regional infections. ")?,
        }
        write!(
            f,
            "A {:.0}% reduction in social contact implies an effective Rt of {:.2} ",
            self.relative_contact_rate * 100.0,
            self.r_t,
        )?;
        match self.doubling_time_t {
            Some(t) if t > 0.0 => write!(f, "and a doubling time of {t:.1} days."),
            Some(t) => write!(f, "and a halving time of {:.1} days.", -t),
            None => write!(f, "and no doubling."),
        }
    }
}

/// Turns planner inputs into SIR parameters and the day-0 state.
pub fn derive_parameters(inputs: &ScenarioInputs) -> Result<DerivedParameters, ModelError> {
    inputs.validate()?;

    let susceptible = inputs.population as f64;
    let intrinsic_growth_rate = 2f64.powf(1.0 / inputs.doubling_time) - 1.0;
    let gamma = 1.0 / inputs.infectious_period;
    let beta = (intrinsic_growth_rate + gamma) / susceptible * (1.0 - inputs.relative_contact_rate);

    let initial_infections =
        inputs.current_hospitalized as f64 / inputs.market_share / inputs.rates.hospitalized;
    let detection_probability =
        (initial_infections > 0.0).then(|| inputs.known_infections as f64 / initial_infections);

    let r_t = beta / gamma * susceptible;
    let r_naught = r_t / (1.0 - inputs.relative_contact_rate);
    let growth_rate_t = beta * susceptible - gamma;
    let doubling_time_t =
        (growth_rate_t > -1.0 && growth_rate_t != 0.0).then(|| 2f64.ln() / growth_rate_t.ln_1p());

    Ok(DerivedParameters {
        doubling_time: inputs.doubling_time,
        relative_contact_rate: inputs.relative_contact_rate,
        intrinsic_growth_rate,
        gamma,
        beta,
        initial_infections,
        detection_probability,
        r_naught,
        r_t,
        growth_rate_t,
        doubling_time_t,
        initial_state: EpidemicState::new(susceptible, initial_infections, 0.0),
    })
}
