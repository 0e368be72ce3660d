//! Hospital census projections from a discrete-time SIR model.

pub mod admissions;
pub mod census;
pub mod error;
pub mod parameters;
pub mod scenario;
pub mod schedule;
pub mod simulation;
pub mod sir;

pub use admissions::{AdmissionsBasis, AdmissionsProjection, DailyAdmissions, project_admissions};
pub use census::{CensusProjection, DailyCensus, project_census};
pub use error::ModelError;
pub use parameters::{DerivedParameters, PerCategory, ScenarioInputs, derive_parameters};
pub use scenario::{Intervention, Scenario, ScenarioReport};
pub use schedule::{PolicyPhase, PolicySchedule, Transmission};
pub use simulation::{SimulationResult, SirColumns, simulate};
pub use sir::{EpidemicState, RateParameters, sir_step};
