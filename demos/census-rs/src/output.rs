use chime::{AdmissionsProjection, CensusProjection, SimulationResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SirRow {
    pub day: usize,
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
}

/// One row of the admissions or census table.
#[derive(Debug, Serialize)]
pub struct CareRow {
    pub day: usize,
    #[serde(rename = "Hospitalized")]
    pub hospitalized: f64,
    #[serde(rename = "ICU")]
    pub icu: f64,
    #[serde(rename = "Ventilated")]
    pub ventilated: f64,
}

pub fn sir_rows(result: &SimulationResult) -> Vec<SirRow> {
    result
        .states()
        .iter()
        .enumerate()
        .map(|(day, state)| SirRow {
            day,
            susceptible: state.susceptible,
            infected: state.infected,
            recovered: state.recovered,
        })
        .collect()
}

pub fn admission_rows(admissions: &AdmissionsProjection) -> Vec<CareRow> {
    admissions
        .rows()
        .iter()
        .map(|row| CareRow {
            day: row.day,
            hospitalized: row.admits.hospitalized,
            icu: row.admits.icu,
            ventilated: row.admits.ventilated,
        })
        .collect()
}

pub fn census_rows(census: &CensusProjection) -> Vec<CareRow> {
    census
        .rows()
        .iter()
        .map(|row| CareRow {
            day: row.day,
            hospitalized: row.census.hospitalized,
            icu: row.census.icu,
            ventilated: row.census.ventilated,
        })
        .collect()
}
