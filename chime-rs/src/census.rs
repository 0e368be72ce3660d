use tracing::debug;

use crate::admissions::AdmissionsProjection;
use crate::error::ModelError;
use crate::parameters::PerCategory;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyCensus {
    pub day: usize,
    pub census: PerCategory<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CensusProjection {
    rows: Vec<DailyCensus>,
}

impl CensusProjection {
    pub fn rows(&self) -> &[DailyCensus] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Highest census reached per level of care, with the day it occurs.
    pub fn peak(&self) -> PerCategory<Option<(usize, f64)>> {
        let mut peak = PerCategory::<Option<(usize, f64)>>::default();
        for row in &self.rows {
            for (slot, value) in [
                (&mut peak.hospitalized, row.census.hospitalized),
                (&mut peak.icu, row.census.icu),
                (&mut peak.ventilated, row.census.ventilated),
            ] {
                if slot.is_none_or(|(_, best)| value > best) {
                    *slot = Some((row.day, value));
                }
            }
        }
        peak
    }
}

/// Occupied beds as the admissions of the last `length_of_stay` days.
///
/// Patients admitted on day `k` occupy a bed on days `k..k + los`. Days before
/// the first row contribute nothing.
pub fn project_census(
    admissions: &AdmissionsProjection,
    length_of_stay: PerCategory<u32>,
) -> Result<CensusProjection, ModelError> {
    for (name, los) in [
        ("hospitalized_los", length_of_stay.hospitalized),
        ("icu_los", length_of_stay.icu),
        ("ventilated_los", length_of_stay.ventilated),
    ] {
        if los == 0 {
            return Err(ModelError::domain(name, 0.0, ">= 1 day"));
        }
    }

    let rows = admissions.rows();
    let window = |los: u32, day: usize, pick: fn(&PerCategory<f64>) -> f64| -> f64 {
        let start = (day + 1).saturating_sub(los as usize);
        rows[start..=day].iter().map(|row| pick(&row.admits)).sum()
    };

    let census: Vec<DailyCensus> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| DailyCensus {
            day: row.day,
            census: PerCategory {
                hospitalized: window(length_of_stay.hospitalized, index, |a| a.hospitalized),
                icu: window(length_of_stay.icu, index, |a| a.icu),
                ventilated: window(length_of_stay.ventilated, index, |a| a.ventilated),
            },
        })
        .collect();

    debug!(days = census.len(), "projected census");
    Ok(CensusProjection { rows: census })
}
