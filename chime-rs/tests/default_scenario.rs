use approx::assert_abs_diff_eq;
use chime::{
    AdmissionsBasis, PolicySchedule, Scenario, ScenarioInputs, SimulationResult, Transmission,
    derive_parameters, project_admissions, project_census, simulate,
};

fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[test]
fn default_scenario_final_state() {
    let inputs = ScenarioInputs::default();
    let p = derive_parameters(&inputs).unwrap();
    let result = simulate(p.initial_state, &p.rates().into(), inputs.n_days).unwrap();

    let (s0, i0, r0) = result.first().unwrap().as_tuple();
    assert_eq!(s0.round(), 4_119_405.0);
    assert_eq!(round(i0, 2), 533.33);
    assert_eq!(r0.round(), 0.0);

    let (s, i, r) = result.last().unwrap().as_tuple();
    assert_eq!(round(s, 2), 3_421_436.31);
    assert_eq!(round(i, 2), 418_157.62);
    assert_eq!(round(r, 2), 280_344.40);
}

#[test]
fn zero_beta_decay_matches_constant_beta() {
    let inputs = ScenarioInputs::default();
    let p = derive_parameters(&inputs).unwrap();
    let constant = simulate(p.initial_state, &p.rates().into(), inputs.n_days).unwrap();

    let schedule = PolicySchedule::decaying(p.beta, 0.0, inputs.n_days).unwrap();
    let decaying = Transmission::scheduled(p.gamma, schedule).unwrap();
    let decayed = simulate(p.initial_state, &decaying, inputs.n_days).unwrap();

    assert_eq!(constant, decayed);
    let columns = decayed.to_columns();
    assert_eq!(round(*columns.susceptible.last().unwrap(), 2), 3_421_436.31);
    assert_eq!(round(*columns.infected.last().unwrap(), 2), 418_157.62);
    assert_eq!(round(*columns.recovered.last().unwrap(), 2), 280_344.40);
}

#[test]
fn default_scenario_admissions() {
    let scenario = Scenario::default();
    let report = scenario.run().unwrap();
    let chart = report.admissions.head(scenario.inputs.n_days as i64 - 10);

    assert_eq!(chart.len(), 50);
    assert!(chart.rows()[1].admits.hospitalized < 1.0);
    assert_eq!(chart.rows()[49].admits.icu.round(), 43.0);
}

#[test]
fn new_infection_basis_admits_more() {
    let growth = Scenario::default().run().unwrap();
    let flow = Scenario {
        admissions_basis: AdmissionsBasis::NewInfections,
        ..Default::default()
    }
    .run()
    .unwrap();
    assert!(flow.admissions.rows()[49].admits.icu > growth.admissions.rows()[49].admits.icu);
    assert_eq!(flow.simulation, growth.simulation);
}

#[test]
fn census_tracks_length_of_stay() {
    let report = Scenario::default().run().unwrap();
    let admits = report.admissions.rows();
    let day = 40;
    let expected: f64 = admits[day - 8..=day].iter().map(|r| r.admits.icu).sum();
    assert_abs_diff_eq!(report.census.rows()[day].census.icu, expected, epsilon = 1e-9);
}

#[test]
fn empty_projection_for_non_positive_horizon() {
    let inputs = ScenarioInputs::default();
    let admissions = project_admissions(
        &SimulationResult::empty(),
        inputs.rates,
        inputs.market_share,
        AdmissionsBasis::default(),
    )
    .unwrap();
    assert!(admissions.is_empty());
    assert!(admissions.head(-1).is_empty());
    assert!(
        project_census(&admissions, inputs.length_of_stay)
            .unwrap()
            .is_empty()
    );
}
