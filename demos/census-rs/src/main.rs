pub mod output;
pub mod parameters;

use std::path::PathBuf;

use anyhow::Context;
use chime_mrp::RunEnvironment;
use parameters::Parameters;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so tables on stdout stay parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let env = RunEnvironment::<Parameters>::load(path.as_deref())
        .context("failed to load run envelope")?;
    let parameters = &env.input;

    let report = parameters
        .scenario
        .run()
        .context("failed to project scenario")?;
    let summary = report.parameters.to_string();
    info!("{summary}");

    let chart = report.admissions.head(parameters.chart_days());

    env.write_table("sir.csv", &output::sir_rows(&report.simulation))?;
    env.write_table("admissions.csv", &output::admission_rows(&chart))?;
    env.write_table("census.csv", &output::census_rows(&report.census))?;
    env.write("summary.txt", format!("{summary}\n").as_bytes())?;

    let peak = report.census.peak();
    if let Some((day, beds)) = peak.hospitalized {
        info!(day, beds, "peak hospitalized census");
    }
    Ok(())
}
