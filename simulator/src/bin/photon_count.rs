//! Simulate one ground-based observation of a blackbody source
//!
//! Prints the per-wavelength photon table and the photon-weighted
//! expectation wavelength, optionally writing CSV and JSON output.
//!
//! Usage:
//! ```
//! cargo run --bin photon_count -- --temperature 5780 --filter 685:65
//! cargo run --bin photon_count -- --temperature 3500C --model rayleigh
//! cargo run --bin photon_count -- --config run.json --csv plots/run.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use shared::units::{parse_temperature, Temperature};
use simulator::shared_args::ObservationArgs;
use simulator::sims::report::{summary_line, write_csv, write_json};
use simulator::sims::{run_simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Blackbody source through the atmosphere to expected photon counts"
)]
struct Args {
    /// Source temperature, Kelvin by default (e.g. 5780, 5780K, 25C)
    #[arg(long, default_value = "5780", value_parser = parse_temperature)]
    temperature: Temperature,

    #[command(flatten)]
    observation: ObservationArgs,

    /// Load the run from a JSON config instead of the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective run config as JSON
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Write the per-wavelength table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full run record as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print every grid row instead of a summary
    #[arg(long, default_value_t = false)]
    table: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let parameters = args.observation.parameters(args.temperature)?;
            SimulationConfig::from_run(&args.observation.grid_spec(), &parameters)
        }
    };

    if let Some(path) = &args.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("saving config {}", path.display()))?;
        info!("Saved config to {}", path.display());
    }

    let (grid, parameters) = config.to_run()?;
    let result = run_simulation(&grid, &parameters)?;

    if args.table {
        println!(
            "{:>10} {:>12} {:>10} {:>14} {:>14} {:>10}",
            "nm", "source", "absorb", "observed_ph", "filtered_ph", "std_err"
        );
        for (i, nm) in result.grid.wavelengths().iter().enumerate() {
            println!(
                "{:>10.2} {:>12.4e} {:>10.4} {:>14.2} {:>14.2} {:>10.3}",
                nm,
                result.source[i],
                result.absorption[i],
                result.observed_counts[i],
                result.filtered_counts[i],
                result.standard_error[i],
            );
        }
    }

    println!("{}", summary_line(&result));
    println!(
        "Expectation wavelength (photon counts weighted): {:.2} nm",
        result.expectation_wavelength_nm
    );

    if let Some(path) = &args.csv {
        write_csv(&result, path).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        write_json(&result, path).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}
