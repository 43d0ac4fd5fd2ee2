//! Sweep the source temperature and report how the expectation wavelength moves
//!
//! Every temperature is simulated independently and in parallel.
//!
//! Usage:
//! ```
//! cargo run --release --bin temperature_sweep -- --temperatures 3000:12000:500
//! ```

use anyhow::Result;
use clap::Parser;
use log::warn;
use shared::range_arg::RangeArg;
use shared::units::{Temperature, TemperatureExt};
use simulator::shared_args::ObservationArgs;
use simulator::sims::{run_batch, SimulationParameters};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Expectation wavelength as a function of source temperature"
)]
struct Args {
    /// Temperature sweep in Kelvin (start:stop:step)
    #[arg(long, default_value = "3000:12000:1000")]
    temperatures: RangeArg,

    #[command(flatten)]
    observation: ObservationArgs,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let grid = args.observation.wavelength_grid()?;
    let runs = args
        .temperatures
        .values()
        .into_iter()
        .map(|t| args.observation.parameters(Temperature::from_kelvin(t)))
        .collect::<Result<Vec<SimulationParameters>, _>>()?;

    println!(
        "{:>10} {:>16} {:>16} {:>14}",
        "T (K)", "expectation_nm", "unfiltered_nm", "detected"
    );
    for (params, outcome) in runs.iter().zip(run_batch(&grid, &runs)) {
        match outcome {
            Ok(result) => println!(
                "{:>10.0} {:>16.2} {:>16.2} {:>14.4e}",
                params.temperature_k(),
                result.expectation_wavelength_nm,
                result.unfiltered_expectation_nm,
                result.detected_photons(),
            ),
            Err(e) => warn!("T = {} K failed: {e}", params.temperature_k()),
        }
    }

    Ok(())
}
