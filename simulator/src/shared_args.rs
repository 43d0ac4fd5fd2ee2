//! Command-line arguments shared by the simulation binaries

use clap::Args;
use shared::range_arg::GridArg;
use shared::units::Temperature;

use crate::photometry::atmosphere::AbsorptionModel;
use crate::photometry::filters::FilterSpec;
use crate::photometry::spectrum::{make_grid, SpectrumError, WavelengthGrid};
use crate::sims::config::GridSpec;
use crate::sims::pipeline::SimulationParameters;

/// Observation setup common to every binary, everything except the source temperature
#[derive(Args, Debug, Clone)]
pub struct ObservationArgs {
    /// Wavelength grid in nanometers (low:high:count)
    #[arg(long, default_value = "400:800:100")]
    pub grid: GridArg,

    /// Atmospheric absorption model (rayleigh, rayleigh_ozone)
    #[arg(long, default_value_t = AbsorptionModel::RayleighOzone)]
    pub model: AbsorptionModel,

    /// Band-reject filter as target:bandwidth in nm, repeatable (e.g. 685:65)
    #[arg(long = "filter")]
    pub filters: Vec<FilterSpec>,

    /// Total photons detected over the observation
    #[arg(long, default_value_t = 1e6)]
    pub photon_budget: f64,

    /// Number of repeated exposures to average the standard error over
    #[arg(long, default_value_t = 1)]
    pub measurements: usize,
}

impl ObservationArgs {
    /// Grid bounds as a config value
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            low_nm: self.grid.low,
            high_nm: self.grid.high,
            count: self.grid.count,
        }
    }

    /// Build the wavelength grid
    pub fn wavelength_grid(&self) -> Result<WavelengthGrid, SpectrumError> {
        make_grid(self.grid.low, self.grid.high, self.grid.count)
    }

    /// Run parameters for a source at `temperature`
    pub fn parameters(
        &self,
        temperature: Temperature,
    ) -> Result<SimulationParameters, SpectrumError> {
        SimulationParameters::new(
            temperature,
            self.photon_budget,
            self.model,
            self.filters.clone(),
        )?
        .with_measurements(self.measurements)
    }
}
