//! JSON run configuration.
//!
//! A [`SimulationConfig`] is the serialized form of one run: grid bounds,
//! source temperature, photon budget, absorption model name, filters and the
//! number of repeated measurements. Names and numbers are validated only
//! when the config is turned into a run, so an unknown model name surfaces
//! as [`SpectrumError::UnknownModel`] rather than a decode error.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::units::{Temperature, TemperatureExt};
use thiserror::Error;

use crate::photometry::atmosphere::AbsorptionModel;
use crate::photometry::filters::FilterSpec;
use crate::photometry::spectrum::{make_grid, SpectrumError, WavelengthGrid};
use crate::sims::pipeline::{run_simulation, SimulationParameters, SimulationResult};

/// Errors loading, saving or validating a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

/// Wavelength grid bounds in nanometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub low_nm: f64,
    pub high_nm: f64,
    pub count: usize,
}

impl Default for GridSpec {
    /// Visible band, 400-800 nm in 100 samples
    fn default() -> Self {
        Self {
            low_nm: 400.0,
            high_nm: 800.0,
            count: 100,
        }
    }
}

impl GridSpec {
    /// Build the grid these bounds describe
    pub fn build(&self) -> Result<WavelengthGrid, SpectrumError> {
        make_grid(self.low_nm, self.high_nm, self.count)
    }
}

/// Serialized band-reject filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub target_nm: f64,
    pub bandwidth_nm: f64,
}

impl From<&FilterSpec> for FilterConfig {
    fn from(filter: &FilterSpec) -> Self {
        Self {
            target_nm: filter.target_nm(),
            bandwidth_nm: filter.bandwidth_nm(),
        }
    }
}

fn default_measurements() -> usize {
    1
}

/// One simulation run as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub grid: GridSpec,

    /// Source temperature in Kelvin
    pub temperature_k: f64,

    /// Total photons detected over the observation
    pub photon_budget: f64,

    /// "rayleigh" or "rayleigh_ozone"
    pub absorption_model: String,

    #[serde(default)]
    pub filters: Vec<FilterConfig>,

    #[serde(default = "default_measurements")]
    pub measurements: usize,
}

impl Default for SimulationConfig {
    /// Solar-temperature source through the Rayleigh + ozone atmosphere
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            temperature_k: 5780.0,
            photon_budget: 1e6,
            absorption_model: AbsorptionModel::RayleighOzone.name().to_string(),
            filters: Vec::new(),
            measurements: default_measurements(),
        }
    }
}

impl SimulationConfig {
    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Capture an existing run's inputs
    pub fn from_run(grid: &GridSpec, parameters: &SimulationParameters) -> Self {
        Self {
            grid: *grid,
            temperature_k: parameters.temperature_k(),
            photon_budget: parameters.photon_budget(),
            absorption_model: parameters.absorption_model().name().to_string(),
            filters: parameters.filters().iter().map(FilterConfig::from).collect(),
            measurements: parameters.measurements(),
        }
    }

    /// Validate every field and produce the grid and parameters of the run
    pub fn to_run(&self) -> Result<(WavelengthGrid, SimulationParameters), SpectrumError> {
        let grid = self.grid.build()?;
        let model: AbsorptionModel = self.absorption_model.parse()?;
        let filters = self
            .filters
            .iter()
            .map(|f| FilterSpec::new(f.target_nm, f.bandwidth_nm))
            .collect::<Result<Vec<_>, _>>()?;

        let parameters = SimulationParameters::new(
            Temperature::from_kelvin(self.temperature_k),
            self.photon_budget,
            model,
            filters,
        )?
        .with_measurements(self.measurements)?;

        Ok((grid, parameters))
    }

    /// Validate and run the simulation this config describes
    pub fn run(&self) -> Result<SimulationResult, SpectrumError> {
        let (grid, parameters) = self.to_run()?;
        run_simulation(&grid, &parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "temperature_k": 5780.0,
            "photon_budget": 1000000.0,
            "absorption_model": "rayleigh"
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid, GridSpec::default());
        assert!(config.filters.is_empty());
        assert_eq!(config.measurements, 1);

        let (grid, params) = config.to_run().unwrap();
        assert_eq!(grid.len(), 100);
        assert_eq!(params.absorption_model(), AbsorptionModel::Rayleigh);
    }

    #[test]
    fn test_unknown_model_reported_on_validation() {
        let config = SimulationConfig {
            absorption_model: "unknown_variant".to_string(),
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.run().unwrap_err(),
            SpectrumError::UnknownModel("unknown_variant".to_string())
        );
    }

    #[test]
    fn test_invalid_fields() {
        let bad_grid = SimulationConfig {
            grid: GridSpec {
                low_nm: 800.0,
                high_nm: 400.0,
                count: 100,
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            bad_grid.to_run(),
            Err(SpectrumError::InvalidRange(_))
        ));

        let bad_filter = SimulationConfig {
            filters: vec![FilterConfig {
                target_nm: 685.0,
                bandwidth_nm: -65.0,
            }],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            bad_filter.to_run(),
            Err(SpectrumError::InvalidParameter(_))
        ));

        let no_measurements = SimulationConfig {
            measurements: 0,
            ..SimulationConfig::default()
        };
        assert!(no_measurements.to_run().is_err());
    }

    #[test]
    fn test_from_run_round_trip() {
        let config = SimulationConfig {
            filters: vec![FilterConfig {
                target_nm: 685.0,
                bandwidth_nm: 65.0,
            }],
            measurements: 1000,
            ..SimulationConfig::default()
        };
        let (_, params) = config.to_run().unwrap();
        assert_eq!(SimulationConfig::from_run(&config.grid, &params), config);
    }
}
