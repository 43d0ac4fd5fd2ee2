//! End-to-end simulation of one observation.
//!
//! Data flows strictly forward through the stages:
//! grid → blackbody source → atmospheric absorption → observed spectrum →
//! band-reject filters → photon counts → shot-noise statistics.
//!
//! Every stage returns a new array; the parameters and the grid are only
//! borrowed, so independent runs can execute in parallel via [`run_batch`].

use log::{debug, info};
use rayon::prelude::*;
use shared::units::{Temperature, TemperatureExt};

use crate::algo::stats::{expectation_wavelength, standard_error, standard_error_of_mean};
use crate::photometry::atmosphere::{absorption_spectrum, observed_spectrum, AbsorptionModel};
use crate::photometry::filters::{apply_filters, FilterSpec};
use crate::photometry::photoconversion::to_photon_counts;
use crate::photometry::spectrum::{
    AbsorptionProfile, PhotonCounts, SpectralDensity, SpectrumError, WavelengthGrid,
};
use crate::photometry::stellar::source_spectrum;

/// Immutable inputs of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    temperature: Temperature,
    photon_budget: f64,
    absorption_model: AbsorptionModel,
    filters: Vec<FilterSpec>,
    measurements: usize,
}

impl SimulationParameters {
    /// Validate and bundle the parameters of a run.
    ///
    /// The number of repeated measurements starts at 1; see
    /// [`SimulationParameters::with_measurements`].
    ///
    /// # Returns
    /// `InvalidParameter` for a non-positive temperature or photon budget
    pub fn new(
        temperature: Temperature,
        photon_budget: f64,
        absorption_model: AbsorptionModel,
        filters: Vec<FilterSpec>,
    ) -> Result<Self, SpectrumError> {
        let kelvin = temperature.as_kelvin();
        if !(kelvin.is_finite() && kelvin > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "temperature must be positive, got {kelvin} K"
            )));
        }
        if !(photon_budget.is_finite() && photon_budget > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "photon budget must be positive, got {photon_budget}"
            )));
        }
        Ok(Self {
            temperature,
            photon_budget,
            absorption_model,
            filters,
            measurements: 1,
        })
    }

    /// Average the statistics over `measurements` repeated exposures
    pub fn with_measurements(mut self, measurements: usize) -> Result<Self, SpectrumError> {
        if measurements == 0 {
            return Err(SpectrumError::InvalidParameter(
                "number of measurements must be at least 1".to_string(),
            ));
        }
        self.measurements = measurements;
        Ok(self)
    }

    /// Source temperature
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Source temperature in Kelvin
    pub fn temperature_k(&self) -> f64 {
        self.temperature.as_kelvin()
    }

    /// Total photons detected over the observation
    pub fn photon_budget(&self) -> f64 {
        self.photon_budget
    }

    /// Atmospheric absorption model
    pub fn absorption_model(&self) -> AbsorptionModel {
        self.absorption_model
    }

    /// Band-reject filters, in the order given
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// Number of repeated exposures the statistics average over
    pub fn measurements(&self) -> usize {
        self.measurements
    }
}

/// Everything one run produces, co-indexed with `grid`
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub grid: WavelengthGrid,
    pub parameters: SimulationParameters,

    /// Unit-sum blackbody density
    pub source: SpectralDensity,
    /// Atmospheric absorption fraction
    pub absorption: AbsorptionProfile,
    /// Source after the atmosphere
    pub observed: SpectralDensity,
    /// Observed spectrum after the band-reject filters, not renormalized
    pub filtered: SpectralDensity,

    /// Photon counts if the bare source were observed with the full budget
    pub source_counts: PhotonCounts,
    /// Photon counts of the observed spectrum, summing to the budget
    pub observed_counts: PhotonCounts,
    /// Observed counts with rejected bins zeroed
    pub filtered_counts: PhotonCounts,

    /// Poisson shot noise of each filtered bin
    pub standard_error: PhotonCounts,
    /// Shot noise divided by √measurements
    pub standard_error_of_mean: PhotonCounts,

    /// Photon-weighted mean wavelength of the filtered counts, nm
    pub expectation_wavelength_nm: f64,
    /// Photon-weighted mean wavelength before filtering, nm
    pub unfiltered_expectation_nm: f64,
}

impl SimulationResult {
    /// Photons removed by the filters
    pub fn rejected_photons(&self) -> f64 {
        self.observed_counts.sum() - self.filtered_counts.sum()
    }

    /// Photons that reach the detector after filtering
    pub fn detected_photons(&self) -> f64 {
        self.filtered_counts.sum()
    }
}

/// Run the full pipeline on `grid`.
///
/// Either every output array is produced or an error is returned; the first
/// failing stage aborts the run.
pub fn run_simulation(
    grid: &WavelengthGrid,
    parameters: &SimulationParameters,
) -> Result<SimulationResult, SpectrumError> {
    let temperature_k = parameters.temperature_k();
    let budget = parameters.photon_budget();
    let filters = parameters.filters();

    let source = source_spectrum(grid, temperature_k)?;
    let absorption = absorption_spectrum(grid, parameters.absorption_model())?;
    let observed = observed_spectrum(&source, &absorption)?;
    let filtered = apply_filters(&observed, grid, filters)?;
    debug!(
        "Atmosphere transmits {:.4} of the source, filters keep {:.4}",
        observed.sum(),
        filtered.sum()
    );

    let source_counts = to_photon_counts(&source, grid, budget)?;
    let observed_counts = to_photon_counts(&observed, grid, budget)?;
    // Mask the counts rather than re-converting so out-of-band bins keep their values
    let filtered_counts = apply_filters(&observed_counts, grid, filters)?;

    let standard_error = standard_error(&filtered_counts)?;
    let standard_error_of_mean =
        standard_error_of_mean(&filtered_counts, parameters.measurements())?;

    let unfiltered_expectation_nm = expectation_wavelength(grid, &observed_counts)?;
    let expectation_wavelength_nm = expectation_wavelength(grid, &filtered_counts)?;

    info!(
        "T = {temperature_k} K, model {}, {} filter(s): expectation wavelength {:.2} nm ({:.2} nm unfiltered)",
        parameters.absorption_model(),
        filters.len(),
        expectation_wavelength_nm,
        unfiltered_expectation_nm
    );

    Ok(SimulationResult {
        grid: grid.clone(),
        parameters: parameters.clone(),
        source,
        absorption,
        observed,
        filtered,
        source_counts,
        observed_counts,
        filtered_counts,
        standard_error,
        standard_error_of_mean,
        expectation_wavelength_nm,
        unfiltered_expectation_nm,
    })
}

/// Run independent simulations in parallel.
///
/// Results are returned in the order of `runs`; one failing run does not
/// affect the others.
pub fn run_batch(
    grid: &WavelengthGrid,
    runs: &[SimulationParameters],
) -> Vec<Result<SimulationResult, SpectrumError>> {
    runs.par_iter()
        .map(|parameters| run_simulation(grid, parameters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::spectrum::make_grid;
    use approx::assert_relative_eq;

    fn solar(filters: Vec<FilterSpec>) -> SimulationParameters {
        SimulationParameters::new(
            Temperature::from_kelvin(5780.0),
            1e6,
            AbsorptionModel::RayleighOzone,
            filters,
        )
        .unwrap()
    }

    #[test]
    fn test_parameters_validation() {
        let t = Temperature::from_kelvin(5780.0);
        assert!(matches!(
            SimulationParameters::new(t, 0.0, AbsorptionModel::Rayleigh, vec![]),
            Err(SpectrumError::InvalidParameter(_))
        ));
        assert!(matches!(
            SimulationParameters::new(
                Temperature::from_kelvin(0.0),
                1e6,
                AbsorptionModel::Rayleigh,
                vec![]
            ),
            Err(SpectrumError::InvalidParameter(_))
        ));
        assert!(solar(vec![]).with_measurements(0).is_err());
        assert_eq!(solar(vec![]).with_measurements(10).unwrap().measurements(), 10);
    }

    #[test]
    fn test_all_outputs_co_indexed() {
        let grid = make_grid(400.0, 800.0, 64).unwrap();
        let result = run_simulation(&grid, &solar(vec![])).unwrap();
        for array in [
            &result.source,
            &result.absorption,
            &result.observed,
            &result.filtered,
            &result.source_counts,
            &result.observed_counts,
            &result.filtered_counts,
            &result.standard_error,
            &result.standard_error_of_mean,
        ] {
            assert_eq!(array.len(), grid.len());
        }
    }

    #[test]
    fn test_unfiltered_run_keeps_budget() {
        let grid = make_grid(400.0, 800.0, 100).unwrap();
        let result = run_simulation(&grid, &solar(vec![])).unwrap();
        assert_relative_eq!(result.detected_photons(), 1e6, max_relative = 1e-6);
        assert_relative_eq!(result.source_counts.sum(), 1e6, max_relative = 1e-6);
        assert_eq!(result.filtered, result.observed);
        assert_eq!(
            result.expectation_wavelength_nm,
            result.unfiltered_expectation_nm
        );
        assert_relative_eq!(result.rejected_photons(), 0.0);
    }

    #[test]
    fn test_measurements_shrink_standard_error() {
        let grid = make_grid(400.0, 800.0, 20).unwrap();
        let params = solar(vec![]).with_measurements(1000).unwrap();
        let result = run_simulation(&grid, &params).unwrap();
        let scale = 1000f64.sqrt();
        for (se, sem) in result
            .standard_error
            .iter()
            .zip(result.standard_error_of_mean.iter())
        {
            assert_relative_eq!(se / scale, *sem, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_filter_blocking_everything_is_degenerate() {
        let grid = make_grid(400.0, 800.0, 50).unwrap();
        let everything = FilterSpec::new(600.0, 300.0).unwrap();
        assert!(matches!(
            run_simulation(&grid, &solar(vec![everything])),
            Err(SpectrumError::DegenerateSpectrum(_))
        ));
    }

    #[test]
    fn test_batch_preserves_order() {
        let grid = make_grid(400.0, 800.0, 100).unwrap();
        let runs: Vec<SimulationParameters> = [3000.0, 6000.0, 12_000.0]
            .iter()
            .map(|&t| {
                SimulationParameters::new(
                    Temperature::from_kelvin(t),
                    1e6,
                    AbsorptionModel::Rayleigh,
                    vec![],
                )
                .unwrap()
            })
            .collect();

        let results = run_batch(&grid, &runs);
        assert_eq!(results.len(), 3);
        let means: Vec<f64> = results
            .into_iter()
            .map(|r| r.unwrap().expectation_wavelength_nm)
            .collect();

        // Hotter sources shift photons to the blue
        assert!(means[0] > means[1]);
        assert!(means[1] > means[2]);
    }
}
