//! Blackbody source model for the simulated observation
//!
//! The source is an ideal thermal emitter described only by its temperature.
//! Its Planck radiance is sampled on the wavelength grid and normalized to
//! unit sum, so downstream stages see a relative spectral density that is
//! independent of absolute radiometric units.

use log::{debug, warn};
use ndarray::Array1;

use super::spectrum::{normalize_to_unit_sum, SpectralDensity, SpectrumError, WavelengthGrid, SI};

/// Ideal blackbody emitter at a fixed temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackbodySpectrum {
    /// Effective temperature in Kelvin
    temperature: f64,
}

impl BlackbodySpectrum {
    /// Create a blackbody at `temperature` Kelvin
    ///
    /// # Returns
    /// `InvalidParameter` unless the temperature is finite and strictly positive
    pub fn new(temperature: f64) -> Result<Self, SpectrumError> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "temperature must be positive, got {temperature} K"
            )));
        }
        Ok(Self { temperature })
    }

    /// Effective temperature in Kelvin
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Spectral radiance from Planck's law
    ///
    /// B(λ,T) = 2hc² / (λ⁵ (exp(hc / λkT) − 1))
    ///
    /// # Arguments
    /// * `wavelength_nm` - Wavelength in nanometers
    ///
    /// # Returns
    /// Spectral radiance in W⋅sr⁻¹⋅m⁻³. Zero for non-positive wavelengths,
    /// and zero where the exponent overflows (deep Wien tail).
    pub fn spectral_radiance(&self, wavelength_nm: f64) -> f64 {
        if wavelength_nm <= 0.0 {
            return 0.0;
        }

        let wavelength_m = wavelength_nm * SI::NM_TO_M;
        let numerator = 2.0 * SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT * SI::SPEED_OF_LIGHT;
        let exponent = (SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT)
            / (wavelength_m * SI::BOLTZMANN_CONSTANT * self.temperature);
        // exp_m1 keeps precision in the Rayleigh-Jeans limit; overflow gives inf -> 0
        let denominator = wavelength_m.powi(5) * exponent.exp_m1();

        numerator / denominator
    }

    /// Planck radiance at every grid wavelength, unnormalized
    pub fn radiance_on(&self, grid: &WavelengthGrid) -> Array1<f64> {
        grid.wavelengths().mapv(|nm| self.spectral_radiance(nm))
    }
}

/// Unit-sum blackbody spectral density on `grid`.
///
/// # Arguments
/// * `grid` - Wavelength samples, all strictly positive
/// * `temperature` - Source temperature in Kelvin
///
/// # Returns
/// * `InvalidParameter` - temperature not strictly positive
/// * `InvalidRange` - grid reaches zero or negative wavelengths
/// * `DegenerateSpectrum` - every sample underflowed to zero radiance
pub fn source_spectrum(
    grid: &WavelengthGrid,
    temperature: f64,
) -> Result<SpectralDensity, SpectrumError> {
    let blackbody = BlackbodySpectrum::new(temperature)?;
    grid.check_positive()?;

    let radiance = blackbody.radiance_on(grid);

    let underflowed = radiance.iter().filter(|&&r| r == 0.0).count();
    if underflowed > 0 {
        warn!(
            "{underflowed} of {} samples underflow to zero radiance at {temperature} K",
            grid.len()
        );
    }

    let density = normalize_to_unit_sum(&radiance, "blackbody radiance")?;
    debug!(
        "Source spectrum at {temperature} K peaks at {:.1} nm",
        peak_wavelength(grid, &density)
    );
    Ok(density)
}

/// Grid wavelength holding the largest sample of `values`
pub fn peak_wavelength(grid: &WavelengthGrid, values: &Array1<f64>) -> f64 {
    let (index, _) = values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best), (i, &v)| {
            if v > best {
                (i, v)
            } else {
                (best_i, best)
            }
        });
    grid.wavelengths()[index]
}
