//! Spectral density to expected photon count conversion.
//!
//! A spectral density is energy-weighted: a sample at wavelength λ carries
//! energy in quanta of `hc/λ`. Dividing by the photon energy turns it into a
//! quantity proportional to photon number, which is then renormalized and
//! scaled to the observation's photon budget.

use log::debug;
use ndarray::{Array1, Zip};

use super::spectrum::{
    check_non_negative, normalize_to_unit_sum, PhotonCounts, SpectralDensity, SpectrumError,
    WavelengthGrid, SI,
};

/// Energy of one photon at `wavelength_nm`, in joules
///
/// E = hc/λ
pub fn photon_energy(wavelength_nm: f64) -> f64 {
    SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT / (wavelength_nm * SI::NM_TO_M)
}

/// Per-sample photon-number weights, `spectrum_i · λ_i / (hc)`.
///
/// The result is proportional to the number of photons in each sample but
/// not normalized.
pub fn photon_weights(
    spectrum: &SpectralDensity,
    grid: &WavelengthGrid,
) -> Result<Array1<f64>, SpectrumError> {
    grid.check_shape(spectrum)?;
    Ok(Zip::from(spectrum)
        .and(grid.wavelengths())
        .map_collect(|&s, &nm| s / photon_energy(nm)))
}

/// Expected photon counts for an observation detecting `photon_budget` photons.
///
/// # Algorithm
/// 1. Weight each sample by λ/(hc) to go from energy to photon number
/// 2. Renormalize the weights to unit sum
/// 3. Scale by `photon_budget`
///
/// # Returns
/// * `InvalidParameter` - budget not finite and strictly positive, or a
///   spectrum sample negative or not finite
/// * `ShapeMismatch` - spectrum not co-indexed with the grid
/// * `DegenerateSpectrum` - spectrum sums to zero
pub fn to_photon_counts(
    spectrum: &SpectralDensity,
    grid: &WavelengthGrid,
    photon_budget: f64,
) -> Result<PhotonCounts, SpectrumError> {
    if !(photon_budget.is_finite() && photon_budget > 0.0) {
        return Err(SpectrumError::InvalidParameter(format!(
            "photon budget must be positive, got {photon_budget}"
        )));
    }
    grid.check_shape(spectrum)?;
    check_non_negative(spectrum, "spectrum")?;
    if spectrum.sum() == 0.0 {
        return Err(SpectrumError::DegenerateSpectrum(
            "spectrum sums to zero, no photons to distribute".to_string(),
        ));
    }

    let weights = photon_weights(spectrum, grid)?;
    let distribution = normalize_to_unit_sum(&weights, "photon-weighted spectrum")?;
    let counts = distribution * photon_budget;

    debug!(
        "Converted spectrum into {:.3e} photons over {} samples",
        counts.sum(),
        counts.len()
    );
    Ok(counts)
}
