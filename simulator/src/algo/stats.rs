//! Photon-counting statistics for simulated observations
//!
//! Each grid sample's detected count is modeled as an independent Poisson
//! draw whose mean is the expected count, so the shot noise of a bin is the
//! square root of its expected count.

use ndarray::{Array1, Zip};

use crate::photometry::spectrum::{
    check_non_negative, check_same_len, PhotonCounts, SpectrumError, WavelengthGrid,
};

/// Poisson standard deviation of each bin, `sqrt(counts_i)`
///
/// # Returns
/// `InvalidParameter` if a count is negative or not finite
pub fn standard_error(photon_counts: &PhotonCounts) -> Result<Array1<f64>, SpectrumError> {
    check_non_negative(photon_counts, "photon counts")?;
    Ok(photon_counts.mapv(f64::sqrt))
}

/// Standard error of the mean count after averaging `measurements` exposures
///
/// `sqrt(counts_i) / sqrt(measurements)`
///
/// # Returns
/// `InvalidParameter` when `measurements` is zero or a count is invalid
pub fn standard_error_of_mean(
    photon_counts: &PhotonCounts,
    measurements: usize,
) -> Result<Array1<f64>, SpectrumError> {
    if measurements == 0 {
        return Err(SpectrumError::InvalidParameter(
            "number of measurements must be at least 1".to_string(),
        ));
    }
    let scale = (measurements as f64).sqrt();
    Ok(standard_error(photon_counts)? / scale)
}

/// Shot-noise limited signal-to-noise ratio per bin
///
/// `counts_i / sqrt(counts_i)`, or 0 for an empty bin.
pub fn signal_to_noise(photon_counts: &PhotonCounts) -> Array1<f64> {
    photon_counts.mapv(|c| if c > 0.0 { c.sqrt() } else { 0.0 })
}

/// Photon-count weighted mean wavelength in nanometers
///
/// `Σ(λ_i · counts_i) / Σ(counts_i)`
///
/// # Returns
/// * `ShapeMismatch` - counts not co-indexed with the grid
/// * `InvalidParameter` - a count is negative or not finite
/// * `DegenerateSpectrum` - the counts sum to zero
pub fn expectation_wavelength(
    grid: &WavelengthGrid,
    photon_counts: &PhotonCounts,
) -> Result<f64, SpectrumError> {
    check_same_len(grid.len(), photon_counts.len())?;
    check_non_negative(photon_counts, "photon counts")?;

    let total = photon_counts.sum();
    if total == 0.0 || !total.is_finite() {
        return Err(SpectrumError::DegenerateSpectrum(format!(
            "photon counts sum to {total}, expectation wavelength undefined"
        )));
    }

    let weighted = Zip::from(grid.wavelengths())
        .and(photon_counts)
        .fold(0.0, |acc, &nm, &count| acc + nm * count);

    // Rounding can nudge the mean a hair outside the grid when all counts sit on an edge
    Ok((weighted / total).clamp(grid.min_nm(), grid.max_nm()))
}
