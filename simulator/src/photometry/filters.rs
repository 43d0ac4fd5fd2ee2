//! Band-reject wavelength filters.
//!
//! A [`FilterSpec`] removes all light in the closed band
//! `[target − bandwidth, target + bandwidth]`. Several filters combine by
//! multiplying their 0/1 masks, so the result does not depend on filter
//! order and applying the same filter twice changes nothing.
//!
//! Filtering never renormalizes: a filtered spectrum sums to less than its
//! input whenever a band covers a non-zero sample.
//!
//! # Examples
//! ```rust
//! use simulator::photometry::filters::{apply_filters, FilterSpec};
//! use simulator::photometry::spectrum::make_grid;
//! use ndarray::Array1;
//!
//! let grid = make_grid(400.0, 800.0, 5).unwrap();
//! let spectrum = Array1::from(vec![0.2; 5]);
//!
//! // Reject red light, 620-750 nm
//! let red = FilterSpec::new(685.0, 65.0).unwrap();
//! let filtered = apply_filters(&spectrum, &grid, &[red]).unwrap();
//! assert_eq!(filtered.to_vec(), vec![0.2, 0.2, 0.2, 0.0, 0.2]);
//! ```

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use ndarray::Array1;

use super::spectrum::{Band, SpectralDensity, SpectrumError, WavelengthGrid};

/// A band-reject filter centered on `target_nm`, rejecting ±`bandwidth_nm`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Center of the rejection band in nanometers
    target_nm: f64,

    /// Half-width of the rejection band in nanometers
    bandwidth_nm: f64,
}

impl FilterSpec {
    /// Create a filter rejecting `[target_nm − bandwidth_nm, target_nm + bandwidth_nm]`
    ///
    /// # Returns
    /// `InvalidParameter` unless both values are finite and strictly positive
    pub fn new(target_nm: f64, bandwidth_nm: f64) -> Result<Self, SpectrumError> {
        if !(target_nm.is_finite() && target_nm > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "filter target wavelength must be positive, got {target_nm} nm"
            )));
        }
        if !(bandwidth_nm.is_finite() && bandwidth_nm > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "filter bandwidth must be positive, got {bandwidth_nm} nm"
            )));
        }
        Ok(Self {
            target_nm,
            bandwidth_nm,
        })
    }

    /// Center of the rejection band in nanometers
    pub fn target_nm(&self) -> f64 {
        self.target_nm
    }

    /// Half-width of the rejection band in nanometers
    pub fn bandwidth_nm(&self) -> f64 {
        self.bandwidth_nm
    }

    /// The closed rejection band
    pub fn band(&self) -> Band {
        Band {
            lower_nm: self.target_nm - self.bandwidth_nm,
            upper_nm: self.target_nm + self.bandwidth_nm,
        }
    }

    /// True if light at `wavelength_nm` is rejected
    pub fn rejects(&self, wavelength_nm: f64) -> bool {
        self.band().contains(wavelength_nm)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_nm, self.bandwidth_nm)
    }
}

/// Parses "target:bandwidth", e.g. "685:65"
impl FromStr for FilterSpec {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(SpectrumError::InvalidParameter(format!(
                "filter must be in format 'target:bandwidth', got '{s}'"
            )));
        }
        let parse = |what: &str, value: &str| {
            value.parse::<f64>().map_err(|_| {
                SpectrumError::InvalidParameter(format!("invalid filter {what}: '{value}'"))
            })
        };
        FilterSpec::new(parse("target", parts[0])?, parse("bandwidth", parts[1])?)
    }
}

/// Combined 0/1 transmission mask of `filters` on `grid`.
///
/// 0 where any filter rejects the wavelength, 1 elsewhere.
pub fn rejection_mask(grid: &WavelengthGrid, filters: &[FilterSpec]) -> Array1<f64> {
    grid.wavelengths().mapv(|nm| {
        if filters.iter().any(|f| f.rejects(nm)) {
            0.0
        } else {
            1.0
        }
    })
}

/// Zero `spectrum` inside every filter's rejection band.
///
/// Samples outside all bands are copied through unchanged, and an empty
/// filter list returns an exact copy of the input. Works on any co-indexed
/// array, so it applies equally to spectral densities and photon counts.
///
/// # Returns
/// `ShapeMismatch` when `spectrum` is not co-indexed with `grid`
pub fn apply_filters(
    spectrum: &SpectralDensity,
    grid: &WavelengthGrid,
    filters: &[FilterSpec],
) -> Result<SpectralDensity, SpectrumError> {
    grid.check_shape(spectrum)?;
    if filters.is_empty() {
        return Ok(spectrum.clone());
    }

    let mask = rejection_mask(grid, filters);
    let rejected = mask.iter().filter(|&&m| m == 0.0).count();
    if rejected == grid.len() {
        warn!("Filters reject every one of the {} grid samples", grid.len());
    } else {
        debug!(
            "{} filter(s) reject {rejected} of {} samples",
            filters.len(),
            grid.len()
        );
    }

    Ok(spectrum * &mask)
}
