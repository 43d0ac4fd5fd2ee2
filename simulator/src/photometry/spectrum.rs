//! Wavelength grids, co-indexed spectral arrays, and the shared error type.
//!
//! Every array produced by the pipeline is co-indexed with a single
//! [`WavelengthGrid`]: element `i` of a spectrum, absorption profile or
//! photon-count array belongs to wavelength `i` of the grid. Stages never
//! mutate their inputs; each returns a freshly allocated array.
//!
//! # Physical Framework
//!
//! The pipeline works in SI units with wavelengths expressed in nanometers:
//! - **Wavelengths**: nanometers (nm), converted to meters for Planck's law
//! - **Spectral density**: dimensionless relative intensity per grid sample
//! - **Photon counts**: expected detections per grid sample
//!
//! # Wavelength-Energy Conversion
//!
//! - **E = hc/λ**: energy carried by a single photon
//! - **N ∝ S·λ/(hc)**: photon number from an energy-weighted density S

use ndarray::Array1;
use thiserror::Error;

/// Physical constants in SI units.
///
/// Values are fixed at the precision used throughout the simulation so
/// results are reproducible run to run.
pub struct SI {}

impl SI {
    /// Planck's constant
    /// Units: J⋅s
    pub const PLANCK_CONSTANT: f64 = 6.626e-34;

    /// Speed of light in vacuum
    /// Units: m/s
    pub const SPEED_OF_LIGHT: f64 = 2.997e8;

    /// Boltzmann constant
    /// Units: J/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.381e-23;

    /// Nanometers to meters
    pub const NM_TO_M: f64 = 1e-9;
}

/// Relative spectral intensity at each grid wavelength
pub type SpectralDensity = Array1<f64>;

/// Absorption fraction in [0, 1] at each grid wavelength
pub type AbsorptionProfile = Array1<f64>;

/// Expected detected photons at each grid wavelength
pub type PhotonCounts = Array1<f64>;

/// Errors raised by the spectral pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("Invalid wavelength range: {0}")]
    InvalidRange(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown absorption model '{0}' (expected one of: rayleigh, rayleigh_ozone)")]
    UnknownModel(String),

    #[error("Shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Degenerate spectrum: {0}")]
    DegenerateSpectrum(String),
}

/// Closed wavelength interval in nanometers.
///
/// Used for filter rejection bands and for the extent of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower wavelength bound in nanometers
    pub lower_nm: f64,

    /// Upper wavelength bound in nanometers
    pub upper_nm: f64,
}

impl Band {
    /// Create a band from lower and upper bounds in nanometers
    ///
    /// # Returns
    /// `InvalidRange` if either bound is not finite or `lower_nm > upper_nm`
    pub fn from_nm_bounds(lower_nm: f64, upper_nm: f64) -> Result<Self, SpectrumError> {
        if !lower_nm.is_finite() || !upper_nm.is_finite() {
            return Err(SpectrumError::InvalidRange(format!(
                "band bounds must be finite, got {lower_nm}..{upper_nm}"
            )));
        }
        if lower_nm > upper_nm {
            return Err(SpectrumError::InvalidRange(format!(
                "band start must not exceed end, got {lower_nm}..{upper_nm}"
            )));
        }
        Ok(Self { lower_nm, upper_nm })
    }

    /// Width of the band in nanometers
    pub fn width(&self) -> f64 {
        self.upper_nm - self.lower_nm
    }

    /// Center of the band in nanometers
    pub fn center(&self) -> f64 {
        (self.lower_nm + self.upper_nm) / 2.0
    }

    /// True if `wavelength_nm` lies inside the band, edges included
    pub fn contains(&self, wavelength_nm: f64) -> bool {
        wavelength_nm >= self.lower_nm && wavelength_nm <= self.upper_nm
    }
}

/// Ordered, evenly spaced wavelength samples in nanometers.
///
/// Immutable once built. The only way to obtain one is [`make_grid`] (or
/// its alias [`WavelengthGrid::linspace`]), which guarantees at least two
/// strictly increasing, finite samples.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthGrid {
    wavelengths_nm: Array1<f64>,
}

/// Build `count` evenly spaced wavelengths from `low` to `high`, inclusive.
///
/// # Arguments
/// * `low` - First wavelength in nanometers
/// * `high` - Last wavelength in nanometers
/// * `count` - Number of samples, at least 2
///
/// # Returns
/// `InvalidRange` when `low >= high`, `count < 2`, or a bound is not finite
pub fn make_grid(low: f64, high: f64, count: usize) -> Result<WavelengthGrid, SpectrumError> {
    if !low.is_finite() || !high.is_finite() {
        return Err(SpectrumError::InvalidRange(format!(
            "grid bounds must be finite, got {low}..{high}"
        )));
    }
    if low >= high {
        return Err(SpectrumError::InvalidRange(format!(
            "grid low ({low}) must be below high ({high})"
        )));
    }
    if count < 2 {
        return Err(SpectrumError::InvalidRange(format!(
            "grid needs at least 2 samples, got {count}"
        )));
    }

    let mut wavelengths_nm = Array1::linspace(low, high, count);
    // linspace accumulates rounding on the last sample; pin it to the bound
    wavelengths_nm[count - 1] = high;

    Ok(WavelengthGrid { wavelengths_nm })
}

impl WavelengthGrid {
    /// Alias for [`make_grid`]
    pub fn linspace(low: f64, high: f64, count: usize) -> Result<Self, SpectrumError> {
        make_grid(low, high, count)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.wavelengths_nm.len()
    }

    /// Always false; a grid holds at least two samples
    pub fn is_empty(&self) -> bool {
        self.wavelengths_nm.is_empty()
    }

    /// Sample wavelengths in nanometers
    pub fn wavelengths(&self) -> &Array1<f64> {
        &self.wavelengths_nm
    }

    /// Shortest wavelength in nanometers
    pub fn min_nm(&self) -> f64 {
        self.wavelengths_nm[0]
    }

    /// Longest wavelength in nanometers
    pub fn max_nm(&self) -> f64 {
        self.wavelengths_nm[self.len() - 1]
    }

    /// Spacing between neighbouring samples in nanometers
    pub fn step_nm(&self) -> f64 {
        (self.max_nm() - self.min_nm()) / (self.len() - 1) as f64
    }

    /// Extent of the grid as a band
    pub fn band(&self) -> Band {
        Band {
            lower_nm: self.min_nm(),
            upper_nm: self.max_nm(),
        }
    }

    /// Fail with `ShapeMismatch` unless `values` is co-indexed with this grid
    pub fn check_shape(&self, values: &Array1<f64>) -> Result<(), SpectrumError> {
        check_same_len(self.len(), values.len())
    }

    /// Fail with `InvalidRange` unless every wavelength is strictly positive
    pub fn check_positive(&self) -> Result<(), SpectrumError> {
        if self.min_nm() <= 0.0 {
            return Err(SpectrumError::InvalidRange(format!(
                "wavelengths must be positive, grid starts at {} nm",
                self.min_nm()
            )));
        }
        Ok(())
    }
}

/// Fail with `ShapeMismatch` when two co-indexed arrays differ in length
pub fn check_same_len(expected: usize, actual: usize) -> Result<(), SpectrumError> {
    if expected != actual {
        return Err(SpectrumError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// Fail with `InvalidParameter` if any sample of `values` is negative or not finite
pub fn check_non_negative(values: &Array1<f64>, what: &str) -> Result<(), SpectrumError> {
    match values
        .iter()
        .enumerate()
        .find(|&(_, &v)| !(v.is_finite() && v >= 0.0))
    {
        Some((i, v)) => Err(SpectrumError::InvalidParameter(format!(
            "{what} must be finite and non-negative, sample {i} is {v}"
        ))),
        None => Ok(()),
    }
}

/// Scale `values` so they sum to one.
///
/// # Arguments
/// * `values` - Non-negative samples
/// * `what` - Name of the quantity, used in the error message
///
/// # Returns
/// `DegenerateSpectrum` if the total is zero or not finite
pub fn normalize_to_unit_sum(
    values: &Array1<f64>,
    what: &str,
) -> Result<Array1<f64>, SpectrumError> {
    let total = values.sum();
    if total == 0.0 || !total.is_finite() {
        return Err(SpectrumError::DegenerateSpectrum(format!(
            "{what} sums to {total}, cannot normalize"
        )));
    }
    Ok(values / total)
}
