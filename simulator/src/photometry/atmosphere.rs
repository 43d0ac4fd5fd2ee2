//! Parametric atmospheric absorption and the observed-spectrum composer.
//!
//! Absorption profiles hold the fraction of light removed at each grid
//! wavelength; the light that reaches the telescope is the source density
//! scaled by the transmittance `1 − absorption`.

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array1, Zip};

use super::spectrum::{
    check_non_negative, check_same_len, AbsorptionProfile, SpectralDensity, SpectrumError,
    WavelengthGrid,
};

/// Wavelength span over which the ozone phase advances by π, in nm
const OZONE_HALF_PERIOD_NM: f64 = 200.0;

/// Weight of the Rayleigh term in the combined model
const RAYLEIGH_WEIGHT: f64 = 0.6;

/// Weight of the ozone term in the combined model
const OZONE_WEIGHT: f64 = 0.4;

/// Selectable atmospheric absorption model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsorptionModel {
    /// Pure Rayleigh scattering, λ⁻⁴ scaled to peak at 1
    Rayleigh,
    /// 60% Rayleigh plus 40% sinusoidal ozone band, clamped to [0, 1]
    RayleighOzone,
}

impl AbsorptionModel {
    /// Every supported model
    pub const ALL: [AbsorptionModel; 2] =
        [AbsorptionModel::Rayleigh, AbsorptionModel::RayleighOzone];

    /// Canonical selector name
    pub fn name(&self) -> &'static str {
        match self {
            AbsorptionModel::Rayleigh => "rayleigh",
            AbsorptionModel::RayleighOzone => "rayleigh_ozone",
        }
    }
}

impl fmt::Display for AbsorptionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AbsorptionModel {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AbsorptionModel::ALL
            .into_iter()
            .find(|model| model.name() == normalized)
            .ok_or_else(|| SpectrumError::UnknownModel(s.to_string()))
    }
}

/// Rayleigh absorption: λ⁻⁴ scaled to 1 at the grid's shortest wavelength
///
/// rayleigh(λ) = (λ_min / λ)⁴
pub fn rayleigh_absorption(grid: &WavelengthGrid) -> Result<AbsorptionProfile, SpectrumError> {
    grid.check_positive()?;
    let low = grid.min_nm();
    // Ratio first: raw λ⁻⁴ under/overflows at extreme grid scales
    Ok(grid.wavelengths().mapv(|nm| (low / nm).powi(4)))
}

/// Sinusoidal ozone band, phase-referenced to the grid's shortest wavelength
///
/// ozone(λ) = 0.5 + 0.4 sin((λ − λ_min) π / 200)
pub fn ozone_band(grid: &WavelengthGrid) -> Array1<f64> {
    let low = grid.min_nm();
    grid.wavelengths()
        .mapv(|nm| 0.5 + 0.4 * ((nm - low) * std::f64::consts::PI / OZONE_HALF_PERIOD_NM).sin())
}

/// Absorption fraction at every grid wavelength for `model`.
///
/// Output lies in [0, 1] for any grid of strictly positive wavelengths.
pub fn absorption_spectrum(
    grid: &WavelengthGrid,
    model: AbsorptionModel,
) -> Result<AbsorptionProfile, SpectrumError> {
    let rayleigh = rayleigh_absorption(grid)?;
    let profile = match model {
        AbsorptionModel::Rayleigh => rayleigh,
        AbsorptionModel::RayleighOzone => {
            let ozone = ozone_band(grid);
            Zip::from(&rayleigh)
                .and(&ozone)
                .map_collect(|&r, &o| (RAYLEIGH_WEIGHT * r + OZONE_WEIGHT * o).clamp(0.0, 1.0))
        }
    };
    debug!(
        "{model} absorption: mean {:.4} over {} samples",
        profile.mean().unwrap_or(0.0),
        profile.len()
    );
    Ok(profile)
}

/// Absorption profile for a model given by name.
///
/// # Returns
/// `UnknownModel` when `name` is not a supported selector
pub fn absorption_spectrum_named(
    grid: &WavelengthGrid,
    name: &str,
) -> Result<AbsorptionProfile, SpectrumError> {
    let model: AbsorptionModel = name.parse()?;
    absorption_spectrum(grid, model)
}

/// Fraction of light transmitted, `1 − absorption`
pub fn transmittance(absorption: &AbsorptionProfile) -> Array1<f64> {
    absorption.mapv(|a| 1.0 - a)
}

/// Source density after passing through the atmosphere.
///
/// Element-wise `source · (1 − absorption)`.
///
/// # Returns
/// * `ShapeMismatch` - the two arrays are not co-indexed
/// * `InvalidParameter` - a source sample is negative or not finite, or an
///   absorption sample lies outside [0, 1]
pub fn observed_spectrum(
    source: &SpectralDensity,
    absorption: &AbsorptionProfile,
) -> Result<SpectralDensity, SpectrumError> {
    check_same_len(source.len(), absorption.len())?;
    check_non_negative(source, "source spectrum")?;
    if let Some((i, a)) = absorption
        .iter()
        .enumerate()
        .find(|&(_, a)| !(0.0..=1.0).contains(a))
    {
        return Err(SpectrumError::InvalidParameter(format!(
            "absorption must lie in [0, 1], sample {i} is {a}"
        )));
    }
    Ok(Zip::from(source)
        .and(absorption)
        .map_collect(|&s, &a| s * (1.0 - a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photometry::spectrum::make_grid;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_names_round_trip() {
        for model in AbsorptionModel::ALL {
            assert_eq!(model.name().parse::<AbsorptionModel>().unwrap(), model);
        }
        assert_eq!(
            "Rayleigh-Ozone".parse::<AbsorptionModel>().unwrap(),
            AbsorptionModel::RayleighOzone
        );
    }

    #[test]
    fn test_unknown_model() {
        let grid = make_grid(400.0, 800.0, 10).unwrap();
        assert_eq!(
            absorption_spectrum_named(&grid, "unknown_variant"),
            Err(SpectrumError::UnknownModel("unknown_variant".to_string()))
        );
    }

    #[test]
    fn test_rayleigh_peaks_at_short_end() {
        let grid = make_grid(400.0, 800.0, 5).unwrap();
        let a = absorption_spectrum(&grid, AbsorptionModel::Rayleigh).unwrap();
        assert_relative_eq!(a[0], 1.0);
        assert_relative_eq!(a[4], 1.0 / 16.0, epsilon = 1e-12);
        for i in 1..a.len() {
            assert!(a[i] < a[i - 1]);
        }
    }

    #[test]
    fn test_ozone_phase_reference_is_grid_min() {
        let grid = make_grid(500.0, 900.0, 5).unwrap();
        let ozone = ozone_band(&grid);
        assert_relative_eq!(ozone[0], 0.5, epsilon = 1e-12);
        // (600 - 500) π / 200 = π/2
        assert_relative_eq!(ozone[1], 0.9, epsilon = 1e-12);
        assert_relative_eq!(ozone[3], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_combined_model_values() {
        let grid = make_grid(400.0, 800.0, 5).unwrap();
        let a = absorption_spectrum(&grid, AbsorptionModel::RayleighOzone).unwrap();
        // At 400 nm: 0.6 * 1 + 0.4 * 0.5
        assert_relative_eq!(a[0], 0.8, epsilon = 1e-12);
        // At 500 nm: 0.6 * (400/500)^4 + 0.4 * 0.9
        assert_relative_eq!(a[1], 0.6 * 0.4096 + 0.36, epsilon = 1e-12);
    }

    #[test]
    fn test_absorption_within_unit_interval() {
        let grids = [
            make_grid(400.0, 800.0, 100).unwrap(),
            make_grid(1.0, 10_000.0, 257).unwrap(),
            make_grid(0.5, 0.6, 3).unwrap(),
        ];
        for grid in &grids {
            for model in AbsorptionModel::ALL {
                let a = absorption_spectrum(grid, model).unwrap();
                assert_eq!(a.len(), grid.len());
                assert!(a.iter().all(|&v| (0.0..=1.0).contains(&v)), "{model} out of range");
            }
        }
    }

    #[test]
    fn test_observed_spectrum_applies_transmittance() {
        let source = Array1::from(vec![0.25, 0.25, 0.5]);
        let absorption = Array1::from(vec![0.0, 1.0, 0.5]);
        let observed = observed_spectrum(&source, &absorption).unwrap();
        assert_eq!(observed.to_vec(), vec![0.25, 0.0, 0.25]);
        assert_eq!(transmittance(&absorption).to_vec(), vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_absorption_within_unit_interval_at_extreme_scales() {
        let grids = [
            make_grid(1e90, 2e90, 3).unwrap(),
            make_grid(1e-90, 2e-90, 3).unwrap(),
            make_grid(1e-300, 1e300, 5).unwrap(),
        ];
        for grid in &grids {
            for model in AbsorptionModel::ALL {
                let a = absorption_spectrum(grid, model).unwrap();
                assert!(
                    a.iter().all(|&v| (0.0..=1.0).contains(&v)),
                    "{model} out of range on {:?}: {a}",
                    grid.band()
                );
            }
            let rayleigh = rayleigh_absorption(grid).unwrap();
            assert_eq!(rayleigh[0], 1.0);
        }
    }

    #[test]
    fn test_observed_spectrum_rejects_invalid_inputs() {
        let source = Array1::from(vec![0.5, 0.5]);
        for absorption in [vec![0.1, 1.5], vec![-0.1, 0.2], vec![f64::NAN, 0.2]] {
            assert!(matches!(
                observed_spectrum(&source, &Array1::from(absorption)),
                Err(SpectrumError::InvalidParameter(_))
            ));
        }

        let absorption = Array1::from(vec![0.1, 0.2]);
        for source in [vec![1.0, -0.5], vec![f64::INFINITY, 0.5]] {
            assert!(matches!(
                observed_spectrum(&Array1::from(source), &absorption),
                Err(SpectrumError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_observed_spectrum_shape_mismatch() {
        let source = Array1::from(vec![0.5, 0.5]);
        let absorption = Array1::from(vec![0.1, 0.2, 0.3]);
        assert_eq!(
            observed_spectrum(&source, &absorption),
            Err(SpectrumError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }
}
