//! Ground-based optical observation simulator
//!
//! This crate synthesizes a blackbody source spectrum, attenuates it through
//! a parametric atmospheric absorption model, applies band-reject filters,
//! converts the result into expected photon counts for a finite photon
//! budget, and derives Poisson shot noise and the photon-weighted
//! expectation wavelength.

pub mod algo;
pub mod photometry;
pub mod shared_args;
pub mod sims;

// Re-exports for easier access
pub use algo::stats::{expectation_wavelength, standard_error};
pub use photometry::atmosphere::{absorption_spectrum, observed_spectrum, AbsorptionModel};
pub use photometry::filters::{apply_filters, FilterSpec};
pub use photometry::photoconversion::to_photon_counts;
pub use photometry::spectrum::{make_grid, SpectrumError, WavelengthGrid};
pub use photometry::stellar::source_spectrum;
pub use sims::{run_batch, run_simulation, SimulationConfig, SimulationParameters, SimulationResult};
