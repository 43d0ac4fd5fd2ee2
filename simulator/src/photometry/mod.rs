//! Photometry models and utilities

pub mod atmosphere;
pub mod filters;
pub mod photoconversion;
pub mod spectrum;
pub mod stellar;

pub use atmosphere::{absorption_spectrum, observed_spectrum, AbsorptionModel};
pub use filters::{apply_filters, FilterSpec};
pub use photoconversion::to_photon_counts;
pub use spectrum::{make_grid, Band, SpectrumError, WavelengthGrid, SI};
pub use stellar::{source_spectrum, BlackbodySpectrum};
