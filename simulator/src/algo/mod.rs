//! Numerical helpers that sit downstream of the photometry models

pub mod stats;

pub use stats::{expectation_wavelength, signal_to_noise, standard_error, standard_error_of_mean};
