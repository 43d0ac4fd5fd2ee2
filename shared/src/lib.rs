//! Shared components and utilities for the photon-count simulator crates.
//!
//! Holds the unit types and command-line argument parsers used by more than
//! one crate or binary in the workspace.

pub mod range_arg;
pub mod units;

pub use range_arg::{GridArg, RangeArg, RangeArgError};
pub use units::{parse_temperature, Temperature, TemperatureExt, TemperatureParseError};
