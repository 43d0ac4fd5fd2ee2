//! Type-safe physical units for the spectral simulation
//!
//! Temperatures travel through run parameters as `uom` quantities so that
//! Celsius and Kelvin inputs cannot be confused. The numeric core works in
//! plain kelvin floats obtained through [`TemperatureExt::as_kelvin`].

use thiserror::Error;
use uom::si::f64::ThermodynamicTemperature;
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

/// Source and sensor temperatures
pub type Temperature = ThermodynamicTemperature;

/// Construction from and conversion to plain floats
pub trait TemperatureExt {
    /// Create temperature from degrees Celsius
    fn from_celsius(celsius: f64) -> Self;

    /// Create temperature from Kelvin
    fn from_kelvin(kelvin: f64) -> Self;

    /// Get temperature in Kelvin
    fn as_kelvin(&self) -> f64;
}

impl TemperatureExt for Temperature {
    fn from_celsius(celsius: f64) -> Self {
        Temperature::new::<degree_celsius>(celsius)
    }

    fn from_kelvin(value: f64) -> Self {
        Temperature::new::<kelvin>(value)
    }

    fn as_kelvin(&self) -> f64 {
        self.get::<kelvin>()
    }
}

/// Rejected command-line temperature, holding the original input
#[derive(Debug, Error, PartialEq)]
#[error("invalid temperature '{0}', expected a finite number with optional K or C suffix (e.g. 5780, 5780K, 25C)")]
pub struct TemperatureParseError(pub String);

/// Parse a command-line temperature.
///
/// A bare number or a `K` suffix means Kelvin; `C` or `°C` means degrees
/// Celsius. Suffixes are case-insensitive and may follow a space.
pub fn parse_temperature(s: &str) -> Result<Temperature, TemperatureParseError> {
    let trimmed = s.trim();
    let invalid = || TemperatureParseError(s.to_string());

    let (number, celsius) = if let Some(rest) = trimmed.strip_suffix(&['C', 'c'][..]) {
        let rest = rest.trim_end();
        (rest.strip_suffix('°').unwrap_or(rest), true)
    } else if let Some(rest) = trimmed.strip_suffix(&['K', 'k'][..]) {
        (rest, false)
    } else {
        (trimmed, false)
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    Ok(if celsius {
        Temperature::from_celsius(value)
    } else {
        Temperature::from_kelvin(value)
    })
}
