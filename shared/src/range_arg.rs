//! Command-line argument types for parameter sweeps and wavelength grids.
//!
//! Both types implement `FromStr`, so clap accepts them directly as
//! `#[arg]` field types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a range or grid argument
#[derive(Debug, Error, PartialEq)]
pub enum RangeArgError {
    #[error("expected {expected} colon-separated fields, got '{input}'")]
    FieldCount { expected: usize, input: String },

    #[error("invalid {field} value: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("step cannot be zero")]
    ZeroStep,

    #[error("step {step} does not move from {start} towards {stop}")]
    WrongDirection { start: f64, stop: f64, step: f64 },

    #[error("range values must be finite, got {start}:{stop}:{step}")]
    NonFinite { start: f64, stop: f64, step: f64 },

    #[error("range {start}:{stop}:{step} has more than {max} steps")]
    TooManySteps {
        start: f64,
        stop: f64,
        step: f64,
        max: usize,
    },

    #[error("grid needs low < high and at least 2 samples, got {low}:{high}:{count}")]
    InvalidGrid { low: f64, high: f64, count: usize },
}

fn split_fields(s: &str, expected: usize) -> Result<Vec<&str>, RangeArgError> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.len() != expected {
        return Err(RangeArgError::FieldCount {
            expected,
            input: s.to_string(),
        });
    }
    Ok(parts)
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, RangeArgError> {
    value.parse::<T>().map_err(|_| RangeArgError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Upper bound on the number of steps in one sweep
pub const MAX_RANGE_STEPS: usize = 1_000_000;

/// Parameter sweep in "start:stop:step" form, stop inclusive.
///
/// Used for temperature sweeps such as `3000:10000:500`. Reverse sweeps
/// take a negative step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeArg {
    start: f64,
    stop: f64,
    step: f64,
}

impl RangeArg {
    /// Build a validated sweep of at most [`MAX_RANGE_STEPS`] steps
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self, RangeArgError> {
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(RangeArgError::NonFinite { start, stop, step });
        }
        if step == 0.0 {
            return Err(RangeArgError::ZeroStep);
        }
        if (step > 0.0 && start > stop) || (step < 0.0 && start < stop) {
            return Err(RangeArgError::WrongDirection { start, stop, step });
        }
        let span = (stop - start) / step;
        if !span.is_finite() || span > MAX_RANGE_STEPS as f64 {
            return Err(RangeArgError::TooManySteps {
                start,
                stop,
                step,
                max: MAX_RANGE_STEPS,
            });
        }
        Ok(Self { start, stop, step })
    }

    /// First value of the sweep
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Last value the sweep may reach
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Increment between values
    pub fn step(&self) -> f64 {
        self.step
    }

    /// All values from start to stop (inclusive) by step.
    ///
    /// Values are computed as `start + i * step` so long sweeps do not
    /// accumulate rounding drift, and the stop value survives a half-ulp
    /// overshoot.
    pub fn values(&self) -> Vec<f64> {
        let span = (self.stop - self.start) / self.step;
        let steps = (span + 1e-9).floor() as usize;
        (0..=steps)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

impl FromStr for RangeArg {
    type Err = RangeArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_fields(s, 3)?;
        RangeArg::new(
            parse_field("start", parts[0])?,
            parse_field("stop", parts[1])?,
            parse_field("step", parts[2])?,
        )
    }
}

impl fmt::Display for RangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.step)
    }
}

/// Evenly sampled interval in "low:high:count" form, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridArg {
    pub low: f64,
    pub high: f64,
    pub count: usize,
}

impl FromStr for GridArg {
    type Err = RangeArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_fields(s, 3)?;
        let low: f64 = parse_field("low", parts[0])?;
        let high: f64 = parse_field("high", parts[1])?;
        let count: usize = parse_field("count", parts[2])?;

        if low.is_nan() || high.is_nan() || low >= high || count < 2 {
            return Err(RangeArgError::InvalidGrid { low, high, count });
        }
        Ok(Self { low, high, count })
    }
}

impl fmt::Display for GridArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.low, self.high, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_range_parse_and_values() {
        let range: RangeArg = "3000:5000:500".parse().unwrap();
        assert_eq!(range.values(), vec![3000.0, 3500.0, 4000.0, 4500.0, 5000.0]);
    }

    #[test]
    fn test_range_fractional_step_keeps_stop() {
        let range: RangeArg = "0.0:1.0:0.1".parse().unwrap();
        let values = range.values();
        assert_eq!(values.len(), 11);
        assert_relative_eq!(*values.last().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_range_reverse() {
        let range: RangeArg = "10:0:-5".parse().unwrap();
        assert_eq!(range.values(), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_range_rejects_bad_input() {
        assert_eq!("1:2:0".parse::<RangeArg>(), Err(RangeArgError::ZeroStep));
        assert!(matches!(
            "5:1:1".parse::<RangeArg>(),
            Err(RangeArgError::WrongDirection { .. })
        ));
        assert!(matches!(
            "1:2".parse::<RangeArg>(),
            Err(RangeArgError::FieldCount { expected: 3, .. })
        ));
        assert!(matches!(
            "a:2:1".parse::<RangeArg>(),
            Err(RangeArgError::InvalidNumber { field: "start", .. })
        ));
    }

    #[test]
    fn test_range_rejects_unbounded_sweeps() {
        assert!(matches!(
            "0:inf:1".parse::<RangeArg>(),
            Err(RangeArgError::NonFinite { .. })
        ));
        assert!(matches!(
            "NaN:10:1".parse::<RangeArg>(),
            Err(RangeArgError::NonFinite { .. })
        ));
        assert!(matches!(
            "1:1e30:1".parse::<RangeArg>(),
            Err(RangeArgError::TooManySteps { .. })
        ));
        assert!(matches!(
            RangeArg::new(-f64::MAX, f64::MAX, 1e300),
            Err(RangeArgError::TooManySteps { .. })
        ));

        let widest = RangeArg::new(0.0, MAX_RANGE_STEPS as f64, 1.0).unwrap();
        assert_eq!(widest.values().len(), MAX_RANGE_STEPS + 1);
    }

    #[test]
    fn test_grid_parse() {
        let grid: GridArg = "400:800:100".parse().unwrap();
        assert_eq!(
            grid,
            GridArg {
                low: 400.0,
                high: 800.0,
                count: 100
            }
        );
        assert_eq!(grid.to_string(), "400:800:100");
    }

    #[test]
    fn test_grid_rejects_degenerate() {
        assert!(matches!(
            "800:400:100".parse::<GridArg>(),
            Err(RangeArgError::InvalidGrid { .. })
        ));
        assert!(matches!(
            "400:800:1".parse::<GridArg>(),
            Err(RangeArgError::InvalidGrid { .. })
        ));
        assert!(matches!(
            "400:800:-3".parse::<GridArg>(),
            Err(RangeArgError::InvalidNumber { field: "count", .. })
        ));
    }
}
