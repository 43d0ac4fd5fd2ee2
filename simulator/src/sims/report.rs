//! Tabular and JSON export of a finished run.
//!
//! The CSV table has one row per grid wavelength; the JSON record carries the
//! same arrays plus the run inputs and scalar results, as plain lists so that
//! plotting tools can consume it without knowing about ndarray.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::algo::stats::signal_to_noise;
use crate::sims::config::FilterConfig;
use crate::sims::pipeline::SimulationResult;

const CSV_HEADERS: [&str; 11] = [
    "wavelength_nm",
    "source",
    "absorption",
    "observed",
    "filtered",
    "source_photons",
    "observed_photons",
    "filtered_photons",
    "standard_error",
    "standard_error_of_mean",
    "snr",
];

/// Write the per-wavelength table as CSV to any writer
pub fn write_table<W: Write>(result: &SimulationResult, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADERS.join(","))?;

    let snr = signal_to_noise(&result.filtered_counts);
    for (i, nm) in result.grid.wavelengths().iter().enumerate() {
        writeln!(
            out,
            "{:.4},{:.6e},{:.6},{:.6e},{:.6e},{:.6},{:.6},{:.6},{:.6},{:.6},{:.4}",
            nm,
            result.source[i],
            result.absorption[i],
            result.observed[i],
            result.filtered[i],
            result.source_counts[i],
            result.observed_counts[i],
            result.filtered_counts[i],
            result.standard_error[i],
            result.standard_error_of_mean[i],
            snr[i],
        )?;
    }
    out.flush()
}

/// Write the per-wavelength table to a CSV file
pub fn write_csv(result: &SimulationResult, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    write_table(result, BufWriter::new(file))?;
    info!("Wrote {} rows to {}", result.grid.len(), path.display());
    Ok(())
}

/// Serializable snapshot of a run
#[derive(Debug, Serialize)]
pub struct RunRecord {
    pub temperature_k: f64,
    pub photon_budget: f64,
    pub absorption_model: String,
    pub filters: Vec<FilterConfig>,
    pub measurements: usize,

    pub wavelength_nm: Vec<f64>,
    pub source: Vec<f64>,
    pub absorption: Vec<f64>,
    pub observed: Vec<f64>,
    pub filtered: Vec<f64>,
    pub source_photons: Vec<f64>,
    pub observed_photons: Vec<f64>,
    pub filtered_photons: Vec<f64>,
    pub standard_error: Vec<f64>,
    pub standard_error_of_mean: Vec<f64>,

    pub detected_photons: f64,
    pub rejected_photons: f64,
    pub expectation_wavelength_nm: f64,
    pub unfiltered_expectation_nm: f64,
}

impl From<&SimulationResult> for RunRecord {
    fn from(result: &SimulationResult) -> Self {
        let params = &result.parameters;
        Self {
            temperature_k: params.temperature_k(),
            photon_budget: params.photon_budget(),
            absorption_model: params.absorption_model().name().to_string(),
            filters: params.filters().iter().map(FilterConfig::from).collect(),
            measurements: params.measurements(),
            wavelength_nm: result.grid.wavelengths().to_vec(),
            source: result.source.to_vec(),
            absorption: result.absorption.to_vec(),
            observed: result.observed.to_vec(),
            filtered: result.filtered.to_vec(),
            source_photons: result.source_counts.to_vec(),
            observed_photons: result.observed_counts.to_vec(),
            filtered_photons: result.filtered_counts.to_vec(),
            standard_error: result.standard_error.to_vec(),
            standard_error_of_mean: result.standard_error_of_mean.to_vec(),
            detected_photons: result.detected_photons(),
            rejected_photons: result.rejected_photons(),
            expectation_wavelength_nm: result.expectation_wavelength_nm,
            unfiltered_expectation_nm: result.unfiltered_expectation_nm,
        }
    }
}

/// Write the full run as pretty-printed JSON
pub fn write_json(result: &SimulationResult, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(&RunRecord::from(result))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)?;
    info!("Wrote run record to {}", path.display());
    Ok(())
}

/// One-line human readable summary of a run
pub fn summary_line(result: &SimulationResult) -> String {
    let params = &result.parameters;
    format!(
        "T={:.0} K model={} filters={} photons={:.4e}/{:.4e} expectation={:.2} nm (unfiltered {:.2} nm)",
        params.temperature_k(),
        params.absorption_model(),
        params.filters().len(),
        result.detected_photons(),
        params.photon_budget(),
        result.expectation_wavelength_nm,
        result.unfiltered_expectation_nm,
    )
}
