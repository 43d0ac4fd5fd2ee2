//! Simulation runs: parameters, the staged pipeline, configs and reports

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, GridSpec, SimulationConfig};
pub use pipeline::{run_batch, run_simulation, SimulationParameters, SimulationResult};
