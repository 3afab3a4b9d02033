//! TOML configuration for a power flow run.
//!
//! ```toml
//! [network]
//! base_voltage = 127.0
//! source_voltage = [127.0, 0.0]
//! source_impedance = [0.05, 0.1]
//! line_impedance = [0.05, 0.1]
//! load_power = 1000.0
//! power_factor = 0.95
//!
//! [solver]
//! tolerance = 1e-7
//! max_iterations = 100
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PowerFlowError, Result};
use crate::solver::SolverConfig;

use super::validate::{validate_parameters, validate_solver_config};
use super::NetworkParameters;

/// Complete input for one solve: network description plus iteration settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerFlowConfig {
    /// Network parameters.
    #[serde(default)]
    pub network: NetworkParameters,
    /// Iteration settings.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl PowerFlowConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| PowerFlowError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check both sections against their feasible ranges.
    pub fn validate(&self) -> Result<()> {
        validate_parameters(&self.network)?;
        validate_solver_config(&self.solver)
    }
}
