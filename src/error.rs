//! Error types for the two-bus power flow solver.
//!
//! This module provides a unified error type [`PowerFlowError`] that covers
//! configuration loading, parameter validation, and the numerical solve.

use thiserror::Error;

use crate::network::BusId;
use crate::solver::IterationState;

/// Result type alias using [`PowerFlowError`].
pub type Result<T> = std::result::Result<T, PowerFlowError>;

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum PowerFlowError {
    // ============ Configuration Errors ============
    /// A network or solver parameter is outside its feasible range
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// Error reading a configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML configuration
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // ============ Solve Errors ============
    /// Admittance matrix cannot be inverted
    #[error("Singular admittance matrix (determinant magnitude {determinant:.2e})")]
    SingularSystem { determinant: f64 },

    /// Fixed-point iteration did not reach the tolerance within the bound
    #[error(
        "Fixed-point iteration did not converge after {iterations} iterations \
         (errors: A={:.2e}, B={:.2e})",
        .error[0],
        .error[1]
    )]
    NonConvergence {
        iterations: usize,
        error: [f64; 2],
        state: IterationState,
    },

    /// A bus voltage left the finite range while iterating
    #[error("Numerical overflow at bus {bus} after {iterations} iterations (value: {value:.2e})")]
    NumericalOverflow {
        bus: BusId,
        iterations: usize,
        value: f64,
    },
}

impl PowerFlowError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a non-convergence error carrying the last iterate
    pub fn non_convergence(iterations: usize, error: [f64; 2], state: IterationState) -> Self {
        Self::NonConvergence {
            iterations,
            error,
            state,
        }
    }

    /// Process exit code for this error.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | configuration file could not be read |
    /// | 2 | invalid or unparsable configuration |
    /// | 3 | singular admittance matrix |
    /// | 4 | iteration diverged or did not converge |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigRead { .. } => 1,
            Self::InvalidParameter { .. } | Self::ConfigParse(_) => 2,
            Self::SingularSystem { .. } => 3,
            Self::NonConvergence { .. } | Self::NumericalOverflow { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = PowerFlowError::invalid_parameter("power_factor", "must be in (0, 1]");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'power_factor': must be in (0, 1]"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let singular = PowerFlowError::SingularSystem { determinant: 0.0 };
        let overflow = PowerFlowError::NumericalOverflow {
            bus: BusId::Load,
            iterations: 3,
            value: f64::INFINITY,
        };
        assert_eq!(singular.exit_code(), 3);
        assert_eq!(overflow.exit_code(), 4);
    }
}
