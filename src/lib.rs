//! # Twobus
//!
//! Steady-state power flow for a two-bus network solved by fixed-point
//! iteration.
//!
//! The network is a source (EMF behind an impedance) at bus A feeding a
//! constant-power load at bus B through a series line impedance.
//!
//! This library provides:
//! - Validated network parameters loadable from TOML
//! - A constant 2×2 nodal admittance model with a flat-start load admittance
//! - A fixed-point iterator that represents the constant-power load as a
//!   compensation current on top of the linear network
//! - Power balance and a console report of the converged operating point
//!
//! ## Architecture
//!
//! - [`network`] - Network parameters, configuration and validation
//! - [`solver`] - Admittance model, fixed-point iteration and solution
//! - [`report`] - Phasor views and the console report
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! twobus --config feeder.toml --power-factor 0.9 -v
//! ```
//!
//! ### Library
//!
//! ```
//! use twobus::{solve, PowerFlowConfig};
//!
//! let solution = solve(&PowerFlowConfig::default()).unwrap();
//! assert!(solution.error.iter().all(|&e| e < 1e-7));
//! ```

pub mod error;
pub mod network;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use error::{PowerFlowError, Result};
pub use network::{BusId, NetworkParameters, PowerFlowConfig};
pub use solver::{FixedPointSolver, NetworkModel, PowerFlowSolution, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

/// Validate a configuration, build the network model and iterate to convergence.
pub fn solve(config: &PowerFlowConfig) -> Result<PowerFlowSolution> {
    config.validate()?;
    let model = NetworkModel::build(&config.network)?;
    FixedPointSolver::with_config(config.solver.clone()).solve(&model)
}
