//! Fixed-point power flow solver.
//!
//! This module provides the numerical engine of the crate.
//!
//! ## Compensation Current Method
//!
//! The network is described by the nodal equations Y·V = I where:
//! - V = [Va, Vb] are the bus voltages
//! - Y is the 2×2 admittance matrix
//! - I = [Ia, Icomp] are the current injections
//!
//! ```text
//! [ Ya+Yab   -Yab   ] [ Va ]   [ Ia    ]
//! [ -Yab     Yl+Yab ] [ Vb ] = [ Icomp ]
//! ```
//!
//! where:
//! - Ia = Vs/Zs is the Norton current of the source
//! - Yl is the load admittance at flat start (Vb = Vs)
//! - Icomp = Yl·Vb - conj(S)/conj(Vb) is the difference between what the
//!   linear load would draw and what the constant-power load draws
//!
//! Y is assembled once; each iteration recomputes Icomp from the latest Vb
//! and solves again until neither bus voltage moves by more than the
//! tolerance (relative to the base voltage).

mod admittance;
mod fixed_point;
mod model;
mod solution;

pub use admittance::{AdmittanceMatrix, BusVoltages, CurrentInjection};
pub use fixed_point::{FixedPointSolver, IterationState, SolverConfig};
pub use model::NetworkModel;
pub use solution::{PowerBalance, PowerFlowSolution};

/// Default convergence tolerance, relative to the base voltage.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Default maximum number of fixed-point iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Relative determinant magnitude below which the admittance matrix is singular.
pub const SINGULARITY_THRESHOLD: f64 = 1e-12;
