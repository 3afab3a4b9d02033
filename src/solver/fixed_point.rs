//! Fixed-point iteration with a compensation current at the load bus.

use num_complex::Complex64;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{PowerFlowError, Result};
use crate::network::{validate_solver_config, BusId};

use super::admittance::BusVoltages;
use super::model::NetworkModel;
use super::solution::PowerFlowSolution;
use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// Configuration for the fixed-point solver.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Convergence tolerance, relative to the base voltage.
    pub tolerance: f64,
    /// Maximum number of iterations before giving up.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance (relative to the base voltage).
    ///
    /// Both bus voltage changes must fall below it in the same iteration.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Working set carried from one iteration to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationState {
    /// Bus voltages from the latest solve
    pub voltages: BusVoltages,
    /// Compensation current injected at bus B for the next solve
    pub compensation: Complex64,
    /// Completed iterations (the initial solve is not counted)
    pub iteration: usize,
}

impl IterationState {
    /// Seed a state from known voltages and compensation current.
    pub fn new(voltages: BusVoltages, compensation: Complex64) -> Self {
        Self {
            voltages,
            compensation,
            iteration: 0,
        }
    }
}

/// Fixed-point power flow solver.
///
/// The admittance matrix never changes; each iteration only updates the
/// compensation current `I_l - I_b` that turns the flat-start admittance
/// load into the constant-power load.
#[derive(Debug, Clone, Default)]
pub struct FixedPointSolver {
    config: SolverConfig,
}

impl FixedPointSolver {
    /// Create a solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve once with zero compensation to seed the iteration.
    pub fn initialize(&self, model: &NetworkModel) -> Result<IterationState> {
        let voltages = model
            .matrix
            .solve(&model.injection(Complex64::new(0.0, 0.0)))?;
        check_finite(&voltages, 0)?;

        let compensation = model.compensation_current(voltages.at(BusId::Load));
        Ok(IterationState::new(voltages, compensation))
    }

    /// Run one iteration, updating `state` in place.
    ///
    /// Returns the per-bus voltage change relative to the base voltage.
    pub fn step(&self, model: &NetworkModel, state: &mut IterationState) -> Result<[f64; 2]> {
        let voltages = model.matrix.solve(&model.injection(state.compensation))?;
        state.iteration += 1;
        check_finite(&voltages, state.iteration)?;

        let base = model.params.base_voltage;
        let error = BusId::ALL.map(|bus| (voltages.at(bus) - state.voltages.at(bus)).norm() / base);

        state.voltages = voltages;
        state.compensation = model.compensation_current(voltages.at(BusId::Load));

        Ok(error)
    }

    /// Iterate from the initial solve until both bus errors drop below the tolerance.
    pub fn solve(&self, model: &NetworkModel) -> Result<PowerFlowSolution> {
        validate_solver_config(&self.config)?;

        let mut state = self.initialize(model)?;
        let mut history = Vec::new();
        let mut error = [f64::INFINITY; 2];

        while state.iteration < self.config.max_iterations {
            error = self.step(model, &mut state)?;
            history.push(error);
            debug!(
                iteration = state.iteration,
                err_a = error[0],
                err_b = error[1],
                "fixed-point iteration"
            );

            if error.iter().all(|&e| e < self.config.tolerance) {
                info!(iterations = state.iteration, "power flow converged");
                return Ok(PowerFlowSolution::new(model, &state, error, history));
            }
        }

        warn!(
            iterations = state.iteration,
            err_a = error[0],
            err_b = error[1],
            "power flow did not converge"
        );
        Err(PowerFlowError::non_convergence(state.iteration, error, state))
    }
}

fn check_finite(voltages: &BusVoltages, iterations: usize) -> Result<()> {
    for bus in BusId::ALL {
        let v = voltages.at(bus);
        if !v.is_finite() {
            warn!(%bus, iterations, "bus voltage is not finite");
            return Err(PowerFlowError::NumericalOverflow {
                bus,
                iterations,
                value: v.norm(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkParameters;
    use approx::assert_relative_eq;

    fn reference_model() -> NetworkModel {
        NetworkModel::build(&NetworkParameters::default()).unwrap()
    }

    #[test]
    fn test_reference_scenario_converges() {
        let model = reference_model();
        let solution = FixedPointSolver::new().solve(&model).unwrap();

        assert!(solution.iterations >= 1 && solution.iterations <= 15);
        assert!(solution.error.iter().all(|&e| e < DEFAULT_TOLERANCE));

        let vb = solution.voltage(BusId::Load).norm();
        assert!(vb > 100.0 && vb < 127.0, "|Vb| = {vb}");
        // Voltage drops from the source bus towards the load
        assert!(solution.voltage(BusId::Source).norm() > vb);
    }

    #[test]
    fn test_load_receives_specified_power() {
        let model = reference_model();
        let solution = FixedPointSolver::new().solve(&model).unwrap();

        let s = solution.voltage(BusId::Load) * solution.load_current.conj();
        assert_relative_eq!(s.re, 950.0, max_relative = 1e-4);
        assert_relative_eq!(s, model.load_power, max_relative = 1e-4);
    }

    #[test]
    fn test_line_current_matches_load_current() {
        let model = reference_model();
        let solution = FixedPointSolver::new().solve(&model).unwrap();

        let i_line = (solution.voltage(BusId::Source) - solution.voltage(BusId::Load))
            * model.line_admittance;
        assert_relative_eq!(i_line, solution.load_current, epsilon = 1e-4);
    }

    #[test]
    fn test_error_decreases() {
        let model = reference_model();
        let solution = FixedPointSolver::new().solve(&model).unwrap();

        let first = solution.error_history[0];
        let last = solution.error;
        assert_eq!(solution.error_history.len(), solution.iterations);
        assert!(last[0] < first[0] || first[0] < DEFAULT_TOLERANCE);
        assert!(last[1] < first[1]);
    }

    #[test]
    fn test_converged_state_is_a_fixed_point() {
        let model = reference_model();
        let solver = FixedPointSolver::new();
        let solution = solver.solve(&model).unwrap();

        let mut state = IterationState::new(solution.voltages, solution.compensation_current);
        let error = solver.step(&model, &mut state).unwrap();

        assert_eq!(state.iteration, 1);
        assert!(error.iter().all(|&e| e < DEFAULT_TOLERANCE), "{error:?}");
    }

    #[test]
    fn test_initial_state() {
        let model = reference_model();
        let state = FixedPointSolver::new().initialize(&model).unwrap();

        assert_eq!(state.iteration, 0);
        let vb = state.voltages.at(BusId::Load);
        assert_relative_eq!(
            state.compensation,
            model.linear_load_current(vb) - model.load_current(vb)
        );
    }

    #[test]
    fn test_iteration_bound_reports_last_state() {
        let model = reference_model();
        let solver = FixedPointSolver::with_config(
            SolverConfig::new().with_max_iterations(1).with_tolerance(1e-300),
        );

        match solver.solve(&model) {
            Err(PowerFlowError::NonConvergence {
                iterations, state, ..
            }) => {
                assert_eq!(iterations, 1);
                assert_eq!(state.iteration, 1);
                assert!(state.voltages.at(BusId::Load).norm() > 100.0);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn test_infeasible_load_fails() {
        // Far beyond the maximum power transfer of the source and line
        let params = NetworkParameters::default().with_load_power(1e6);
        let model = NetworkModel::build(&params).unwrap();
        let err = FixedPointSolver::new().solve(&model).unwrap_err();

        assert_eq!(err.exit_code(), 4);
        match err {
            PowerFlowError::NonConvergence {
                iterations, error, ..
            } => {
                assert_eq!(iterations, DEFAULT_MAX_ITERATIONS);
                assert!(error.iter().all(|&e| e > DEFAULT_TOLERANCE), "{error:?}");
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn test_infinite_compensation_overflows() {
        let model = reference_model();
        let solver = FixedPointSolver::new();
        let mut state = solver.initialize(&model).unwrap();
        state.compensation = Complex64::new(f64::INFINITY, 0.0);

        match solver.step(&model, &mut state) {
            Err(PowerFlowError::NumericalOverflow {
                bus, iterations, ..
            }) => {
                // Bus A couples to the injection through -Yab
                assert_eq!(bus, BusId::Source);
                assert_eq!(iterations, 1);
            }
            other => panic!("expected NumericalOverflow, got {other:?}"),
        }
        assert_eq!(state.iteration, 1);
    }

    #[test]
    fn test_invalid_solver_config() {
        let model = reference_model();
        let solver = FixedPointSolver::with_config(SolverConfig::new().with_tolerance(-1.0));
        assert!(matches!(
            solver.solve(&model),
            Err(PowerFlowError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_weak_network_needs_more_iterations() {
        let strong = FixedPointSolver::new().solve(&reference_model()).unwrap();

        let params = NetworkParameters::default()
            .with_line_impedance(Complex64::new(0.5, 1.0))
            .with_power_factor(0.8);
        let model = NetworkModel::build(&params).unwrap();
        let weak = FixedPointSolver::new().solve(&model).unwrap();

        assert!(weak.iterations >= strong.iterations);
        assert!(weak.voltage(BusId::Load).norm() < strong.voltage(BusId::Load).norm());
    }
}
