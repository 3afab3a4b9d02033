//! Converged operating point and its power balance.

use num_complex::Complex64;

use crate::network::BusId;

use super::admittance::BusVoltages;
use super::fixed_point::IterationState;
use super::model::NetworkModel;

/// Complex power flows at the converged operating point (VA).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBalance {
    /// Power delivered by the source EMF, `Vs·conj(I_s)`
    pub source: Complex64,
    /// Loss in the source impedance, `|I_s|²·Zs`
    pub source_loss: Complex64,
    /// Loss in the line impedance, `|I_ab|²·Zab`
    pub line_loss: Complex64,
    /// Power absorbed at bus B, `Vb·conj(I_b)`
    pub load: Complex64,
}

impl PowerBalance {
    /// Evaluate the power flows for the given bus voltages and load current.
    pub fn compute(model: &NetworkModel, voltages: &BusVoltages, load_current: Complex64) -> Self {
        let params = &model.params;
        let v_a = voltages.at(BusId::Source);
        let v_b = voltages.at(BusId::Load);

        let i_source = (params.source_voltage - v_a) * model.source_admittance;
        let i_line = (v_a - v_b) * model.line_admittance;

        Self {
            source: params.source_voltage * i_source.conj(),
            source_loss: params.source_impedance * i_source.norm_sqr(),
            line_loss: params.line_impedance * i_line.norm_sqr(),
            load: v_b * load_current.conj(),
        }
    }

    /// Total series losses.
    pub fn losses(&self) -> Complex64 {
        self.source_loss + self.line_loss
    }

    /// Source power not accounted for by losses and load.
    pub fn mismatch(&self) -> Complex64 {
        self.source - self.losses() - self.load
    }
}

/// Result of a converged power flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerFlowSolution {
    /// Norton current of the source
    pub source_current: Complex64,
    /// Current drawn by the constant-power load
    pub load_current: Complex64,
    /// Final compensation current at bus B
    pub compensation_current: Complex64,
    /// Converged bus voltages
    pub voltages: BusVoltages,
    /// Voltage changes of the last iteration, relative to the base voltage
    pub error: [f64; 2],
    /// Number of iterations after the initial solve
    pub iterations: usize,
    /// Relative voltage changes of every iteration
    pub error_history: Vec<[f64; 2]>,
    /// Power flows at the operating point
    pub balance: PowerBalance,
    /// Base voltage used for per-unit values
    pub base_voltage: f64,
}

impl PowerFlowSolution {
    pub(crate) fn new(
        model: &NetworkModel,
        state: &IterationState,
        error: [f64; 2],
        error_history: Vec<[f64; 2]>,
    ) -> Self {
        let load_current = model.load_current(state.voltages.at(BusId::Load));
        Self {
            source_current: model.source_current,
            load_current,
            compensation_current: state.compensation,
            voltages: state.voltages,
            error,
            iterations: state.iteration,
            error_history,
            balance: PowerBalance::compute(model, &state.voltages, load_current),
            base_voltage: model.params.base_voltage,
        }
    }

    /// Voltage at a bus.
    pub fn voltage(&self, bus: BusId) -> Complex64 {
        self.voltages.at(bus)
    }

    /// Voltage magnitude at a bus in per-unit of the base voltage.
    pub fn per_unit(&self, bus: BusId) -> f64 {
        self.voltage(bus).norm() / self.base_voltage
    }

    /// The converged working set, for restarting the iteration.
    pub fn state(&self) -> IterationState {
        IterationState {
            voltages: self.voltages,
            compensation: self.compensation_current,
            iteration: self.iterations,
        }
    }
}
