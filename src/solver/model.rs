//! Linear network model derived from the network parameters.

use num_complex::Complex64;

use crate::error::Result;
use crate::network::{validate_parameters, BusId, NetworkParameters};

use super::admittance::{AdmittanceMatrix, CurrentInjection};

/// Constant electrical quantities of a solve.
///
/// The source is converted to its Norton equivalent (current `I_a` in
/// parallel with `Y_a`) and the load is stamped as the admittance it would
/// have at flat start. That admittance only shapes the matrix diagonal; the
/// true constant-power behaviour enters through the compensation current
/// at bus B.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    /// Parameters the model was built from
    pub params: NetworkParameters,
    /// Norton current of the source, `Vs / Zs`
    pub source_current: Complex64,
    /// Source admittance, `1 / Zs`
    pub source_admittance: Complex64,
    /// Line admittance, `1 / Zab`
    pub line_admittance: Complex64,
    /// Complex load power, reactive part positive
    pub load_power: Complex64,
    /// Flat-start load admittance, `conj(S) / Vs²`
    pub load_admittance: Complex64,
    /// Nodal admittance matrix
    pub matrix: AdmittanceMatrix,
}

impl NetworkModel {
    /// Validate the parameters and derive the model.
    pub fn build(params: &NetworkParameters) -> Result<Self> {
        validate_parameters(params)?;

        let source_current = params.source_voltage / params.source_impedance;
        let source_admittance = params.source_impedance.inv();
        let line_admittance = params.line_impedance.inv();
        let load_power = params.load_complex_power();
        let load_admittance = params.flat_start_load_admittance();

        let mut matrix = AdmittanceMatrix::new();
        matrix.stamp_shunt(BusId::Source, source_admittance);
        matrix.stamp_shunt(BusId::Load, load_admittance);
        matrix.stamp_series(BusId::Source, BusId::Load, line_admittance);

        Ok(Self {
            params: params.clone(),
            source_current,
            source_admittance,
            line_admittance,
            load_power,
            load_admittance,
            matrix,
        })
    }

    /// Injection vector for a given compensation current at bus B.
    pub fn injection(&self, compensation: Complex64) -> CurrentInjection {
        CurrentInjection::new(self.source_current, compensation)
    }

    /// Current a constant-admittance load would draw at `v_load`.
    pub fn linear_load_current(&self, v_load: Complex64) -> Complex64 {
        self.load_admittance * v_load
    }

    /// Current the constant-power load actually draws at `v_load`.
    pub fn load_current(&self, v_load: Complex64) -> Complex64 {
        self.load_power.conj() / v_load.conj()
    }

    /// Compensation current that makes the linear model draw the true load current.
    pub fn compensation_current(&self, v_load: Complex64) -> Complex64 {
        self.linear_load_current(v_load) - self.load_current(v_load)
    }
}
