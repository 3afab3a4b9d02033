//! Nodal admittance matrix assembly and solving.

use std::ops::Index;

use num_complex::Complex64;

use crate::error::{PowerFlowError, Result};
use crate::network::BusId;

use super::SINGULARITY_THRESHOLD;

/// Current injections at both buses, `[I_A, I_B]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentInjection(pub [Complex64; 2]);

impl CurrentInjection {
    /// Build an injection vector from the source-bus and load-bus currents.
    pub fn new(source: Complex64, load: Complex64) -> Self {
        Self([source, load])
    }

    /// Injection at a bus.
    pub fn at(&self, bus: BusId) -> Complex64 {
        self.0[bus.index()]
    }
}

/// Bus voltages, `[V_A, V_B]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusVoltages(pub [Complex64; 2]);

impl BusVoltages {
    /// Voltage at a bus.
    pub fn at(&self, bus: BusId) -> Complex64 {
        self.0[bus.index()]
    }
}

/// Nodal admittance matrix Y of the two-bus network, such that Y·V = I.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmittanceMatrix {
    y: [[Complex64; 2]; 2],
}

impl Default for AdmittanceMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmittanceMatrix {
    /// Create an empty (all-zero) matrix.
    pub fn new() -> Self {
        Self {
            y: [[Complex64::new(0.0, 0.0); 2]; 2],
        }
    }

    /// Stamp an admittance from a bus to the reference node.
    ///   Y[n,n] += y
    pub fn stamp_shunt(&mut self, bus: BusId, y: Complex64) {
        let n = bus.index();
        self.y[n][n] += y;
    }

    /// Stamp an admittance between two buses.
    ///   Y[n1,n1] += y
    ///   Y[n2,n2] += y
    ///   Y[n1,n2] -= y
    ///   Y[n2,n1] -= y
    pub fn stamp_series(&mut self, n1: BusId, n2: BusId, y: Complex64) {
        let (i, j) = (n1.index(), n2.index());
        self.y[i][i] += y;
        self.y[j][j] += y;
        self.y[i][j] -= y;
        self.y[j][i] -= y;
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> Complex64 {
        self.y[0][0] * self.y[1][1] - self.y[0][1] * self.y[1][0]
    }

    /// Solve Y·V = I with the closed-form 2×2 inverse.
    ///
    /// The determinant is compared against the scale of the products that
    /// form it, so the check is independent of the admittance units.
    pub fn solve(&self, injection: &CurrentInjection) -> Result<BusVoltages> {
        let [[a, b], [c, d]] = self.y;
        let det = self.determinant();
        let scale = (a * d).norm() + (b * c).norm();

        if !det.is_finite() || det.norm() <= SINGULARITY_THRESHOLD * scale || scale == 0.0 {
            return Err(PowerFlowError::SingularSystem {
                determinant: det.norm(),
            });
        }

        let [i_a, i_b] = injection.0;
        let v_a = (d * i_a - b * i_b) / det;
        let v_b = (a * i_b - c * i_a) / det;

        Ok(BusVoltages([v_a, v_b]))
    }
}

/// Matrix element at (row, col).
impl Index<(BusId, BusId)> for AdmittanceMatrix {
    type Output = Complex64;

    fn index(&self, (row, col): (BusId, BusId)) -> &Complex64 {
        &self.y[row.index()][col.index()]
    }
}
