//! Console report of a converged power flow.

use std::fmt;

use num_complex::Complex64;

use crate::network::BusId;
use crate::solver::PowerFlowSolution;

/// Polar view of a phasor: magnitude and angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phasor {
    pub magnitude: f64,
    pub angle_deg: f64,
}

impl From<Complex64> for Phasor {
    fn from(z: Complex64) -> Self {
        let (magnitude, angle) = z.to_polar();
        Self {
            magnitude,
            angle_deg: angle.to_degrees(),
        }
    }
}

impl fmt::Display for Phasor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}| {:.5}°)", self.magnitude, self.angle_deg)
    }
}

impl fmt::Display for PowerFlowSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "******** Outputs ********")?;
        writeln!(f)?;
        writeln!(f, "Ia    = {} A", Phasor::from(self.source_current))?;
        writeln!(f, "Ib    = {} A", Phasor::from(self.load_current))?;
        writeln!(f, "Icmp  = {} A", Phasor::from(self.compensation_current))?;
        for bus in BusId::ALL {
            writeln!(
                f,
                "V{}    = {} V  [{:.4} pu]",
                bus.to_string().to_lowercase(),
                Phasor::from(self.voltage(bus)),
                self.per_unit(bus)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Error = [{:.3e}, {:.3e}]", self.error[0], self.error[1])?;
        writeln!(f, "Total iterations: {}", self.iterations)?;
        writeln!(f)?;

        let balance = &self.balance;
        writeln!(f, "******** Power balance ********")?;
        writeln!(f)?;
        write_power(f, "S_src ", balance.source)?;
        write_power(f, "L_src ", balance.source_loss)?;
        write_power(f, "L_line", balance.line_loss)?;
        write_power(f, "S_load", balance.load)?;
        write!(f, "Mismatch = {:.3e} VA", balance.mismatch().norm())
    }
}

fn write_power(f: &mut fmt::Formatter<'_>, label: &str, s: Complex64) -> fmt::Result {
    writeln!(f, "{label} = {:.2} W + j{:.2} var", s.re, s.im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkParameters;
    use crate::solver::{FixedPointSolver, NetworkModel};
    use approx::assert_relative_eq;

    #[test]
    fn test_phasor_polar_view() {
        let p = Phasor::from(Complex64::new(0.0, -2.0));
        assert_relative_eq!(p.magnitude, 2.0);
        assert_relative_eq!(p.angle_deg, -90.0);
        assert_eq!(p.to_string(), "(2.00| -90.00000°)");
    }

    #[test]
    fn test_report_layout() {
        let model = NetworkModel::build(&NetworkParameters::default()).unwrap();
        let solution = FixedPointSolver::new().solve(&model).unwrap();
        let report = solution.to_string();

        assert!(report.starts_with("******** Outputs ********"));
        for label in ["Ia ", "Ib ", "Icmp", "Va ", "Vb ", "Error", "S_load"] {
            assert!(report.contains(label), "missing {label} in:\n{report}");
        }
        assert!(report.contains(&format!("Total iterations: {}", solution.iterations)));
        // 1000 VA at 0.95 lagging
        assert!(report.contains("S_load = 950.00 W"));
    }
}
