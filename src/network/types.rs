//! Core types for the two-bus network.

use std::fmt;

use num_complex::Complex64;
use serde::Deserialize;

/// One of the two buses of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BusId {
    /// Supply bus behind the source impedance.
    Source,
    /// Bus feeding the constant-power load.
    Load,
}

impl BusId {
    /// Both buses in matrix order.
    pub const ALL: [BusId; 2] = [BusId::Source, BusId::Load];

    /// Row/column index in the nodal equations.
    pub fn index(self) -> usize {
        match self {
            BusId::Source => 0,
            BusId::Load => 1,
        }
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusId::Source => write!(f, "A"),
            BusId::Load => write!(f, "B"),
        }
    }
}

/// Electrical description of the two-bus network.
///
/// Complex quantities deserialize from `[re, im]` arrays. Every field
/// defaults to the reference 127 V scenario, so a configuration file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkParameters {
    /// Voltage magnitude used to normalize convergence errors (V).
    pub base_voltage: f64,
    /// Source EMF phasor (V).
    pub source_voltage: Complex64,
    /// Internal impedance of the source (Ω).
    pub source_impedance: Complex64,
    /// Series impedance of the line between bus A and bus B (Ω).
    pub line_impedance: Complex64,
    /// Apparent power drawn by the load (VA).
    pub load_power: f64,
    /// Lagging power factor of the load, in (0, 1].
    pub power_factor: f64,
}

impl Default for NetworkParameters {
    fn default() -> Self {
        Self {
            base_voltage: 127.0,
            source_voltage: Complex64::new(127.0, 0.0),
            source_impedance: Complex64::new(0.05, 0.1),
            line_impedance: Complex64::new(0.05, 0.1),
            load_power: 1e3,
            power_factor: 0.95,
        }
    }
}

impl NetworkParameters {
    /// Create parameters with the reference scenario values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base voltage (V).
    pub fn with_base_voltage(mut self, base_voltage: f64) -> Self {
        self.base_voltage = base_voltage;
        self
    }

    /// Set the source EMF phasor (V).
    pub fn with_source_voltage(mut self, source_voltage: Complex64) -> Self {
        self.source_voltage = source_voltage;
        self
    }

    /// Set the source impedance (Ω).
    pub fn with_source_impedance(mut self, source_impedance: Complex64) -> Self {
        self.source_impedance = source_impedance;
        self
    }

    /// Set the line impedance (Ω).
    pub fn with_line_impedance(mut self, line_impedance: Complex64) -> Self {
        self.line_impedance = line_impedance;
        self
    }

    /// Set the load apparent power (VA).
    pub fn with_load_power(mut self, load_power: f64) -> Self {
        self.load_power = load_power;
        self
    }

    /// Set the load power factor.
    pub fn with_power_factor(mut self, power_factor: f64) -> Self {
        self.power_factor = power_factor;
        self
    }

    /// Complex load power, with the reactive part positive (lagging).
    pub fn load_complex_power(&self) -> Complex64 {
        let theta = self.power_factor.acos();
        Complex64::from_polar(self.load_power, theta)
    }

    /// Load admittance with bus B at the source voltage, `1 / (Vs² / conj(S))`.
    pub fn flat_start_load_admittance(&self) -> Complex64 {
        let load_impedance = self.source_voltage.powi(2) / self.load_complex_power().conj();
        load_impedance.inv()
    }
}
