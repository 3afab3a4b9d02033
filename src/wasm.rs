//! WASM bindings for Twobus.
//!
//! This module provides JavaScript-friendly bindings for running the solver
//! in a web page.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmPowerFlow } from 'twobus';
//!
//! await init();
//!
//! const pf = WasmPowerFlow.from_toml(`
//!   [network]
//!   load_power = 1500.0
//!   power_factor = 0.9
//! `);
//!
//! console.log(pf.vb_magnitude(), pf.iterations());
//! console.log(pf.report());
//! ```

use wasm_bindgen::prelude::*;

use crate::network::{BusId, PowerFlowConfig};
use crate::report::Phasor;
use crate::solver::PowerFlowSolution;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A converged two-bus power flow.
///
/// Wraps the native [`PowerFlowSolution`] and exposes its values as plain
/// numbers (magnitudes and angles in degrees).
#[wasm_bindgen]
pub struct WasmPowerFlow {
    solution: PowerFlowSolution,
}

#[wasm_bindgen]
impl WasmPowerFlow {
    /// Solve the reference 127 V network.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPowerFlow, JsValue> {
        Self::solve_config(&PowerFlowConfig::default())
    }

    /// Solve a network described in TOML.
    ///
    /// # Arguments
    /// * `config` - TOML text with optional `[network]` and `[solver]` tables
    #[wasm_bindgen]
    pub fn from_toml(config: &str) -> Result<WasmPowerFlow, JsValue> {
        let config =
            PowerFlowConfig::from_toml_str(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::solve_config(&config)
    }

    fn solve_config(config: &PowerFlowConfig) -> Result<WasmPowerFlow, JsValue> {
        let solution = crate::solve(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmPowerFlow { solution })
    }

    /// Bus A voltage magnitude (V).
    pub fn va_magnitude(&self) -> f64 {
        self.bus(BusId::Source).magnitude
    }

    /// Bus A voltage angle (degrees).
    pub fn va_angle(&self) -> f64 {
        self.bus(BusId::Source).angle_deg
    }

    /// Bus B voltage magnitude (V).
    pub fn vb_magnitude(&self) -> f64 {
        self.bus(BusId::Load).magnitude
    }

    /// Bus B voltage angle (degrees).
    pub fn vb_angle(&self) -> f64 {
        self.bus(BusId::Load).angle_deg
    }

    /// Load current magnitude (A).
    pub fn ib_magnitude(&self) -> f64 {
        Phasor::from(self.solution.load_current).magnitude
    }

    /// Load current angle (degrees).
    pub fn ib_angle(&self) -> f64 {
        Phasor::from(self.solution.load_current).angle_deg
    }

    /// Number of fixed-point iterations.
    pub fn iterations(&self) -> usize {
        self.solution.iterations
    }

    /// Final relative errors `[A, B]`.
    pub fn error(&self) -> Vec<f64> {
        self.solution.error.to_vec()
    }

    /// The console report as text.
    pub fn report(&self) -> String {
        self.solution.to_string()
    }
}

impl WasmPowerFlow {
    fn bus(&self, bus: BusId) -> Phasor {
        Phasor::from(self.solution.voltage(bus))
    }
}
