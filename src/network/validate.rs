//! Parameter validation.

use num_complex::Complex64;

use crate::error::{PowerFlowError, Result};
use crate::solver::SolverConfig;

use super::NetworkParameters;

/// Validate network parameters before building the model.
///
/// Checks:
/// - Base voltage and apparent power are finite and positive
/// - Power factor lies in (0, 1]
/// - Source voltage is finite and non-zero
/// - Impedances are finite, non-zero and passive
/// - Quantities derived from them (admittances, source current, Vs², flat-start
///   load admittance) are representable as finite, non-zero values
pub fn validate_parameters(params: &NetworkParameters) -> Result<()> {
    check_positive("base_voltage", params.base_voltage)?;
    check_positive("load_power", params.load_power)?;

    let fp = params.power_factor;
    if !fp.is_finite() || fp <= 0.0 || fp > 1.0 {
        return Err(PowerFlowError::invalid_parameter(
            "power_factor",
            format!("must be in (0, 1], got {fp}"),
        ));
    }

    let vs = params.source_voltage;
    if !vs.is_finite() {
        return Err(PowerFlowError::invalid_parameter(
            "source_voltage",
            format!("must be finite, got {vs}"),
        ));
    }
    if vs.norm() == 0.0 {
        return Err(PowerFlowError::invalid_parameter(
            "source_voltage",
            "must be non-zero",
        ));
    }

    check_impedance("source_impedance", params.source_impedance)?;
    check_impedance("line_impedance", params.line_impedance)?;

    // Subnormal or extreme inputs can pass the checks above and still
    // overflow or underflow once inverted or squared
    check_derived("source_impedance", "1/Zs", params.source_impedance.inv())?;
    check_derived("line_impedance", "1/Zab", params.line_impedance.inv())?;
    check_derived(
        "source_impedance",
        "Vs/Zs",
        params.source_voltage / params.source_impedance,
    )?;
    check_derived("source_voltage", "Vs²", params.source_voltage.powi(2))?;
    check_derived(
        "load_power",
        "conj(S)/Vs²",
        params.flat_start_load_admittance(),
    )?;

    Ok(())
}

/// Validate iteration settings.
pub fn validate_solver_config(config: &SolverConfig) -> Result<()> {
    check_positive("tolerance", config.tolerance)?;

    if config.max_iterations == 0 {
        return Err(PowerFlowError::invalid_parameter(
            "max_iterations",
            "must be at least 1",
        ));
    }

    Ok(())
}

fn check_positive(param: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PowerFlowError::invalid_parameter(
            param,
            format!("must be finite and positive, got {value}"),
        ));
    }
    Ok(())
}

fn check_impedance(param: &str, z: Complex64) -> Result<()> {
    if !z.is_finite() {
        return Err(PowerFlowError::invalid_parameter(
            param,
            format!("must be finite, got {z}"),
        ));
    }
    if z.norm() == 0.0 {
        return Err(PowerFlowError::invalid_parameter(param, "must be non-zero"));
    }
    if z.re < 0.0 {
        return Err(PowerFlowError::invalid_parameter(
            param,
            format!("resistance must be non-negative, got {}", z.re),
        ));
    }
    Ok(())
}

fn check_derived(param: &str, quantity: &str, value: Complex64) -> Result<()> {
    if !value.is_finite() || value.norm() == 0.0 {
        return Err(PowerFlowError::invalid_parameter(
            param,
            format!("{quantity} is not a finite non-zero value ({value})"),
        ));
    }
    Ok(())
}
