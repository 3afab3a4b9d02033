//! Twobus - Two-Bus Fixed-Point Power Flow
//!
//! Solves the steady state of a source feeding a constant-power load
//! through a line impedance and prints the operating point.
//!
//! # Usage
//!
//! ```bash
//! twobus --config feeder.toml --load-power 1500 --power-factor 0.9
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use num_complex::Complex64;
use tracing::{error, info};
use twobus::{error::Result, solve, PowerFlowConfig, PowerFlowSolution};

/// Two-bus power flow solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with [network] and [solver] tables
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base voltage for relative errors and per-unit values (V)
    #[arg(long)]
    base_voltage: Option<f64>,

    /// Source EMF phasor, e.g. 127+0j (V)
    #[arg(long, allow_hyphen_values = true)]
    source_voltage: Option<Complex64>,

    /// Source impedance, e.g. 0.05+0.1j (Ω)
    #[arg(long, allow_hyphen_values = true)]
    source_impedance: Option<Complex64>,

    /// Line impedance, e.g. 0.05+0.1j (Ω)
    #[arg(long, allow_hyphen_values = true)]
    line_impedance: Option<Complex64>,

    /// Load apparent power (VA)
    #[arg(long)]
    load_power: Option<f64>,

    /// Lagging load power factor in (0, 1]
    #[arg(long)]
    power_factor: Option<f64>,

    /// Convergence tolerance relative to the base voltage
    #[arg(long)]
    tolerance: Option<f64>,

    /// Maximum fixed-point iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Load the configuration file (or defaults) and apply command-line overrides.
    fn to_config(&self) -> Result<PowerFlowConfig> {
        let mut config = match &self.config {
            Some(path) => PowerFlowConfig::from_toml_file(path)?,
            None => PowerFlowConfig::default(),
        };

        let network = &mut config.network;
        if let Some(v) = self.base_voltage {
            network.base_voltage = v;
        }
        if let Some(v) = self.source_voltage {
            network.source_voltage = v;
        }
        if let Some(z) = self.source_impedance {
            network.source_impedance = z;
        }
        if let Some(z) = self.line_impedance {
            network.line_impedance = z;
        }
        if let Some(s) = self.load_power {
            network.load_power = s;
        }
        if let Some(fp) = self.power_factor {
            network.power_factor = fp;
        }

        if let Some(tol) = self.tolerance {
            config.solver.tolerance = tol;
        }
        if let Some(n) = self.max_iterations {
            config.solver.max_iterations = n;
        }

        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    // RUST_LOG directives take precedence over the verbosity flag
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<PowerFlowSolution> {
    let config = args.to_config()?;
    info!(?config, "solving two-bus power flow");
    solve(&config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(solution) => {
            println!("{solution}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let args = Args::try_parse_from(["twobus"]).unwrap();
        assert_eq!(args.to_config().unwrap(), PowerFlowConfig::default());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_complex_overrides() {
        let args = Args::try_parse_from([
            "twobus",
            "--line-impedance",
            "0.1+0.3j",
            "--source-voltage",
            "120-5i",
            "--power-factor",
            "0.8",
            "--max-iterations",
            "20",
            "-vv",
        ])
        .unwrap();
        let config = args.to_config().unwrap();

        assert_eq!(config.network.line_impedance, Complex64::new(0.1, 0.3));
        assert_eq!(config.network.source_voltage, Complex64::new(120.0, -5.0));
        assert_eq!(config.network.power_factor, 0.8);
        assert_eq!(config.network.load_power, 1e3);
        assert_eq!(config.solver.max_iterations, 20);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/reference.toml");
        let args = Args::try_parse_from([
            "twobus",
            "--config",
            path,
            "--load-power",
            "1500",
            "--tolerance",
            "1e-9",
        ])
        .unwrap();
        let config = args.to_config().unwrap();

        assert_eq!(config.network.load_power, 1500.0);
        assert_eq!(config.solver.tolerance, 1e-9);
        assert_eq!(config.network.source_impedance, Complex64::new(0.05, 0.1));
        assert_eq!(config.solver.max_iterations, 100);
    }

    #[test]
    fn test_malformed_complex_rejected() {
        assert!(Args::try_parse_from(["twobus", "--line-impedance", "0.1+abc"]).is_err());
    }

    #[test]
    fn test_overridden_invalid_value_fails_as_configuration_error() {
        let args = Args::try_parse_from(["twobus", "--line-impedance", "1e-320+0j"]).unwrap();
        let err = run(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
