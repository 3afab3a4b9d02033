//! Two-bus network description and validation.
//!
//! This module holds the immutable inputs of a solve: the [`NetworkParameters`]
//! describing the source, line and load, and the [`PowerFlowConfig`] that
//! bundles them with the iteration settings for loading from TOML.

mod config;
mod types;
mod validate;

pub use config::PowerFlowConfig;
pub use types::*;
pub use validate::{validate_parameters, validate_solver_config};
