//! Critical Path Method engine for voyage milestone networks.
//!
//! Given activities with durations and dependencies, computes early/late
//! start and finish, slack, the critical path, estimated delay and overall
//! completion. Every computation is a pure function of its input.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod config;
pub mod critical_path;
mod interner;
pub mod logging;
mod models;
pub mod templates;

pub use config::{CpmConfig, DEFAULT_SLACK_TOLERANCE};
pub use critical_path::{
    calculate_critical_path, calculate_critical_path_json, completion_percent, estimate_delay,
    validate_activities, CriticalPathError, DependencyGraph, JsonCalculationError,
    TopologicalOrder,
};
pub use interner::{ActivityIdx, ActivityIndex};
pub use models::{parse_activities, ActivityStatus, CriticalPathItem, CriticalPathResult, PathItem};
pub use templates::{
    try_voyage_milestone_template, voyage_milestone_template, TemplateError, VoyageType,
};

fn value_error(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Calculate the critical path for a list of activities.
///
/// # Arguments
/// * `activities` - List of PathItem
/// * `config` - CpmConfig (defaults: strict validation, tolerance 0.001)
///
/// # Raises
/// * ValueError on duplicate IDs, or on cycles, unknown dependencies and
///   invalid durations when `config.strict` is set
#[pyfunction]
#[pyo3(name = "calculate_critical_path", signature = (activities, config=None))]
fn run_critical_path(
    activities: Vec<PathItem>,
    config: Option<CpmConfig>,
) -> PyResult<CriticalPathResult> {
    let config = config.unwrap_or_default();
    calculate_critical_path(&activities, &config).map_err(value_error)
}

/// Same as `calculate_critical_path`, taking and returning JSON text.
#[pyfunction]
#[pyo3(name = "calculate_critical_path_json", signature = (activities_json, config=None))]
fn run_critical_path_json(activities_json: &str, config: Option<CpmConfig>) -> PyResult<String> {
    let config = config.unwrap_or_default();
    calculate_critical_path_json(activities_json, &config).map_err(value_error)
}

/// Standard milestone activities for a voyage type; empty list if unknown.
#[pyfunction]
#[pyo3(name = "voyage_milestone_template")]
fn py_voyage_milestone_template(voyage_type: &str) -> Vec<PathItem> {
    voyage_milestone_template(voyage_type)
}

/// Voyage type keys that have a template.
#[pyfunction]
fn voyage_types() -> Vec<&'static str> {
    VoyageType::ALL.iter().map(|t| t.as_str()).collect()
}

/// The voyage_cpm Python module.
#[pymodule]
fn voyage_cpm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<ActivityStatus>()?;
    m.add_class::<PathItem>()?;
    m.add_class::<CriticalPathItem>()?;
    m.add_class::<CriticalPathResult>()?;

    // Config types
    m.add_class::<CpmConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(run_critical_path, m)?)?;
    m.add_function(wrap_pyfunction!(run_critical_path_json, m)?)?;
    m.add_function(wrap_pyfunction!(py_voyage_milestone_template, m)?)?;
    m.add_function(wrap_pyfunction!(voyage_types, m)?)?;

    Ok(())
}
