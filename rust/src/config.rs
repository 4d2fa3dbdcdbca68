//! Configuration types for critical path analysis.

use pyo3::prelude::*;

/// Slack below this (in hours) counts as zero.
pub const DEFAULT_SLACK_TOLERANCE: f64 = 0.001;

/// Configuration for one critical path computation.
#[pyclass]
#[derive(Clone, Debug)]
pub struct CpmConfig {
    /// An activity is critical iff |slack| < slack_tolerance.
    #[pyo3(get, set)]
    pub slack_tolerance: f64,
    /// Reject cycles, dangling references and invalid durations instead of
    /// producing a partial schedule.
    #[pyo3(get, set)]
    pub strict: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            slack_tolerance: DEFAULT_SLACK_TOLERANCE,
            strict: true,
            verbosity: 0,
        }
    }
}

impl CpmConfig {
    /// Best-effort mode: cycle victims are dropped and missing predecessors ignored.
    pub fn permissive() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}

#[pymethods]
impl CpmConfig {
    #[new]
    #[pyo3(signature = (slack_tolerance=None, strict=None, verbosity=None))]
    fn new(slack_tolerance: Option<f64>, strict: Option<bool>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            slack_tolerance: slack_tolerance.unwrap_or(defaults.slack_tolerance),
            strict: strict.unwrap_or(defaults.strict),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CpmConfig(slack_tolerance={}, strict={}, verbosity={})",
            self.slack_tolerance, self.strict, self.verbosity
        )
    }
}
