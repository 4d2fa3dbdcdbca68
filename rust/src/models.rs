//! Core data types for critical path analysis.

use chrono::{DateTime, Utc};
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an activity, as reported by the caller.
///
/// The engine only reads this; it never moves an activity between states.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
    Delayed,
    Skipped,
}

impl Default for ActivityStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl ActivityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
            Self::Skipped => "skipped",
        }
    }
}

/// A schedulable unit of work (voyage milestone) with a duration in hours.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    /// Planned duration in hours.
    #[pyo3(get, set)]
    pub duration: f64,
    /// Observed duration in hours, if known.
    #[pyo3(get, set)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<f64>,
    /// IDs of activities that must complete before this one can start.
    #[pyo3(get, set)]
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[pyo3(get, set)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<DateTime<Utc>>,
    #[pyo3(get, set)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<DateTime<Utc>>,
    #[pyo3(get, set)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_start: Option<DateTime<Utc>>,
    #[pyo3(get, set)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end: Option<DateTime<Utc>>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub status: ActivityStatus,
}

impl PathItem {
    /// A pending activity with no timestamps and no observed duration.
    pub fn pending(id: &str, name: &str, duration: f64, depends_on: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            duration,
            actual_duration: None,
            depends_on: depends_on.iter().map(|d| d.to_string()).collect(),
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            status: ActivityStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: ActivityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_actual_duration(mut self, hours: f64) -> Self {
        self.actual_duration = Some(hours);
        self
    }

    pub fn with_planned_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    pub fn with_actual_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.actual_start = Some(start);
        self.actual_end = Some(end);
        self
    }

    /// Duration used by the forward and backward passes: actual if observed, else planned.
    #[inline]
    pub fn effective_duration(&self) -> f64 {
        self.actual_duration.unwrap_or(self.duration)
    }
}

#[pymethods]
impl PathItem {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        duration,
        depends_on=Vec::new(),
        status=ActivityStatus::Pending,
        actual_duration=None,
        planned_start=None,
        planned_end=None,
        actual_start=None,
        actual_end=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        name: String,
        duration: f64,
        depends_on: Vec<String>,
        status: ActivityStatus,
        actual_duration: Option<f64>,
        planned_start: Option<DateTime<Utc>>,
        planned_end: Option<DateTime<Utc>>,
        actual_start: Option<DateTime<Utc>>,
        actual_end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            duration,
            actual_duration,
            depends_on,
            planned_start,
            planned_end,
            actual_start,
            actual_end,
            status,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PathItem(id={:?}, duration={}, status={}, deps={})",
            self.id,
            self.duration,
            self.status.as_str(),
            self.depends_on.len()
        )
    }
}

/// An activity together with its computed CPM timings (hours from schedule start).
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathItem {
    #[serde(flatten)]
    #[pyo3(get)]
    pub activity: PathItem,
    #[pyo3(get)]
    pub early_start: f64,
    #[pyo3(get)]
    pub early_finish: f64,
    #[pyo3(get)]
    pub late_start: f64,
    #[pyo3(get)]
    pub late_finish: f64,
    /// late_start - early_start. Zero slack = critical.
    #[pyo3(get)]
    pub slack: f64,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl CriticalPathItem {
    #[getter]
    fn id(&self) -> String {
        self.activity.id.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "CriticalPathItem(id={:?}, es={}, ef={}, slack={}, critical={})",
            self.activity.id, self.early_start, self.early_finish, self.slack, self.is_critical
        )
    }
}

/// Result of a critical path computation over one activity set.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPathResult {
    /// Computed activities, in topological order.
    #[pyo3(get)]
    pub items: Vec<CriticalPathItem>,
    /// IDs of critical activities, in topological order.
    #[pyo3(get)]
    pub critical_path: Vec<String>,
    /// Project length in hours (max early finish).
    #[pyo3(get)]
    pub total_duration: f64,
    /// Worst finish overrun in hours on completed critical activities.
    #[pyo3(get)]
    pub estimated_delay: f64,
    /// Weighted completion, 0-100.
    #[pyo3(get)]
    pub completion_percent: f64,
}

impl CriticalPathResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item(&self, id: &str) -> Option<&CriticalPathItem> {
        self.items.iter().find(|item| item.activity.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[pymethods]
impl CriticalPathResult {
    #[pyo3(name = "to_json")]
    fn py_to_json(&self) -> PyResult<String> {
        self.to_json()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "CriticalPathResult(items={}, critical={}, total_duration={}, completion={})",
            self.items.len(),
            self.critical_path.len(),
            self.total_duration,
            self.completion_percent
        )
    }
}

/// Parse a JSON array of activities.
pub fn parse_activities(json: &str) -> Result<Vec<PathItem>, serde_json::Error> {
    serde_json::from_str(json)
}
