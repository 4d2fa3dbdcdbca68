//! Critical Path Method over an activity network.
//!
//! A stateless pipeline: graph building and topological ordering, forward
//! pass, backward pass, slack classification, then delay and completion
//! figures. Every call owns its intermediate state and its result.

mod calculation;
mod graph;
mod progress;

pub use calculation::{
    calculate_critical_path, calculate_critical_path_json, ActivityTiming, JsonCalculationError,
    OUTPUT_DECIMALS,
};
pub use graph::{validate_activities, CriticalPathError, DependencyGraph, TopologicalOrder};
pub use progress::{completion_percent, estimate_delay};
