//! Critical path calculation using forward and backward passes.

use crate::config::CpmConfig;
use crate::interner::ActivityIdx;
use crate::models::{CriticalPathItem, CriticalPathResult, PathItem};
use crate::{log_changes, log_checks, log_debug};

use super::graph::{CriticalPathError, DependencyGraph};
use super::progress::{completion_percent, estimate_delay};

/// Decimal places kept in every reported hour figure.
pub const OUTPUT_DECIMALS: i32 = 2;

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Per-activity timing, in hours from schedule start.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityTiming {
    /// Earliest possible start time (from forward pass).
    pub early_start: f64,
    /// Earliest possible finish time (from forward pass).
    pub early_finish: f64,
    /// Latest allowable start time (from backward pass).
    pub late_start: f64,
    /// Latest allowable finish time (from backward pass).
    pub late_finish: f64,
    /// Slack = late_start - early_start, rounded to OUTPUT_DECIMALS.
    pub slack: f64,
}

impl ActivityTiming {
    pub fn is_critical(&self, tolerance: f64) -> bool {
        self.slack.abs() < tolerance
    }
}

/// Forward pass: ES = max(EF of predecessors), EF = ES + effective duration.
///
/// Only activities in `order` receive a timing. Returns the project duration
/// (max EF, 0 when nothing was ordered).
fn forward_pass(
    graph: &DependencyGraph<'_>,
    order: &[ActivityIdx],
    timings: &mut [Option<ActivityTiming>],
    verbosity: u8,
) -> f64 {
    let mut total_duration: f64 = 0.0;

    for &idx in order {
        let mut early_start: f64 = 0.0;
        for &pred in graph.predecessors(idx) {
            if let Some(ref pred_timing) = timings[pred as usize] {
                early_start = early_start.max(pred_timing.early_finish);
            }
        }

        let early_finish = early_start + graph.activity(idx).effective_duration();
        total_duration = total_duration.max(early_finish);

        log_debug!(
            verbosity,
            "  forward {}: es={} ef={}",
            graph.activity(idx).id,
            early_start,
            early_finish
        );

        timings[idx as usize] = Some(ActivityTiming {
            early_start,
            early_finish,
            late_start: 0.0,  // Will be filled in backward pass
            late_finish: 0.0, // Will be filled in backward pass
            slack: 0.0,       // Will be computed after backward pass
        });
    }

    total_duration
}

/// Backward pass: LF = min(LS of successors) or the project duration for
/// sinks, LS = LF - effective duration. Slack is derived here as well.
fn backward_pass(
    graph: &DependencyGraph<'_>,
    order: &[ActivityIdx],
    timings: &mut [Option<ActivityTiming>],
    total_duration: f64,
    verbosity: u8,
) {
    for &idx in order.iter().rev() {
        // Successors outside the order (behind a cycle) have no timing and
        // leave the project duration as the bound.
        let mut late_finish = total_duration;
        for &succ in graph.successors(idx) {
            if let Some(ref succ_timing) = timings[succ as usize] {
                late_finish = late_finish.min(succ_timing.late_start);
            }
        }

        let late_start = late_finish - graph.activity(idx).effective_duration();

        if let Some(ref mut timing) = timings[idx as usize] {
            timing.late_finish = late_finish;
            timing.late_start = late_start;
            timing.slack = round_to(late_start - timing.early_start, OUTPUT_DECIMALS);

            log_debug!(
                verbosity,
                "  backward {}: ls={} lf={} slack={}",
                graph.activity(idx).id,
                late_start,
                late_finish,
                timing.slack
            );
        }
    }
}

/// Build the output items and the critical path, both in topological order.
fn classify(
    graph: &DependencyGraph<'_>,
    order: &[ActivityIdx],
    timings: &[Option<ActivityTiming>],
    tolerance: f64,
) -> (Vec<CriticalPathItem>, Vec<String>) {
    let mut items = Vec::with_capacity(order.len());
    let mut critical_path = Vec::new();

    for &idx in order {
        let Some(ref timing) = timings[idx as usize] else {
            continue;
        };
        let activity = graph.activity(idx);
        let is_critical = timing.is_critical(tolerance);

        if is_critical {
            critical_path.push(activity.id.clone());
        }

        items.push(CriticalPathItem {
            activity: activity.clone(),
            early_start: round_to(timing.early_start, OUTPUT_DECIMALS),
            early_finish: round_to(timing.early_finish, OUTPUT_DECIMALS),
            late_start: round_to(timing.late_start, OUTPUT_DECIMALS),
            late_finish: round_to(timing.late_finish, OUTPUT_DECIMALS),
            slack: timing.slack,
            is_critical,
        });
    }

    (items, critical_path)
}

/// Calculate the critical path of an activity network (CPM).
///
/// Steps:
/// 1. Build the dependency graph and order it topologically
/// 2. Forward pass: early start / early finish
/// 3. Backward pass: late start / late finish, seeded by the project duration
/// 4. Slack = LS - ES; activities with zero slack are critical
/// 5. Estimated delay from completed critical activities, weighted completion
///
/// In strict mode (the default) invalid input is rejected. Otherwise activities
/// the sort cannot place are left out of every output figure and unknown
/// predecessors are ignored.
///
/// # Returns
/// * `Ok(CriticalPathResult)` freshly allocated for this call
/// * `Err(CriticalPathError)` on duplicate IDs, or any invalid input in strict mode
pub fn calculate_critical_path(
    activities: &[PathItem],
    config: &CpmConfig,
) -> Result<CriticalPathResult, CriticalPathError> {
    let verbosity = config.verbosity;

    if activities.is_empty() {
        return Ok(CriticalPathResult::empty());
    }

    let graph = DependencyGraph::build(activities)?;
    log_changes!(verbosity, "Critical path over {} activities", graph.len());

    let topo = if config.strict {
        graph.validate()?
    } else {
        for &(idx, dependency) in graph.dangling() {
            log_checks!(
                verbosity,
                "  {} depends on unknown activity {}, ignoring",
                graph.activity(idx).id,
                dependency
            );
        }
        let topo = graph.topological_order();
        if !topo.is_complete() {
            log_changes!(
                verbosity,
                "Dependency cycle: {} of {} activities excluded",
                topo.unresolved().len(),
                graph.len()
            );
        }
        topo
    };
    let order = topo.order();

    let mut timings: Vec<Option<ActivityTiming>> = vec![None; graph.len()];
    let total_duration = forward_pass(&graph, order, &mut timings, verbosity);
    backward_pass(&graph, order, &mut timings, total_duration, verbosity);

    let (items, critical_path) = classify(&graph, order, &timings, config.slack_tolerance);

    let estimated_delay = estimate_delay(&items);
    let completion_percent = completion_percent(items.iter().map(|item| &item.activity));

    log_changes!(
        verbosity,
        "Project duration {}h, {} critical activities, delay {}h, {}% complete",
        total_duration,
        critical_path.len(),
        estimated_delay,
        completion_percent
    );

    Ok(CriticalPathResult {
        items,
        critical_path,
        total_duration: round_to(total_duration, OUTPUT_DECIMALS),
        estimated_delay,
        completion_percent,
    })
}

/// Parse a JSON activity array, compute, and serialize the result.
pub fn calculate_critical_path_json(
    activities_json: &str,
    config: &CpmConfig,
) -> Result<String, JsonCalculationError> {
    let activities = crate::models::parse_activities(activities_json)?;
    let result = calculate_critical_path(&activities, config)?;
    Ok(result.to_json()?)
}

/// Errors from the JSON entry point.
#[derive(thiserror::Error, Debug)]
pub enum JsonCalculationError {
    #[error("Invalid activity JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    CriticalPath(#[from] CriticalPathError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityStatus;

    fn make_item(id: &str, duration: f64, deps: &[&str]) -> PathItem {
        PathItem::pending(id, id, duration, deps)
    }

    fn converging() -> Vec<PathItem> {
        vec![
            make_item("A", 10.0, &[]),
            make_item("B", 5.0, &["A"]),
            make_item("C", 20.0, &["A"]),
            make_item("D", 2.0, &["B", "C"]),
        ]
    }

    #[test]
    fn test_empty_input() {
        let result = calculate_critical_path(&[], &CpmConfig::default()).unwrap();

        assert!(result.items.is_empty());
        assert!(result.critical_path.is_empty());
        assert_eq!(result.total_duration, 0.0);
        assert_eq!(result.estimated_delay, 0.0);
        assert_eq!(result.completion_percent, 0.0);
    }

    #[test]
    fn test_linear_chain_all_critical() {
        let ids: Vec<String> = (1..=5).map(|i| format!("A{}", i)).collect();
        let items: Vec<PathItem> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let deps: Vec<&str> = if i == 0 {
                    vec![]
                } else {
                    vec![ids[i - 1].as_str()]
                };
                make_item(id, 3.5, &deps)
            })
            .collect();

        let result = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        assert_eq!(result.total_duration, 17.5);
        assert_eq!(result.critical_path, ids);
        for item in &result.items {
            assert!(item.is_critical);
            assert_eq!(item.slack, 0.0);
        }
    }

    #[test]
    fn test_parallel_branches_converging() {
        let result = calculate_critical_path(&converging(), &CpmConfig::default()).unwrap();

        assert_eq!(result.total_duration, 32.0);
        assert_eq!(result.critical_path, vec!["A", "C", "D"]);

        let b = result.item("B").unwrap();
        assert_eq!(b.slack, 15.0);
        assert!(!b.is_critical);
        assert_eq!(b.early_start, 10.0);
        assert_eq!(b.early_finish, 15.0);
        assert_eq!(b.late_start, 25.0);
        assert_eq!(b.late_finish, 30.0);

        let d = result.item("D").unwrap();
        assert_eq!(d.early_start, 30.0);
        assert_eq!(d.late_finish, 32.0);
    }

    #[test]
    fn test_items_in_topological_order() {
        let mut items = converging();
        items.reverse();
        let result = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        let order: Vec<&str> = result
            .items
            .iter()
            .map(|item| item.activity.id.as_str())
            .collect();
        assert_eq!(order.first(), Some(&"A"));
        assert_eq!(order.last(), Some(&"D"));
        assert_eq!(result.critical_path, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_deterministic_output() {
        let items = converging();
        let first = calculate_critical_path(&items, &CpmConfig::default()).unwrap();
        let second = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert_eq!(items, converging());
    }

    #[test]
    fn test_actual_duration_extends_schedule() {
        let items = vec![
            make_item("a", 10.0, &[]).with_actual_duration(12.0),
            make_item("b", 5.0, &["a"]),
        ];
        let result = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        assert_eq!(result.total_duration, 17.0);
        assert_eq!(result.item("b").unwrap().early_start, 12.0);
    }

    #[test]
    fn test_disjoint_critical_chains_listed_flat() {
        let items = vec![
            make_item("x1", 4.0, &[]),
            make_item("y1", 3.0, &[]),
            make_item("x2", 2.0, &["x1"]),
            make_item("y2", 3.0, &["y1"]),
        ];
        let result = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        assert_eq!(result.total_duration, 6.0);
        assert_eq!(result.critical_path, vec!["x1", "y1", "x2", "y2"]);
    }

    #[test]
    fn test_slack_tolerance_configurable() {
        let items = vec![make_item("a", 2.0, &[]), make_item("b", 1.5, &[])];

        let strict_tol = calculate_critical_path(&items, &CpmConfig::default()).unwrap();
        assert_eq!(strict_tol.critical_path, vec!["a"]);
        assert_eq!(strict_tol.item("b").unwrap().slack, 0.5);

        let coarse = CpmConfig {
            slack_tolerance: 1.0,
            ..CpmConfig::default()
        };
        let coarse_tol = calculate_critical_path(&items, &coarse).unwrap();
        assert_eq!(coarse_tol.critical_path, vec!["a", "b"]);
    }

    #[test]
    fn test_fractional_durations_rounded() {
        let items = vec![
            make_item("a", 0.1, &[]),
            make_item("b", 0.2, &["a"]),
            make_item("c", 0.333, &[]),
        ];
        let result = calculate_critical_path(&items, &CpmConfig::default()).unwrap();

        assert_eq!(result.total_duration, 0.33);
        assert_eq!(result.item("b").unwrap().early_finish, 0.3);
        assert_eq!(result.critical_path, vec!["c"]);
        assert_eq!(result.item("a").unwrap().slack, 0.03);
    }

    #[test]
    fn test_strict_cycle_is_error() {
        let items = vec![make_item("A", 1.0, &["B"]), make_item("B", 1.0, &["A"])];
        let err = calculate_critical_path(&items, &CpmConfig::default()).unwrap_err();

        assert_eq!(
            err,
            CriticalPathError::DependencyCycle {
                ids: vec!["A".to_string(), "B".to_string()]
            }
        );
    }

    #[test]
    fn test_permissive_cycle_degrades() {
        let items = vec![
            make_item("A", 5.0, &["B"]),
            make_item("B", 5.0, &["A"]),
            make_item("C", 4.0, &[]),
            make_item("D", 9.0, &["A"]).with_status(ActivityStatus::Completed),
        ];
        let result = calculate_critical_path(&items, &CpmConfig::permissive()).unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.critical_path, vec!["C"]);
        assert_eq!(result.total_duration, 4.0);
        // D sits behind the cycle, so its completed duration does not count
        assert_eq!(result.completion_percent, 0.0);
    }

    #[test]
    fn test_permissive_pure_cycle_is_empty() {
        let items = vec![make_item("A", 1.0, &["B"]), make_item("B", 1.0, &["A"])];
        let result = calculate_critical_path(&items, &CpmConfig::permissive()).unwrap();

        assert_eq!(result, CriticalPathResult::empty());
    }

    #[test]
    fn test_permissive_dangling_dependency_contributes_zero() {
        let items = vec![make_item("a", 2.0, &[]), make_item("b", 3.0, &["ghost"])];
        let result = calculate_critical_path(&items, &CpmConfig::permissive()).unwrap();

        assert_eq!(result.total_duration, 3.0);
        assert_eq!(result.item("b").unwrap().early_start, 0.0);
        assert_eq!(result.critical_path, vec!["b"]);
        assert_eq!(result.item("a").unwrap().slack, 1.0);
    }

    #[test]
    fn test_strict_dangling_dependency_is_error() {
        let items = vec![make_item("b", 3.0, &["ghost"])];
        assert!(matches!(
            calculate_critical_path(&items, &CpmConfig::default()),
            Err(CriticalPathError::DanglingDependency { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected_in_both_modes() {
        let items = vec![make_item("a", 1.0, &[]), make_item("a", 1.0, &[])];
        for config in [CpmConfig::default(), CpmConfig::permissive()] {
            assert!(matches!(
                calculate_critical_path(&items, &config),
                Err(CriticalPathError::DuplicateActivityId { .. })
            ));
        }
    }

    #[test]
    fn test_completion_monotonic_when_completing() {
        let base = vec![
            make_item("a", 4.0, &[]).with_status(ActivityStatus::Completed),
            make_item("b", 6.0, &["a"])
                .with_status(ActivityStatus::InProgress)
                .with_actual_duration(2.0),
            make_item("c", 10.0, &["b"]),
        ];
        let before = calculate_critical_path(&base, &CpmConfig::default())
            .unwrap()
            .completion_percent;
        assert_eq!(before, 30.0);

        for i in 1..base.len() {
            let mut changed = base.clone();
            changed[i].status = ActivityStatus::Completed;
            let after = calculate_critical_path(&changed, &CpmConfig::default())
                .unwrap()
                .completion_percent;
            assert!(after >= before, "completing {} lowered completion", i);
        }
    }

    #[test]
    fn test_json_entry_point() {
        let json = r#"[
            {"id": "A", "name": "A", "duration": 10},
            {"id": "B", "name": "B", "duration": 5, "dependsOn": ["A"]}
        ]"#;
        let output = calculate_critical_path_json(json, &CpmConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["totalDuration"], 15.0);
        assert_eq!(value["criticalPath"], serde_json::json!(["A", "B"]));
        assert_eq!(value["items"][1]["earlyStart"], 10.0);
    }

    #[test]
    fn test_json_entry_point_errors() {
        assert!(matches!(
            calculate_critical_path_json("not json", &CpmConfig::default()),
            Err(JsonCalculationError::Json(_))
        ));
        let cyclic = r#"[{"id": "A", "name": "A", "duration": 1, "dependsOn": ["A"]}]"#;
        assert!(matches!(
            calculate_critical_path_json(cyclic, &CpmConfig::default()),
            Err(JsonCalculationError::CriticalPath(
                CriticalPathError::DependencyCycle { .. }
            ))
        ));
    }

    #[test]
    fn test_timing_is_critical() {
        let timing = ActivityTiming {
            early_start: 0.0,
            early_finish: 5.0,
            late_start: 0.0,
            late_finish: 5.0,
            slack: 0.0,
        };
        assert!(timing.is_critical(0.001));

        let with_slack = ActivityTiming {
            slack: 2.0,
            ..timing
        };
        assert!(!with_slack.is_critical(0.001));
    }
}
