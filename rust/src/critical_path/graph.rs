//! Dependency graph construction and topological ordering.
//!
//! Activities live in the caller's slice (the arena); edges are stored as
//! arena positions in both directions so the forward pass can walk
//! predecessors and the backward pass can walk successors without rebuilding
//! anything.

use std::collections::VecDeque;

use thiserror::Error;

use crate::interner::{ActivityIdx, ActivityIndex};
use crate::models::PathItem;

/// Errors raised while building or validating an activity graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriticalPathError {
    #[error("Duplicate activity id: {id}")]
    DuplicateActivityId { id: String },
    #[error("Activity {activity} depends on unknown activity {dependency}")]
    DanglingDependency { activity: String, dependency: String },
    #[error("Activity {activity} has invalid duration {duration}")]
    InvalidDuration { activity: String, duration: f64 },
    #[error("Circular dependency detected among activities: {ids:?}")]
    DependencyCycle { ids: Vec<String> },
}

/// Directed dependency graph over a borrowed activity list.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    activities: &'a [PathItem],
    index: ActivityIndex,
    /// Resolved, de-duplicated predecessors per activity.
    predecessors: Vec<Vec<ActivityIdx>>,
    /// Direct successors per activity, in input order.
    successors: Vec<Vec<ActivityIdx>>,
    /// (activity, missing dependency id) pairs that could not be resolved.
    dangling: Vec<(ActivityIdx, &'a str)>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph. Fails only on duplicate IDs; other problems are
    /// recorded and reported by [`DependencyGraph::validate`].
    pub fn build(activities: &'a [PathItem]) -> Result<Self, CriticalPathError> {
        let n = activities.len();
        let mut index = ActivityIndex::with_capacity(n);
        for activity in activities {
            if index.insert_unique(&activity.id).is_err() {
                return Err(CriticalPathError::DuplicateActivityId {
                    id: activity.id.clone(),
                });
            }
        }

        let mut predecessors: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
        let mut dangling = Vec::new();
        // last_seen[p] == i + 1 means p is already a predecessor of i
        let mut last_seen: Vec<usize> = vec![0; n];

        for (i, activity) in activities.iter().enumerate() {
            let id = i as ActivityIdx;
            for dep in &activity.depends_on {
                match index.get(dep) {
                    Some(pred) => {
                        if last_seen[pred as usize] == i + 1 {
                            continue;
                        }
                        last_seen[pred as usize] = i + 1;
                        predecessors[i].push(pred);
                        successors[pred as usize].push(id);
                    }
                    None => dangling.push((id, dep.as_str())),
                }
            }
        }

        Ok(Self {
            activities,
            index,
            predecessors,
            successors,
            dangling,
        })
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    #[inline]
    pub fn activity(&self, idx: ActivityIdx) -> &'a PathItem {
        &self.activities[idx as usize]
    }

    pub fn index(&self) -> &ActivityIndex {
        &self.index
    }

    #[inline]
    pub fn predecessors(&self, idx: ActivityIdx) -> &[ActivityIdx] {
        &self.predecessors[idx as usize]
    }

    #[inline]
    pub fn successors(&self, idx: ActivityIdx) -> &[ActivityIdx] {
        &self.successors[idx as usize]
    }

    pub fn dangling(&self) -> &[(ActivityIdx, &'a str)] {
        &self.dangling
    }

    /// Topological sort using Kahn's algorithm. O(V + E).
    ///
    /// Zero in-degree activities are seeded in input order, so the result is
    /// deterministic. Activities on or behind a cycle never reach in-degree
    /// zero and end up in [`TopologicalOrder::unresolved`].
    pub fn topological_order(&self) -> TopologicalOrder {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();

        let mut queue: VecDeque<ActivityIdx> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(|i| i as ActivityIdx)
            .collect();

        let mut order: Vec<ActivityIdx> = Vec::with_capacity(n);
        let mut placed = vec![false; n];

        while let Some(current) = queue.pop_front() {
            order.push(current);
            placed[current as usize] = true;

            for &succ in self.successors(current) {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        let unresolved = (0..n)
            .filter(|&i| !placed[i])
            .map(|i| i as ActivityIdx)
            .collect();

        TopologicalOrder { order, unresolved }
    }

    /// Fail-fast validation: invalid durations, dangling references, cycles.
    ///
    /// Returns the topological order on success so callers do not sort twice.
    pub fn validate(&self) -> Result<TopologicalOrder, CriticalPathError> {
        for activity in self.activities {
            let durations = std::iter::once(activity.duration).chain(activity.actual_duration);
            for duration in durations {
                if !duration.is_finite() || duration < 0.0 {
                    return Err(CriticalPathError::InvalidDuration {
                        activity: activity.id.clone(),
                        duration,
                    });
                }
            }
        }

        if let Some(&(idx, dependency)) = self.dangling.first() {
            return Err(CriticalPathError::DanglingDependency {
                activity: self.activity(idx).id.clone(),
                dependency: dependency.to_string(),
            });
        }

        let order = self.topological_order();
        if !order.is_complete() {
            return Err(CriticalPathError::DependencyCycle {
                ids: order
                    .unresolved()
                    .iter()
                    .map(|&idx| self.activity(idx).id.clone())
                    .collect(),
            });
        }

        Ok(order)
    }
}

/// Output of the topological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    order: Vec<ActivityIdx>,
    unresolved: Vec<ActivityIdx>,
}

impl TopologicalOrder {
    /// Activities in dependency order (every activity after its predecessors).
    pub fn order(&self) -> &[ActivityIdx] {
        &self.order
    }

    /// Activities that could not be ordered, in input order.
    pub fn unresolved(&self) -> &[ActivityIdx] {
        &self.unresolved
    }

    /// True when every activity was ordered, i.e. the graph is acyclic.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Run strict validation over an activity list without computing a schedule.
pub fn validate_activities(activities: &[PathItem]) -> Result<(), CriticalPathError> {
    DependencyGraph::build(activities)?.validate().map(|_| ())
}
