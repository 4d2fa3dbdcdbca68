//! Schedule delay estimation and weighted completion.

use chrono::{DateTime, Utc};

use crate::models::{ActivityStatus, CriticalPathItem, PathItem};

use super::calculation::{round_to, OUTPUT_DECIMALS};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Worst finish overrun, in hours, over completed critical activities.
///
/// Only critical activities count: slippage elsewhere is absorbed by slack.
/// Activities missing either end timestamp are skipped. Never negative.
pub fn estimate_delay(items: &[CriticalPathItem]) -> f64 {
    let worst = items
        .iter()
        .filter(|item| item.is_critical && item.activity.status == ActivityStatus::Completed)
        .filter_map(|item| match (item.activity.planned_end, item.activity.actual_end) {
            (Some(planned), Some(actual)) => Some(hours_between(planned, actual)),
            _ => None,
        })
        .fold(0.0, f64::max);

    round_to(worst, OUTPUT_DECIMALS)
}

/// Completion percentage (0-100) weighted by planned duration.
///
/// Completed activities earn their full planned duration; in-progress ones
/// earn their observed duration capped at the planned one. The denominator
/// always uses planned durations.
pub fn completion_percent<'a>(activities: impl IntoIterator<Item = &'a PathItem>) -> f64 {
    let mut total_planned = 0.0;
    let mut completed = 0.0;

    for activity in activities {
        total_planned += activity.duration;
        match (activity.status, activity.actual_duration) {
            (ActivityStatus::Completed, _) => completed += activity.duration,
            (ActivityStatus::InProgress, Some(actual)) if actual > 0.0 => {
                completed += actual.min(activity.duration)
            }
            _ => {}
        }
    }

    if total_planned > 0.0 {
        round_to(completed / total_planned * 100.0, OUTPUT_DECIMALS)
    } else {
        0.0
    }
}
