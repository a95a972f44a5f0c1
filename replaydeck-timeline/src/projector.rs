// Copyright 2025 Replaydeck Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Pure derivation of timeline views from a scrub position.
//!
//! Everything here is a referentially-transparent function of the
//! immutable record plus `current_ms`. Callers recompute on every
//! position change; no function mutates or caches anything.

use replaydeck_core::{LogLine, ToolCallStep};

/// Steps partitioned by their relation to the scrub position.
///
/// Under well-formed (non-overlapping) input every step lands in exactly
/// one bucket. When the source data contains genuinely overlapping
/// spans, the first qualifying step in source order is reported as
/// active and later overlapping steps are held back until they complete.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPartition<'a> {
    pub completed: Vec<&'a ToolCallStep>,
    pub active: Option<&'a ToolCallStep>,
    pub pending: Vec<&'a ToolCallStep>,
}

/// Lines whose estimated timestamp has been reached (inclusive).
///
/// Line timestamps are nondecreasing by construction, so the visible
/// set is a prefix and can be returned without copying.
pub fn visible_lines(lines: &[LogLine], current_ms: f64) -> &[LogLine] {
    let end = lines.partition_point(|l| l.timestamp.reached_by(current_ms));
    &lines[..end]
}

/// Partition steps into completed / active / pending at `current_ms`.
///
/// Completed: ended at or before the scrub position. Pending: not yet
/// started. Active: started, and either still open or ending after the
/// scrub position; first match in source order wins.
pub fn partition_steps(steps: &[ToolCallStep], current_ms: f64) -> StepPartition<'_> {
    let mut partition = StepPartition {
        completed: Vec::new(),
        active: None,
        pending: Vec::new(),
    };

    for step in steps {
        let started = step.started_at_ms as f64;
        match step.ended_at_ms {
            Some(ended) if (ended as f64) <= current_ms => partition.completed.push(step),
            _ if started > current_ms => partition.pending.push(step),
            _ => {
                if partition.active.is_none() {
                    partition.active = Some(step);
                }
            }
        }
    }
    partition
}

/// Proportional cost accrued by `current_ms`.
///
/// Each step carries an equal share of the total cost, granted in full
/// on completion; the active step earns its share pro rata across its
/// own span (end falling back to `total_ms` for open steps, span length
/// floored at 1 ms). With no steps at all the cost accrues purely with
/// time. Nondecreasing in `current_ms` for fixed inputs.
pub fn accumulated_cost(
    steps: &[ToolCallStep],
    partition: &StepPartition<'_>,
    current_ms: f64,
    total_ms: u64,
    total_cost: f64,
) -> f64 {
    if total_ms == 0 || total_cost <= 0.0 {
        return 0.0;
    }
    if steps.is_empty() {
        let fraction = (current_ms / total_ms as f64).clamp(0.0, 1.0);
        return fraction * total_cost;
    }

    let weight = 1.0 / steps.len() as f64;
    let mut accrued = partition.completed.len() as f64 * weight;

    if let Some(active) = partition.active {
        let span_start = active.started_at_ms as f64;
        let span_len = active
            .span_end(total_ms)
            .saturating_sub(active.started_at_ms)
            .max(1) as f64;
        let elapsed = (current_ms - span_start).clamp(0.0, span_len);
        accrued += elapsed / span_len * weight;
    }

    (accrued * total_cost).min(total_cost)
}
