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

//! Jump points for discrete timeline navigation.

use std::collections::BTreeSet;

use replaydeck_core::ToolCallStep;

/// A millisecond of slack so a search from exactly on a boundary does
/// not stall there (scrub positions are fractional, boundaries are not).
const STEP_EPSILON_MS: f64 = 1.0;

/// Sorted, de-duplicated set of interesting time points: 0, the total
/// duration, and every step start/end. Step times past the end of the
/// execution are clamped so stepping never leaves `[0, total_ms]`.
///
/// Used only by discrete stepping; continuous scrubbing and playback
/// ignore it.
#[derive(Debug, Clone)]
pub struct BoundaryIndex {
    points: Vec<u64>,
}

impl BoundaryIndex {
    pub fn build(steps: &[ToolCallStep], total_ms: u64) -> Self {
        let mut set = BTreeSet::new();
        set.insert(0);
        set.insert(total_ms);
        for step in steps {
            set.insert(step.started_at_ms.min(total_ms));
            if let Some(ended) = step.ended_at_ms {
                set.insert(ended.min(total_ms));
            }
        }
        Self {
            points: set.into_iter().collect(),
        }
    }

    pub fn points(&self) -> &[u64] {
        &self.points
    }

    /// Smallest boundary strictly after `current_ms` (with epsilon).
    pub fn next_after(&self, current_ms: f64) -> Option<u64> {
        self.points
            .iter()
            .copied()
            .find(|&p| p as f64 > current_ms + STEP_EPSILON_MS)
    }

    /// Largest boundary strictly before `current_ms` (with epsilon).
    pub fn prev_before(&self, current_ms: f64) -> Option<u64> {
        self.points
            .iter()
            .rev()
            .copied()
            .find(|&p| (p as f64) < current_ms - STEP_EPSILON_MS)
    }
}
