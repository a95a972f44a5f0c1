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

//! Immutable bundle of one execution's replayable artifacts.

use serde::{Deserialize, Serialize};

use crate::steps::{parse_steps, ToolCallStep};
use crate::transcript::{build_lines, LogLine};

/// Everything a replay session reads, parsed once at construction.
///
/// Immutable for the life of the session; safe to share across several
/// simultaneous sessions (e.g. comparing two executions side by side)
/// behind an `Arc` without copying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    steps: Vec<ToolCallStep>,
    lines: Vec<LogLine>,
    total_ms: u64,
    total_cost: f64,
}

impl ExecutionRecord {
    /// Ingest the raw artifacts the execution engine hands over.
    ///
    /// `tool_steps_json` and `log_content` may be absent or malformed;
    /// both degrade to empty collections. A missing duration is treated
    /// as zero (flat timeline). A negative or non-finite cost is
    /// clamped to zero.
    pub fn from_raw(
        tool_steps_json: Option<&str>,
        log_content: Option<&str>,
        duration_ms: Option<u64>,
        total_cost: f64,
    ) -> Self {
        let total_ms = duration_ms.unwrap_or(0);
        let total_cost = if total_cost.is_finite() {
            total_cost.max(0.0)
        } else {
            0.0
        };
        Self {
            steps: parse_steps(tool_steps_json),
            lines: build_lines(log_content, total_ms),
            total_ms,
            total_cost,
        }
    }

    /// Build from already-parsed parts. Used by tests and by callers
    /// that obtained steps through the strict parser.
    pub fn from_parts(
        steps: Vec<ToolCallStep>,
        lines: Vec<LogLine>,
        total_ms: u64,
        total_cost: f64,
    ) -> Self {
        Self {
            steps,
            lines,
            total_ms,
            total_cost: if total_cost.is_finite() { total_cost.max(0.0) } else { 0.0 },
        }
    }

    pub fn steps(&self) -> &[ToolCallStep] {
        &self.steps
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Look up a step by its `step_index` (indices are unique but not
    /// necessarily dense).
    pub fn step_by_index(&self, step_index: u32) -> Option<&ToolCallStep> {
        self.steps.iter().find(|s| s.step_index == step_index)
    }
}
