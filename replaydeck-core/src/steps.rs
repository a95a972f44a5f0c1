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

//! Tool-call steps captured during execution.
//!
//! The execution engine serializes steps as a JSON array with snake_case
//! fields. The log comes from an untrusted/legacy path, so the default
//! parser is fail-soft: a malformed step log degrades to an empty list
//! and the timeline falls back to transcript-only replay.

use serde::{Deserialize, Serialize};

use crate::error::StepParseError;

/// One discrete tool invocation during an execution.
///
/// `step_index` is unique and increases in source order; steps are *not*
/// guaranteed to be sorted by `started_at_ms` (tool calls may interleave).
/// `duration_ms` is advisory: it is carried through for display but all
/// timeline math derives spans from `started_at_ms`/`ended_at_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallStep {
    pub step_index: u32,
    pub tool_name: String,
    #[serde(default)]
    pub input_preview: String,
    #[serde(default)]
    pub output_preview: String,
    pub started_at_ms: u64,
    #[serde(default)]
    pub ended_at_ms: Option<u64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl ToolCallStep {
    /// A step with no recorded end was still open when the execution
    /// finished.
    pub fn is_open(&self) -> bool {
        self.ended_at_ms.is_none()
    }

    /// Upper bound of this step's span, falling back to the execution
    /// total when the step never ended.
    pub fn span_end(&self, total_ms: u64) -> u64 {
        self.ended_at_ms.unwrap_or(total_ms)
    }
}

/// Parse a raw tool-step log, absorbing every malformation.
///
/// Returns an empty list for absent/empty input, non-JSON input, or a
/// JSON value that is not an array. Array elements that fail to
/// deserialize are skipped individually. Steps whose recorded end
/// precedes their start are normalized to open steps.
pub fn parse_steps(raw: Option<&str>) -> Vec<ToolCallStep> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Vec::new(),
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Discarding unparseable tool step log: {}", e);
            return Vec::new();
        }
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            tracing::warn!("Tool step log is not an array (got {})", json_kind(&other));
            return Vec::new();
        }
    };

    let mut steps = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ToolCallStep>(item) {
            Ok(step) => steps.push(normalize(step)),
            Err(e) => {
                tracing::warn!("Skipping malformed tool step at position {}: {}", i, e);
            }
        }
    }
    steps
}

/// Strict variant of [`parse_steps`] for diagnostic tooling.
///
/// Surfaces the first malformation instead of degrading. The replay
/// session never calls this.
pub fn parse_steps_strict(raw: &str) -> Result<Vec<ToolCallStep>, StepParseError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(StepParseError::NotAnArray {
                kind: json_kind(&other),
            })
        }
    };

    let mut steps = Vec::with_capacity(items.len());
    for item in items {
        let step: ToolCallStep = serde_json::from_value(item)?;
        if let Some(ended) = step.ended_at_ms {
            if ended < step.started_at_ms {
                return Err(StepParseError::InvertedSpan {
                    step_index: step.step_index,
                    started_at_ms: step.started_at_ms,
                    ended_at_ms: ended,
                });
            }
        }
        steps.push(step);
    }
    Ok(steps)
}

/// An end before the start cannot come from a sane recorder; treat the
/// step as still open rather than poisoning downstream span math.
fn normalize(mut step: ToolCallStep) -> ToolCallStep {
    if let Some(ended) = step.ended_at_ms {
        if ended < step.started_at_ms {
            tracing::warn!(
                "Step {} has ended_at_ms {} before started_at_ms {}; treating as open",
                step.step_index,
                ended,
                step.started_at_ms
            );
            step.ended_at_ms = None;
        }
    }
    step
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
