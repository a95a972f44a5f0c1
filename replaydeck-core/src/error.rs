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

//! Error types for strict ingestion.
//!
//! The replay path itself is fail-soft and never surfaces these; they
//! exist for diagnostic tooling that wants to know *why* a step log was
//! rejected instead of silently degrading to an empty timeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepParseError {
    #[error("tool step log is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tool step log is not a JSON array (got {kind})")]
    NotAnArray { kind: &'static str },

    #[error("step {step_index} ends before it starts ({ended_at_ms} < {started_at_ms})")]
    InvertedSpan {
        step_index: u32,
        started_at_ms: u64,
        ended_at_ms: u64,
    },
}
