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

//! Transcript lines with estimated timestamps.
//!
//! The raw transcript carries no per-line timing. Line timestamps are
//! interpolated linearly across the execution duration: line `i` of `n`
//! lands at `(i / max(n-1, 1)) * total_ms`. That is an approximation of
//! when the line appeared, not a measurement, which is why the value is
//! a distinct [`EstimatedMs`] rather than a plain millisecond offset.

use serde::{Deserialize, Serialize};

/// An interpolated timestamp in milliseconds from execution start.
///
/// Deliberately a separate type from the exact `u64` offsets on tool
/// steps so estimated and measured times cannot be mixed up downstream.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EstimatedMs(pub f64);

impl EstimatedMs {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether a scrub position at `current_ms` has reached this line.
    /// Inclusive: a line exactly at the scrub position is visible.
    pub fn reached_by(self, current_ms: f64) -> bool {
        self.0 <= current_ms
    }
}

/// One line of the execution transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    /// 0-based position in the original transcript.
    pub line_index: u32,
    pub text: String,
    pub timestamp: EstimatedMs,
}

/// Split a transcript into lines and assign estimated timestamps.
///
/// Returns an empty list when the transcript is absent/empty or the
/// execution duration is zero (no meaningful timeline exists). A single
/// trailing newline does not produce a phantom empty final line; empty
/// lines elsewhere are preserved as-is.
pub fn build_lines(transcript: Option<&str>, total_ms: u64) -> Vec<LogLine> {
    let text = match transcript {
        Some(t) if !t.is_empty() => t,
        _ => return Vec::new(),
    };
    if total_ms == 0 {
        return Vec::new();
    }

    let mut raw_lines: Vec<&str> = text.split('\n').collect();
    if text.ends_with('\n') {
        raw_lines.pop();
    }
    if raw_lines.is_empty() {
        return Vec::new();
    }

    let denom = raw_lines.len().saturating_sub(1).max(1) as f64;
    raw_lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| LogLine {
            line_index: i as u32,
            text: line.to_string(),
            timestamp: EstimatedMs(i as f64 / denom * total_ms as f64),
        })
        .collect()
}
