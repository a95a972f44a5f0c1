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

//! Replaydeck Core
//!
//! Data model and ingestion for completed execution records: tool-call
//! steps as captured by the execution engine, and transcript lines with
//! estimated timestamps interpolated across the execution duration.

pub mod error;
pub mod record;
pub mod steps;
pub mod transcript;

pub use error::StepParseError;
pub use record::ExecutionRecord;
pub use steps::{parse_steps, parse_steps_strict, ToolCallStep};
pub use transcript::{build_lines, EstimatedMs, LogLine};
