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

//! Replaydeck Timeline
//!
//! Scrubbable replay over a completed [`ExecutionRecord`]: pure
//! projection of "what had happened by time T", discrete stepping over
//! step boundaries, real-time playback at a configurable speed, and
//! fork-point selection for the external re-run feature.
//!
//! The single source of truth is the scrub position. Every derived view
//! (visible lines, step partition, accumulated cost) is recomputed from
//! it on demand; nothing derived is cached or mutated independently.
//!
//! [`ExecutionRecord`]: replaydeck_core::ExecutionRecord

pub mod boundary;
pub mod playback;
pub mod projector;
pub mod session;

pub use boundary::BoundaryIndex;
pub use playback::{Clock, ManualClock, PlaybackClock, SystemClock};
pub use projector::{accumulated_cost, partition_steps, visible_lines, StepPartition};
pub use session::{ReplaySession, ReplayState};
