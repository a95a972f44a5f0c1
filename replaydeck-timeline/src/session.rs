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

//! Replay session controller.
//!
//! Owns the only mutable state of a replay: the scrub position, the
//! playback arm, the speed multiplier, and the fork-point selection.
//! Every derived view is recomputed from the scrub position on each
//! [`ReplaySession::state`] call; the record itself is never touched.

use std::sync::Arc;

use serde::Serialize;

use replaydeck_core::{ExecutionRecord, LogLine, ToolCallStep};

use crate::boundary::BoundaryIndex;
use crate::playback::{Clock, PlaybackClock};
use crate::projector::{accumulated_cost, partition_steps, visible_lines};

/// Snapshot of the replay at the current scrub position, borrowed from
/// the session's immutable record. Serialized as-is for the hosting UI.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayState<'a> {
    pub current_ms: f64,
    pub total_ms: u64,
    pub is_playing: bool,
    pub speed: f64,
    pub visible_lines: &'a [LogLine],
    pub completed_steps: Vec<&'a ToolCallStep>,
    pub active_step: Option<&'a ToolCallStep>,
    pub pending_steps: Vec<&'a ToolCallStep>,
    pub accumulated_cost: f64,
    pub fork_point: Option<u32>,
}

/// One scrubbable replay over a completed execution record.
///
/// Single-threaded by design: the host's frame loop and its input
/// handlers run on the same context, so a scrub or pause issued between
/// frames is observed by the next [`tick`](Self::tick). The record may
/// be shared with other sessions; only the session-local quadruple
/// (position, playing, speed, fork point) ever mutates.
pub struct ReplaySession {
    record: Arc<ExecutionRecord>,
    boundaries: BoundaryIndex,
    clock: Arc<dyn Clock>,
    playback: PlaybackClock,
    current_ms: f64,
    fork_point: Option<u32>,
}

impl ReplaySession {
    pub fn new(record: Arc<ExecutionRecord>, clock: Arc<dyn Clock>) -> Self {
        let boundaries = BoundaryIndex::build(record.steps(), record.total_ms());
        Self {
            record,
            boundaries,
            clock,
            playback: PlaybackClock::new(),
            current_ms: 0.0,
            fork_point: None,
        }
    }

    pub fn record(&self) -> &ExecutionRecord {
        &self.record
    }

    pub fn current_ms(&self) -> f64 {
        self.current_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Move the scrub position, clamped into `[0, total_ms]`. A
    /// non-finite target is ignored.
    pub fn scrub_to(&mut self, ms: f64) {
        if !ms.is_finite() {
            return;
        }
        self.current_ms = ms.clamp(0.0, self.record.total_ms() as f64);
    }

    pub fn play(&mut self) {
        self.playback.start(self.clock.now());
    }

    pub fn pause(&mut self) {
        self.playback.stop();
    }

    pub fn toggle_play(&mut self) {
        if self.playback.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.playback.set_speed(speed);
    }

    pub fn speed(&self) -> f64 {
        self.playback.speed()
    }

    pub fn jump_to_start(&mut self) {
        self.playback.stop();
        self.current_ms = 0.0;
    }

    pub fn jump_to_end(&mut self) {
        self.playback.stop();
        self.current_ms = self.record.total_ms() as f64;
    }

    /// Jump to the next step boundary, if any. No-op at the end.
    pub fn step_forward(&mut self) {
        if let Some(point) = self.boundaries.next_after(self.current_ms) {
            self.current_ms = point as f64;
        }
    }

    /// Jump to the previous step boundary, if any. No-op at the start.
    pub fn step_backward(&mut self) {
        if let Some(point) = self.boundaries.prev_before(self.current_ms) {
            self.current_ms = point as f64;
        }
    }

    /// Advance playback by the real time elapsed since the last frame.
    /// Reaching the end clamps the position and stops this playback
    /// pass. Does nothing while paused.
    pub fn tick(&mut self) {
        let delta = self.playback.advance(self.clock.now());
        if delta <= 0.0 {
            return;
        }
        let total = self.record.total_ms() as f64;
        self.current_ms = (self.current_ms + delta).min(total);
        if self.current_ms >= total {
            self.playback.stop();
            tracing::debug!("Playback reached end of timeline at {} ms", total);
        }
    }

    /// Record the step the user wants a future re-run to fork from.
    /// `None` clears the selection; an index that resolves to no step
    /// is ignored.
    pub fn set_fork_point(&mut self, step_index: Option<u32>) {
        match step_index {
            None => self.fork_point = None,
            Some(idx) => {
                if self.record.step_by_index(idx).is_some() {
                    tracing::debug!("Fork point set to step {}", idx);
                    self.fork_point = Some(idx);
                } else {
                    tracing::warn!("Ignoring fork point for unknown step index {}", idx);
                }
            }
        }
    }

    pub fn fork_point(&self) -> Option<u32> {
        self.fork_point
    }

    /// Hand the selected fork point to the external re-run feature,
    /// clearing the session's selection.
    pub fn take_fork_point(&mut self) -> Option<u32> {
        self.fork_point.take()
    }

    /// Derive the full replay view from the current scrub position.
    pub fn state(&self) -> ReplayState<'_> {
        let partition = partition_steps(self.record.steps(), self.current_ms);
        let cost = accumulated_cost(
            self.record.steps(),
            &partition,
            self.current_ms,
            self.record.total_ms(),
            self.record.total_cost(),
        );
        ReplayState {
            current_ms: self.current_ms,
            total_ms: self.record.total_ms(),
            is_playing: self.playback.is_playing(),
            speed: self.playback.speed(),
            visible_lines: visible_lines(self.record.lines(), self.current_ms),
            completed_steps: partition.completed,
            active_step: partition.active,
            pending_steps: partition.pending,
            accumulated_cost: cost,
            fork_point: self.fork_point,
        }
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        // Closing the inspection view must leave no armed playback
        // behind.
        self.playback.stop();
    }
}
