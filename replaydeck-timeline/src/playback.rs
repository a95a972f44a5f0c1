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

//! Real-time playback pacing.
//!
//! The host drives a cooperative per-frame loop and calls into the
//! session once per frame; this module only converts real elapsed time
//! into scaled timeline milliseconds. Stopping clears the reference
//! instant, so a frame callback that fires after a stop reads a stopped
//! clock and advances nothing.

use std::time::Instant;

use parking_lot::Mutex;

/// Source of the current instant, injected so playback is testable
/// without waiting on real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, delta: std::time::Duration) {
        *self.now.lock() += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Two-state pacing machine: stopped or playing.
///
/// While playing, each [`advance`](Self::advance) returns the timeline
/// delta accrued since the previous call, scaled by the speed
/// multiplier, and re-anchors the reference instant regardless of the
/// delta so drift never compounds.
#[derive(Debug)]
pub struct PlaybackClock {
    speed: f64,
    last_tick: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            speed: 1.0,
            last_tick: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.last_tick.is_some()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Arm playback from `now`. Idempotent while already playing.
    pub fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            self.last_tick = Some(now);
        }
    }

    /// Disarm playback. Subsequent ticks advance nothing until the next
    /// `start`.
    pub fn stop(&mut self) {
        self.last_tick = None;
    }

    /// Update the multiplier. Takes effect from the next tick; the
    /// reference instant is untouched, so no position jump occurs.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        } else {
            tracing::warn!("Ignoring invalid playback speed {}", speed);
        }
    }

    /// Scaled timeline milliseconds elapsed since the last tick, or 0.0
    /// when stopped.
    pub fn advance(&mut self, now: Instant) -> f64 {
        match self.last_tick {
            None => 0.0,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                self.last_tick = Some(now);
                elapsed.as_secs_f64() * 1000.0 * self.speed
            }
        }
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stopped_clock_never_advances() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        clock.advance(Duration::from_millis(500));
        assert_eq!(playback.advance(clock.now()), 0.0);
    }

    #[test]
    fn test_advance_returns_scaled_delta() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        playback.start(clock.now());
        clock.advance(Duration::from_millis(100));
        let delta = playback.advance(clock.now());
        assert!((delta - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_multiplier_applied() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        playback.set_speed(4.0);
        playback.start(clock.now());
        clock.advance(Duration::from_millis(50));
        let delta = playback.advance(clock.now());
        assert!((delta - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_change_mid_playback_no_jump() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        playback.start(clock.now());
        clock.advance(Duration::from_millis(100));
        playback.advance(clock.now());
        // Speed change between ticks must not rewind or replay the
        // elapsed interval.
        playback.set_speed(8.0);
        let delta = playback.advance(clock.now());
        assert_eq!(delta, 0.0);
        clock.advance(Duration::from_millis(10));
        let delta = playback.advance(clock.now());
        assert!((delta - 80.0).abs() < 1e-6);
    }

    #[test]
    fn test_stop_disarms_late_tick() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        playback.start(clock.now());
        playback.stop();
        clock.advance(Duration::from_millis(1000));
        assert_eq!(playback.advance(clock.now()), 0.0);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_invalid_speed_ignored() {
        let mut playback = PlaybackClock::new();
        playback.set_speed(0.0);
        playback.set_speed(-2.0);
        playback.set_speed(f64::NAN);
        assert_eq!(playback.speed(), 1.0);
    }

    #[test]
    fn test_start_is_idempotent_while_playing() {
        let clock = ManualClock::new();
        let mut playback = PlaybackClock::new();
        playback.start(clock.now());
        clock.advance(Duration::from_millis(40));
        // A second start must not re-anchor and swallow elapsed time.
        playback.start(clock.now());
        let delta = playback.advance(clock.now());
        assert!((delta - 40.0).abs() < 1e-6);
    }
}
