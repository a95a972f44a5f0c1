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

//! End-to-end replay scenarios over raw execution artifacts, driven the
//! way a hosting UI would drive a session: ingest, scrub, step, play.

use std::sync::Arc;
use std::time::Duration;

use replaydeck_core::ExecutionRecord;
use replaydeck_timeline::{ManualClock, ReplaySession};

const TWO_STEP_LOG: &str = r#"[
    {"step_index":0,"tool_name":"Bash","input_preview":"cargo test","output_preview":"ok","started_at_ms":0,"ended_at_ms":400,"duration_ms":400},
    {"step_index":1,"tool_name":"Edit","input_preview":"src/lib.rs","output_preview":"","started_at_ms":400,"ended_at_ms":1000,"duration_ms":600}
]"#;

fn two_step_session() -> (ReplaySession, Arc<ManualClock>) {
    let record = Arc::new(ExecutionRecord::from_raw(
        Some(TWO_STEP_LOG),
        Some("starting\nrunning tests\nediting\nrechecking\ndone"),
        Some(1000),
        10.0,
    ));
    let clock = Arc::new(ManualClock::new());
    let session = ReplaySession::new(record, clock.clone());
    (session, clock)
}

#[test]
fn stepless_record_accrues_cost_with_time() {
    let record = Arc::new(ExecutionRecord::from_raw(None, Some("a\nb"), Some(1000), 2.0));
    let mut session = ReplaySession::new(record, Arc::new(ManualClock::new()));
    session.scrub_to(500.0);
    let state = session.state();
    assert!((state.accumulated_cost - 1.0).abs() < 1e-9);
}

#[test]
fn two_step_record_partitions_and_costs_at_scrub_points() {
    let (mut session, _) = two_step_session();

    session.scrub_to(200.0);
    let state = session.state();
    assert_eq!(state.active_step.unwrap().step_index, 0);
    assert!(state.completed_steps.is_empty());
    assert!((state.accumulated_cost - 2.5).abs() < 1e-9);

    session.scrub_to(1000.0);
    let state = session.state();
    assert_eq!(state.completed_steps.len(), 2);
    assert!(state.active_step.is_none());
    assert!((state.accumulated_cost - 10.0).abs() < 1e-9);
}

#[test]
fn discrete_stepping_visits_step_boundaries() {
    let (mut session, _) = two_step_session();
    assert_eq!(session.current_ms(), 0.0);
    session.step_forward();
    assert_eq!(session.current_ms(), 400.0);
    session.step_forward();
    assert_eq!(session.current_ms(), 1000.0);
    session.step_forward();
    assert_eq!(session.current_ms(), 1000.0);
}

#[test]
fn playback_clamps_and_stops_at_the_end() {
    let (mut session, clock) = two_step_session();
    session.scrub_to(900.0);
    session.play();
    // Frame loop: several small frames totalling well past the end.
    for _ in 0..6 {
        clock.advance(Duration::from_millis(25));
        session.tick();
    }
    assert_eq!(session.current_ms(), 1000.0);
    assert!(!session.is_playing());
}

#[test]
fn line_timestamps_interpolate_across_duration() {
    let record = ExecutionRecord::from_raw(None, Some("a\nb\nc\nd\ne"), Some(1000), 0.0);
    let stamps: Vec<f64> = record.lines().iter().map(|l| l.timestamp.value()).collect();
    assert_eq!(stamps, vec![0.0, 250.0, 500.0, 750.0, 1000.0]);
}

#[test]
fn fast_playback_respects_speed_multiplier() {
    let (mut session, clock) = two_step_session();
    session.set_speed(4.0);
    session.play();
    clock.advance(Duration::from_millis(100));
    session.tick();
    assert!((session.current_ms() - 400.0).abs() < 1e-6);
    assert!(session.is_playing());
}

#[test]
fn scrub_during_playback_is_not_overwritten_by_next_tick() {
    let (mut session, clock) = two_step_session();
    session.play();
    clock.advance(Duration::from_millis(100));
    session.tick();
    // User drags the scrubber between frames.
    session.scrub_to(700.0);
    clock.advance(Duration::from_millis(50));
    session.tick();
    assert!((session.current_ms() - 750.0).abs() < 1e-6);
}

#[test]
fn fork_point_round_trip_to_rerun_feature() {
    let (mut session, _) = two_step_session();
    session.scrub_to(500.0);
    session.set_fork_point(Some(1));
    assert_eq!(session.state().fork_point, Some(1));
    // Commit hands the index to the external re-run feature.
    assert_eq!(session.take_fork_point(), Some(1));
    assert_eq!(session.state().fork_point, None);
}

#[test]
fn malformed_step_log_degrades_to_transcript_only() {
    let record = Arc::new(ExecutionRecord::from_raw(
        Some("{definitely-not-json"),
        Some("one\ntwo\nthree"),
        Some(600),
        3.0,
    ));
    let mut session = ReplaySession::new(record, Arc::new(ManualClock::new()));
    session.scrub_to(300.0);
    let state = session.state();
    assert!(state.completed_steps.is_empty());
    assert!(state.active_step.is_none());
    assert_eq!(state.visible_lines.len(), 2);
    // Cost falls back to pure time proportion.
    assert!((state.accumulated_cost - 1.5).abs() < 1e-9);
}

#[test]
fn state_serializes_for_the_hosting_ui() {
    let (mut session, _) = two_step_session();
    session.scrub_to(200.0);
    let json = serde_json::to_value(session.state()).unwrap();
    assert_eq!(json["current_ms"], 200.0);
    assert_eq!(json["active_step"]["tool_name"], "Bash");
    assert_eq!(json["visible_lines"].as_array().unwrap().len(), 1);
}
