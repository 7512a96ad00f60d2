//! Frame-stepped traces: run a small setup for a fixed number of frames and
//! capture selected state after each one.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use raypoint_core::FrameNumber;
use serde::Serialize;
use std::path::PathBuf;

/// State captured after one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceFrame<S> {
    /// Frame number; zero is the state before the first step.
    pub frame: u64,
    /// Captured state.
    pub snapshot: S,
}

/// A named sequence of captured frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTrace<S> {
    /// Trace name.
    pub name: String,
    /// Captured frames, starting with frame zero.
    pub frames: Vec<TraceFrame<S>>,
}

/// Step `state` `frames` times, capturing a snapshot before the first step and
/// after every step (`frames + 1` entries).
pub fn run_frame_trace<State, Snapshot, StepFn, SnapFn>(
    name: impl Into<String>,
    frames: u64,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> FrameTrace<Snapshot>
where
    StepFn: FnMut(FrameNumber, &mut State),
    SnapFn: FnMut(FrameNumber, &State) -> Snapshot,
{
    let mut captured = Vec::with_capacity(frames as usize + 1);
    let mut frame = FrameNumber::ZERO;
    captured.push(TraceFrame {
        frame: frame.0,
        snapshot: snapshot(frame, &state),
    });

    for _ in 0..frames {
        frame = frame.advance(1);
        step(frame, &mut state);
        captured.push(TraceFrame {
            frame: frame.0,
            snapshot: snapshot(frame, &state),
        });
    }

    FrameTrace {
        name: name.into(),
        frames: captured,
    }
}

/// Golden-file location for [`assert_frame_trace`].
#[derive(Debug, Clone)]
pub struct TraceSnapshotConfig {
    /// Trace name written into the report.
    pub name: String,
    /// Number of frames to step.
    pub frames: u64,
    /// Path of the golden JSON file.
    pub snapshot_path: PathBuf,
}

/// Run a trace and compare it against (or update) its golden file.
pub fn assert_frame_trace<State, Snapshot, StepFn, SnapFn>(
    config: TraceSnapshotConfig,
    state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snapshot: Serialize,
    StepFn: FnMut(FrameNumber, &mut State),
    SnapFn: FnMut(FrameNumber, &State) -> Snapshot,
{
    let trace = run_frame_trace(config.name, config.frames, state, step, snapshot);
    assert_json_snapshot(config.snapshot_path, &trace)
}
