// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Driver that records every call with its time offset.
//!
//! Time comes from `tokio::time`, so under a paused test clock the
//! offsets are exact.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::SoundDriver;
use crate::music::MidiNote;

/// One call received by a [`RecordingDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    Start {
        pitch: MidiNote,
        velocity: u8,
        channel: u8,
    },
    Stop {
        pitch: MidiNote,
        channel: u8,
    },
    Voice(u8),
}

impl DriverCall {
    pub fn is_start(&self) -> bool {
        matches!(self, DriverCall::Start { .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, DriverCall::Stop { .. })
    }
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<(Duration, DriverCall)>,
    sounding: BTreeSet<(u8, MidiNote)>,
}

/// In-memory driver for tests and dry runs
#[derive(Debug)]
pub struct RecordingDriver {
    origin: Instant,
    log: Mutex<Log>,
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            log: Mutex::new(Log::default()),
        }
    }

    fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: DriverCall) {
        let at = self.origin.elapsed();
        let mut log = self.log();
        match call {
            DriverCall::Start { pitch, channel, .. } => {
                log.sounding.insert((channel, pitch));
            }
            DriverCall::Stop { pitch, channel } => {
                log.sounding.remove(&(channel, pitch));
            }
            DriverCall::Voice(_) => {}
        }
        log.calls.push((at, call));
    }

    /// All calls so far
    pub fn calls(&self) -> Vec<DriverCall> {
        self.log().calls.iter().map(|(_, call)| *call).collect()
    }

    /// All calls so far with their offset from driver creation
    pub fn timed_calls(&self) -> Vec<(Duration, DriverCall)> {
        self.log().calls.clone()
    }

    /// Pitches started and not yet stopped, as (channel, pitch)
    pub fn sounding(&self) -> Vec<(u8, MidiNote)> {
        self.log().sounding.iter().copied().collect()
    }

    /// Offsets of each run of consecutive note-on calls
    pub fn strike_times(&self) -> Vec<Duration> {
        batch_times(&self.log().calls, DriverCall::is_start)
    }

    /// Offsets of each run of consecutive note-off calls
    pub fn release_times(&self) -> Vec<Duration> {
        batch_times(&self.log().calls, DriverCall::is_stop)
    }

    /// Collapse the call log into alternating batches: `true` for a run
    /// of note-ons, `false` for a run of note-offs. Voice calls are skipped.
    pub fn batches(&self) -> Vec<bool> {
        let mut batches = Vec::new();
        for (_, call) in self.log().calls.iter() {
            if matches!(call, DriverCall::Voice(_)) {
                continue;
            }
            let starting = call.is_start();
            if batches.last() != Some(&starting) {
                batches.push(starting);
            }
        }
        batches
    }

    /// Forget every recorded call and sounding pitch
    pub fn clear(&self) {
        let mut log = self.log();
        log.calls.clear();
        log.sounding.clear();
    }
}

fn batch_times(
    calls: &[(Duration, DriverCall)],
    wanted: fn(&DriverCall) -> bool,
) -> Vec<Duration> {
    let mut times = Vec::new();
    let mut in_batch = false;
    for (at, call) in calls {
        if matches!(call, DriverCall::Voice(_)) {
            continue;
        }
        let hit = wanted(call);
        if hit && !in_batch {
            times.push(*at);
        }
        in_batch = hit;
    }
    times
}

impl SoundDriver for RecordingDriver {
    fn start_pitch(&self, pitch: MidiNote, velocity: u8, channel: u8) {
        self.record(DriverCall::Start {
            pitch,
            velocity,
            channel,
        });
    }

    fn stop_pitch(&self, pitch: MidiNote, channel: u8) {
        self.record(DriverCall::Stop { pitch, channel });
    }

    fn select_voice(&self, program: u8, _wait_until_ready: bool) {
        self.record(DriverCall::Voice(program));
    }
}
