// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sound driver abstraction.
//!
//! The player never talks to a synthesizer directly. It goes through
//! [`SoundDriver`], so the same scheduling code can drive:
//! - A MIDI port via midir ([`MidiDriver`] over [`MidirOutput`])
//! - A dry run that only logs ([`LogDriver`])
//! - A recording fake in tests ([`RecordingDriver`])

pub mod midi;
pub mod midir_backend;
pub mod recording;

use tracing::{debug, info};

use crate::music::MidiNote;

pub use midi::{messages, MidiDriver, MidiOutput};
pub use midir_backend::{list_destinations, print_destinations, MidirOutput};
pub use recording::{DriverCall, RecordingDriver};

/// Something that can sound pitches.
///
/// Calls are synchronous and must not block for long: the player calls
/// them while it holds its note bookkeeping lock, including from
/// `stop_playback`. Failures are the driver's business to report.
pub trait SoundDriver: Send + Sync {
    /// Start sounding `pitch` on `channel`
    fn start_pitch(&self, pitch: MidiNote, velocity: u8, channel: u8);

    /// Stop sounding `pitch` on `channel`
    fn stop_pitch(&self, pitch: MidiNote, channel: u8);

    /// Switch the active voice (instrument) to a General MIDI program.
    ///
    /// `wait_until_ready` asks the driver to finish loading before
    /// returning, if loading is something it does.
    fn select_voice(&self, program: u8, wait_until_ready: bool);

    /// Bring the driver up
    fn start(&self) {}

    /// Shut the driver down, silencing anything left over
    fn stop(&self) {}
}

/// Driver that only logs what it is asked to play
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDriver;

impl SoundDriver for LogDriver {
    fn start_pitch(&self, pitch: MidiNote, velocity: u8, channel: u8) {
        info!(pitch, velocity, channel, "note on");
    }

    fn stop_pitch(&self, pitch: MidiNote, channel: u8) {
        debug!(pitch, channel, "note off");
    }

    fn select_voice(&self, program: u8, _wait_until_ready: bool) {
        info!(program, "voice");
    }
}
