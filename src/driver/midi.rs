// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI output for the sound driver.
//!
//! [`MidiOutput`] is the raw byte sink, so backends only need to move bytes.
//! [`MidiDriver`] turns sound driver calls into channel voice messages.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tracing::{debug, warn};

use super::SoundDriver;
use crate::music::MidiNote;

/// Trait for MIDI output implementations.
pub trait MidiOutput: Send {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x90, 60, 127]` for Note On)
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;

    // Channel Mode Messages (controller numbers)
    pub const ALL_NOTES_OFF: u8 = 123;

    pub const CHANNELS: u8 = 16;

    /// Status byte for a message kind on a channel
    pub fn status(kind: u8, channel: u8) -> u8 {
        kind | (channel & 0x0F)
    }
}

/// Sound driver that writes to a MIDI output.
///
/// A voice change is sent as a program change on every channel, so the
/// whole output behaves like a single-instrument sampler.
pub struct MidiDriver<O: MidiOutput> {
    output: Mutex<O>,
}

impl<O: MidiOutput> MidiDriver<O> {
    pub fn new(output: O) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }

    /// Take the output back
    pub fn into_inner(self) -> O {
        self.output.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn output(&self) -> MutexGuard<'_, O> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, message: &[u8]) {
        if let Err(e) = self.output().send(message) {
            warn!(error = %e, ?message, "MIDI send failed");
        }
    }
}

impl<O: MidiOutput> SoundDriver for MidiDriver<O> {
    fn start_pitch(&self, pitch: MidiNote, velocity: u8, channel: u8) {
        self.send(&[
            messages::status(messages::NOTE_ON, channel),
            pitch & 0x7F,
            velocity & 0x7F,
        ]);
    }

    fn stop_pitch(&self, pitch: MidiNote, channel: u8) {
        self.send(&[messages::status(messages::NOTE_OFF, channel), pitch & 0x7F, 0]);
    }

    fn select_voice(&self, program: u8, _wait_until_ready: bool) {
        debug!(program, "program change on all channels");
        for channel in 0..messages::CHANNELS {
            self.send(&[
                messages::status(messages::PROGRAM_CHANGE, channel),
                program & 0x7F,
            ]);
        }
    }

    fn stop(&self) {
        for channel in 0..messages::CHANNELS {
            self.send(&[
                messages::status(messages::CONTROL_CHANGE, channel),
                messages::ALL_NOTES_OFF,
                0,
            ]);
        }
    }
}
