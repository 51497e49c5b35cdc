// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-playback session state.
//!
//! A session owns the cancellation flag and the set of pitches it has
//! started. Both live behind one lock, so once `cancel` returns nothing
//! the session started is still sounding and nothing new can start.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::trace;

use crate::driver::SoundDriver;
use crate::music::MidiNote;

#[derive(Debug, Default)]
struct Sounding {
    /// (channel, pitch) pairs started and not yet stopped
    notes: BTreeSet<(u8, MidiNote)>,
    /// The count-in voice is selected and must be switched back
    voice_switched: bool,
}

pub(crate) struct Session {
    id: u64,
    driver: Arc<dyn SoundDriver>,
    /// Program to restore after a voice switch
    voice_program: u8,
    cancelled: AtomicBool,
    wake: Notify,
    sounding: Mutex<Sounding>,
}

impl Session {
    pub(crate) fn new(id: u64, driver: Arc<dyn SoundDriver>, voice_program: u8) -> Arc<Self> {
        Arc::new(Self {
            id,
            driver,
            voice_program,
            cancelled: AtomicBool::new(false),
            wake: Notify::new(),
            sounding: Mutex::new(Sounding::default()),
        })
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    fn sounding(&self) -> MutexGuard<'_, Sounding> {
        self.sounding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Stop the session: silence it, undo any voice switch and wake the
    /// scheduler if it is waiting
    pub(crate) fn cancel(&self) {
        {
            let mut sounding = self.sounding();
            self.cancelled.store(true, Ordering::SeqCst);
            self.release(&mut sounding);
            self.restore(&mut sounding, false);
        }
        self.wake.notify_one();
    }

    /// Start pitches on a channel. Returns false, starting nothing, once
    /// the session is cancelled.
    pub(crate) fn start_notes(&self, pitches: &[MidiNote], velocity: u8, channel: u8) -> bool {
        let mut sounding = self.sounding();
        if self.is_cancelled() {
            return false;
        }
        for &pitch in pitches {
            if sounding.notes.insert((channel, pitch)) {
                self.driver.start_pitch(pitch, velocity, channel);
            }
        }
        true
    }

    /// Stop everything this session has sounding
    pub(crate) fn silence(&self) {
        let mut sounding = self.sounding();
        self.release(&mut sounding);
    }

    fn release(&self, sounding: &mut Sounding) {
        for (channel, pitch) in std::mem::take(&mut sounding.notes) {
            self.driver.stop_pitch(pitch, channel);
        }
    }

    /// Switch to another voice for the count-in. Does nothing once cancelled.
    pub(crate) fn switch_voice(&self, program: u8) -> bool {
        let mut sounding = self.sounding();
        if self.is_cancelled() {
            return false;
        }
        self.driver.select_voice(program, true);
        sounding.voice_switched = true;
        true
    }

    /// Switch back to the session voice if a switch is outstanding
    pub(crate) fn restore_voice(&self) -> bool {
        let mut sounding = self.sounding();
        self.restore(&mut sounding, true)
    }

    fn restore(&self, sounding: &mut Sounding, wait_until_ready: bool) -> bool {
        if !sounding.voice_switched {
            return false;
        }
        sounding.voice_switched = false;
        self.driver.select_voice(self.voice_program, wait_until_ready);
        true
    }

    #[cfg(test)]
    pub(crate) fn sounding_count(&self) -> usize {
        self.sounding().notes.len()
    }

    /// Wait for `duration`, waking early on cancellation.
    ///
    /// Returns false if the session was cancelled before or during the wait.
    pub(crate) async fn pause(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_cancelled(),
            _ = self.wake.notified() => {
                trace!(session = self.id, "woken by cancel");
                false
            }
        }
    }
}
