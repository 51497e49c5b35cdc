// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Progression player.
//!
//! Turns chart text into timed driver calls. One session plays at a time:
//! starting a new one cancels the old one first, and `stop_playback`
//! silences the current one before it returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::session::Session;
use super::timing::{beat_duration, clamp_tempo, Tempo, COUNT_IN_BEATS};
use crate::chart::{steps_of, Step};
use crate::config::EngineConfig;
use crate::driver::SoundDriver;
use crate::error::ChordError;
use crate::music::{parse_chord_name, NoteName};

/// Capacity of the event channel; slow subscribers lag rather than block
const EVENT_CAPACITY: usize = 64;

/// How a playback call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every step was played
    Completed,
    /// Stopped early by `stop_playback` or a newer session
    Cancelled,
    /// Nothing to play
    Empty,
}

/// Progress notifications for subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started { session: u64, steps: usize },
    CountIn { session: u64, beat: u32 },
    Step { session: u64, index: usize, step: Step },
    Finished { session: u64, outcome: PlaybackOutcome },
}

/// Plays chord progressions through a sound driver
pub struct Player {
    driver: Arc<dyn SoundDriver>,
    config: EngineConfig,
    tempo: Tempo,
    current: Mutex<Option<Arc<Session>>>,
    next_session: AtomicU64,
    events: broadcast::Sender<PlaybackEvent>,
}

impl Player {
    /// Create a player with the given driver and configuration
    pub fn new(driver: Arc<dyn SoundDriver>, config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            driver,
            tempo: Tempo::new(config.tempo),
            config,
            current: Mutex::new(None),
            next_session: AtomicU64::new(1),
            events,
        }
    }

    /// Create a player with the default configuration
    pub fn with_driver(driver: Arc<dyn SoundDriver>) -> Self {
        Self::new(driver, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Set the tempo used by `play`, clamped to 20-240 BPM
    pub fn set_tempo(&self, bpm: f64) -> f64 {
        let bpm = self.tempo.set(bpm);
        debug!(bpm, "tempo set");
        bpm
    }

    /// Get current tempo
    pub fn tempo(&self) -> f64 {
        self.tempo.get()
    }

    /// Subscribe to playback events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Whether a session is playing and not cancelled
    pub fn is_playing(&self) -> bool {
        self.current()
            .as_ref()
            .map_or(false, |session| !session.is_cancelled())
    }

    /// Stop the current session.
    ///
    /// Everything it started is silenced before this returns, and it will
    /// not start anything else. The playing task winds down on its own.
    pub fn stop_playback(&self) {
        let session = self.current().clone();
        if let Some(session) = session {
            info!(session = session.id(), "stopping playback");
            session.cancel();
        }
    }

    /// Play a progression at the current tempo
    pub async fn play(&self, text: &str, with_count_in: bool) -> PlaybackOutcome {
        self.play_progression(text, self.tempo(), 1.0, with_count_in)
            .await
    }

    /// Play a progression.
    ///
    /// Each step lasts `60 / tempo * beat_multiplier` seconds. The tempo
    /// applies to this call only and leaves `tempo()` as it was. Chords
    /// that do not parse are skipped but still take their beat. Returns
    /// once the progression has finished or been cancelled. Dropping the
    /// returned future silences the session the same way.
    pub async fn play_progression(
        &self,
        text: &str,
        tempo_bpm: f64,
        beat_multiplier: f64,
        with_count_in: bool,
    ) -> PlaybackOutcome {
        let steps = steps_of(text);
        if steps.is_empty() {
            debug!("nothing to play");
            return PlaybackOutcome::Empty;
        }

        let guard = self.begin_session();
        let session = &guard.session;
        let tempo = clamp_tempo(tempo_bpm);
        info!(
            session = session.id(),
            steps = steps.len(),
            tempo,
            beat_multiplier,
            with_count_in,
            "playing progression"
        );
        self.emit(PlaybackEvent::Started {
            session: session.id(),
            steps: steps.len(),
        });

        if with_count_in {
            self.count_in(session, beat_duration(tempo, 1.0)).await;
        }

        let beat = beat_duration(tempo, beat_multiplier);
        self.play_steps(session, &steps, beat).await;

        self.finish(guard)
    }

    /// Play a progression on its own task.
    ///
    /// The text is copied, so the caller can drop it right away.
    pub fn spawn_progression(
        self: &Arc<Self>,
        text: impl Into<String>,
        tempo_bpm: f64,
        beat_multiplier: f64,
        with_count_in: bool,
    ) -> JoinHandle<PlaybackOutcome> {
        let player = Arc::clone(self);
        let text = text.into();
        tokio::spawn(async move {
            player
                .play_progression(&text, tempo_bpm, beat_multiplier, with_count_in)
                .await
        })
    }

    /// Sound one chord for `beats` beats at the current tempo
    pub async fn play_chord(
        &self,
        chord: &str,
        beats: f64,
    ) -> Result<PlaybackOutcome, ChordError> {
        let chord = parse_chord_name(chord)?;
        let notes = chord.midi_notes(self.config.octave);

        let guard = self.begin_session();
        let session = &guard.session;
        debug!(session = session.id(), %chord, ?notes, "chord preview");
        session.start_notes(&notes, self.config.chord_velocity, self.config.channel);
        session.pause(beat_duration(self.tempo(), beats)).await;

        Ok(self.finish(guard))
    }

    /// Sound one note in `octave` for `beats` beats at the current tempo
    pub async fn play_note(
        &self,
        note: &str,
        octave: i32,
        beats: f64,
    ) -> Result<PlaybackOutcome, ChordError> {
        let note = NoteName::parse(note)?;
        let pitch = note.pitch_class.to_midi(octave);

        let guard = self.begin_session();
        let session = &guard.session;
        debug!(session = session.id(), %note, pitch, "note preview");
        session.start_notes(&[pitch], self.config.chord_velocity, self.config.channel);
        session.pause(beat_duration(self.tempo(), beats)).await;

        Ok(self.finish(guard))
    }

    fn current(&self) -> MutexGuard<'_, Option<Arc<Session>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a new session, cancelling the one it replaces
    fn begin_session(&self) -> SessionGuard<'_> {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(id, Arc::clone(&self.driver), self.config.voice_program);

        let previous = self.current().replace(Arc::clone(&session));
        if let Some(previous) = previous {
            if !previous.is_cancelled() {
                info!(old = previous.id(), new = id, "replacing active session");
            }
            previous.cancel();
        }
        SessionGuard {
            player: self,
            session,
        }
    }

    /// Clean up a session that ran to its end and report how it ended
    fn finish(&self, guard: SessionGuard<'_>) -> PlaybackOutcome {
        let id = guard.session.id();
        let outcome = if guard.session.is_cancelled() {
            PlaybackOutcome::Cancelled
        } else {
            PlaybackOutcome::Completed
        };
        drop(guard);

        info!(session = id, ?outcome, "playback finished");
        self.emit(PlaybackEvent::Finished {
            session: id,
            outcome,
        });
        outcome
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Start a chord on the session, or skip it if it does not parse
    fn strike(&self, session: &Session, text: &str) {
        match parse_chord_name(text) {
            Ok(chord) => {
                let notes = chord.midi_notes(self.config.octave);
                debug!(session = session.id(), %chord, ?notes, "strike");
                session.start_notes(&notes, self.config.chord_velocity, self.config.channel);
            }
            Err(e) => debug!(session = session.id(), error = %e, "skipping chord"),
        }
    }

    async fn play_steps(&self, session: &Session, steps: &[Step], beat: Duration) {
        let gap = beat.mul_f64(self.config.gap_fraction());

        for (index, step) in steps.iter().enumerate() {
            if session.is_cancelled() {
                break;
            }
            let next = steps.get(index + 1);
            self.emit(PlaybackEvent::Step {
                session: session.id(),
                index,
                step: step.clone(),
            });

            match step {
                Step::Hold => {
                    session.pause(beat).await;
                }
                Step::Rest => {
                    session.silence();
                    session.pause(beat).await;
                }
                Step::Group { total, chord, .. } => {
                    session.silence();
                    self.strike(session, chord);
                    let share = u32::try_from((*total).max(1)).unwrap_or(u32::MAX);
                    session.pause(beat / share).await;

                    let rings_on =
                        next.map_or(false, |n| step.continues_group(n) || *n == Step::Hold);
                    if !rings_on {
                        session.silence();
                    }
                }
                Step::Strike(chord) => {
                    session.silence();
                    self.strike(session, chord);

                    match next {
                        // Let it ring into the hold
                        Some(Step::Hold) => {
                            session.pause(beat).await;
                        }
                        Some(Step::Strike(_)) => {
                            session.pause(beat.saturating_sub(gap)).await;
                            session.silence();
                            session.pause(gap).await;
                        }
                        _ => {
                            session.pause(beat).await;
                            session.silence();
                        }
                    }
                }
            }
        }
    }

    /// Four clicks on the percussion voice, first one accented
    async fn count_in(&self, session: &Session, beat: Duration) {
        let count_in = &self.config.count_in;
        let settle = Duration::from_millis(self.config.settle_delay_ms);
        let click = Duration::from_millis(count_in.click_length_ms).min(beat);

        if !session.switch_voice(count_in.percussion_program) {
            return;
        }
        session.pause(settle).await;

        for n in 1..=COUNT_IN_BEATS {
            if session.is_cancelled() {
                break;
            }
            let (note, velocity) = if n == 1 {
                (count_in.accent_note, count_in.accent_velocity)
            } else {
                (count_in.click_note, count_in.click_velocity)
            };

            self.emit(PlaybackEvent::CountIn {
                session: session.id(),
                beat: n,
            });
            session.start_notes(&[note], velocity, count_in.channel);
            session.pause(click).await;
            session.silence();

            let rest = if n == COUNT_IN_BEATS {
                beat.mul_f64(count_in.last_tick_factor())
            } else {
                beat.saturating_sub(click)
            };
            session.pause(rest).await;
        }

        if session.restore_voice() {
            session.pause(settle).await;
        } else if !session.is_cancelled() {
            warn!(session = session.id(), "voice already restored");
        }
    }
}

/// Holds a session for one playback call.
///
/// Dropping it silences the session, undoes a count-in voice switch and
/// clears the current slot if the session still holds it. That happens
/// whether the call returns or its future is dropped part way through.
struct SessionGuard<'a> {
    player: &'a Player,
    session: Arc<Session>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.session.silence();
        self.session.restore_voice();

        let mut current = self.player.current();
        if current
            .as_ref()
            .map_or(false, |active| Arc::ptr_eq(active, &self.session))
        {
            *current = None;
        }
    }
}
