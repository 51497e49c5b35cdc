// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord progression notation engine.
//!
//! Parses chord names, transposes charts, tokenizes the compact chart
//! notation (`C . G - (Am F) ()`) and plays progressions in real time
//! through a pluggable sound driver.

pub mod chart;
pub mod config;
pub mod driver;
pub mod error;
pub mod music;
pub mod playback;
pub mod transpose;

pub use chart::{join_sections, resolve_tokens, steps_of, tokenize, Step, Token};
pub use config::{CountInConfig, EngineConfig};
pub use driver::{LogDriver, MidiDriver, MidiOutput, MidirOutput, RecordingDriver, SoundDriver};
pub use error::ChordError;
pub use music::{notes_of, parse_chord_name, Chord, ChordQuality, NoteName, PitchClass};
pub use playback::{PlaybackEvent, PlaybackOutcome, Player};
pub use transpose::{transpose_chord, transpose_note, transpose_progression};
