// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory model for chord charts.
//!
//! This module provides pitch-class arithmetic, note spelling and the
//! chord-quality tables used by the transposer and the player.

pub mod chord;
pub mod pitch;

pub use chord::{chord_quality_of, notes_of, parse_chord_name, Chord, ChordQuality};
pub use pitch::{pitch_class_of, MidiNote, NoteName, PitchClass, Spelling};
