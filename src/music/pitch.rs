// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and note names.
//!
//! Provides the twelve-tone pitch-class circle, the fixed sharp/flat
//! name tables and conversion to MIDI note numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChordError;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Note names using sharps, indexed by pitch class
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note names using flats, indexed by pitch class
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Pitch classes that are spelled with a flat after transposition
pub const FLAT_PREFERRED: [u8; 5] = [1, 3, 6, 8, 10];

/// A semitone class relative to C, always in 0..=11
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Create a pitch class, reducing the value mod 12
    pub fn new(value: i32) -> Self {
        PitchClass(value.rem_euclid(12) as u8)
    }

    /// Get the raw value (0-11)
    pub fn value(self) -> u8 {
        self.0
    }

    /// Move by semitones around the circle
    pub fn transpose(self, semitones: i32) -> Self {
        PitchClass::new(self.0 as i32 + semitones)
    }

    /// Spelling used when a note lands on this pitch class after transposition
    pub fn preferred_spelling(self) -> Spelling {
        if FLAT_PREFERRED.contains(&self.0) {
            Spelling::Flat
        } else {
            Spelling::Sharp
        }
    }

    /// MIDI note for this pitch class in the given octave (C4 = 60), clamped to 0..=127
    pub fn to_midi(self, octave: i32) -> MidiNote {
        midi_note(self.0 as i32 + (octave + 1) * 12)
    }
}

/// Clamp an arbitrary note number into the MIDI range
pub fn midi_note(value: i32) -> MidiNote {
    value.clamp(0, 127) as MidiNote
}

/// How a note name was, or should be, written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spelling {
    /// Natural or sharp name (C, C#, D, ...)
    Sharp,
    /// Flat name (Db, Eb, Gb, Ab, Bb)
    Flat,
}

/// A pitch class together with the way it is written
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct NoteName {
    pub pitch_class: PitchClass,
    pub spelling: Spelling,
}

impl NoteName {
    /// Parse a note name such as "C", "F#" or "Bb"
    pub fn parse(name: &str) -> Result<Self, ChordError> {
        if let Some(pc) = SHARP_NAMES.iter().position(|n| *n == name) {
            return Ok(Self {
                pitch_class: PitchClass(pc as u8),
                spelling: Spelling::Sharp,
            });
        }
        if let Some(pc) = FLAT_NAMES.iter().position(|n| *n == name) {
            return Ok(Self {
                pitch_class: PitchClass(pc as u8),
                spelling: Spelling::Flat,
            });
        }
        Err(ChordError::UnknownNote(name.to_string()))
    }

    /// Note name for a pitch class using its preferred spelling
    pub fn preferred(pitch_class: PitchClass) -> Self {
        Self {
            pitch_class,
            spelling: pitch_class.preferred_spelling(),
        }
    }

    /// The written name
    pub fn as_str(&self) -> &'static str {
        let idx = self.pitch_class.value() as usize;
        match self.spelling {
            Spelling::Sharp => SHARP_NAMES[idx],
            Spelling::Flat => FLAT_NAMES[idx],
        }
    }
}

// Two names are the same note regardless of enharmonic spelling
impl PartialEq for NoteName {
    fn eq(&self, other: &Self) -> bool {
        self.pitch_class == other.pitch_class
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the pitch class of a note name
pub fn pitch_class_of(name: &str) -> Result<PitchClass, ChordError> {
    NoteName::parse(name).map(|n| n.pitch_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_of_naturals() {
        assert_eq!(pitch_class_of("C").unwrap().value(), 0);
        assert_eq!(pitch_class_of("E").unwrap().value(), 4);
        assert_eq!(pitch_class_of("A").unwrap().value(), 9);
        assert_eq!(pitch_class_of("B").unwrap().value(), 11);
    }

    #[test]
    fn test_pitch_class_of_accidentals() {
        assert_eq!(pitch_class_of("C#").unwrap(), pitch_class_of("Db").unwrap());
        assert_eq!(pitch_class_of("F#").unwrap().value(), 6);
        assert_eq!(pitch_class_of("Bb").unwrap().value(), 10);
        assert_eq!(pitch_class_of("Ab").unwrap().value(), 8);
    }

    #[test]
    fn test_unknown_note() {
        assert_eq!(
            pitch_class_of("H"),
            Err(ChordError::UnknownNote("H".to_string()))
        );
        // Only the twelve table names are known
        assert!(pitch_class_of("Cb").is_err());
        assert!(pitch_class_of("E#").is_err());
        assert!(pitch_class_of("c").is_err());
    }

    #[test]
    fn test_pitch_class_wraps() {
        assert_eq!(PitchClass::new(-1).value(), 11);
        assert_eq!(PitchClass::new(25).value(), 1);
        assert_eq!(PitchClass::new(11).transpose(2).value(), 1);
        assert_eq!(PitchClass::C.transpose(-13).value(), 11);
    }

    #[test]
    fn test_preferred_spelling() {
        for pc in 0..12 {
            let name = NoteName::preferred(PitchClass::new(pc));
            let expected_flat = [1, 3, 6, 8, 10].contains(&pc);
            assert_eq!(name.as_str().ends_with('b'), expected_flat, "pc {}", pc);
            assert!(!name.as_str().contains('#') || !expected_flat);
        }
        assert_eq!(NoteName::preferred(PitchClass::new(5)).as_str(), "F");
        assert_eq!(NoteName::preferred(PitchClass::new(6)).as_str(), "Gb");
    }

    #[test]
    fn test_note_name_keeps_spelling() {
        let sharp = NoteName::parse("A#").unwrap();
        let flat = NoteName::parse("Bb").unwrap();
        assert_eq!(sharp.to_string(), "A#");
        assert_eq!(flat.to_string(), "Bb");
        assert_eq!(sharp, flat);
    }

    #[test]
    fn test_to_midi() {
        assert_eq!(PitchClass::C.to_midi(4), 60);
        assert_eq!(PitchClass::new(9).to_midi(4), 69);
        assert_eq!(PitchClass::new(9).to_midi(5), 81);
        assert_eq!(PitchClass::new(11).to_midi(9), 127);
        assert_eq!(PitchClass::C.to_midi(-3), 0);
    }
}
