// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord names and chord qualities.
//!
//! A chord is written as a root note, an optional quality suffix and an
//! optional slash bass: `C`, `F#m7`, `Bbmaj7/D`. Parsing is strict about
//! the root and bass note names but deliberately permissive about the
//! suffix: anything unrecognised plays as a major triad.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pitch::{midi_note, MidiNote, NoteName, PitchClass};
use crate::error::ChordError;

/// Chord qualities supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
}

impl ChordQuality {
    /// Semitone offsets from the root, in voicing order
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
        }
    }

    /// Resolve a quality suffix (case-insensitive). Unknown suffixes are major.
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix.to_lowercase().as_str() {
            "" | "maj" | "major" => ChordQuality::Major,
            "m" | "min" | "minor" => ChordQuality::Minor,
            "7" => ChordQuality::DominantSeventh,
            "maj7" | "major7" => ChordQuality::MajorSeventh,
            "m7" | "min7" | "minor7" => ChordQuality::MinorSeventh,
            "dim" | "diminished" => ChordQuality::Diminished,
            "aug" | "augmented" => ChordQuality::Augmented,
            "sus2" => ChordQuality::Sus2,
            "sus4" | "sus" => ChordQuality::Sus4,
            _ => ChordQuality::Major,
        }
    }
}

/// Resolve a quality suffix, see [`ChordQuality::from_suffix`]
pub fn chord_quality_of(suffix: &str) -> ChordQuality {
    ChordQuality::from_suffix(suffix)
}

/// A parsed chord name.
///
/// Chords are immutable; transposition builds a new one. Equality is
/// harmonic: `A#m` and `Bbm` compare equal, the written spelling is only
/// kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: NoteName,
    suffix: String,
    quality: ChordQuality,
    bass: Option<NoteName>,
}

impl Chord {
    /// Build a chord from its parts
    pub fn new(root: NoteName, suffix: impl Into<String>, bass: Option<NoteName>) -> Self {
        let suffix = suffix.into();
        let quality = ChordQuality::from_suffix(&suffix);
        Self {
            root,
            suffix,
            quality,
            bass,
        }
    }

    pub fn root(&self) -> NoteName {
        self.root
    }

    /// The quality suffix exactly as written
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    pub fn bass(&self) -> Option<NoteName> {
        self.bass
    }

    /// MIDI notes for this chord with the root in `octave` (C4 = 60).
    ///
    /// Chord tones stay within the root octave (wrapped by pitch class);
    /// the bass note sounds one octave below.
    pub fn midi_notes(&self, octave: i32) -> Vec<MidiNote> {
        let mut notes: Vec<MidiNote> = self
            .quality
            .intervals()
            .iter()
            .map(|&i| self.root.pitch_class.transpose(i as i32).to_midi(octave))
            .collect();
        let bass = self.bass.unwrap_or(self.root).pitch_class;
        notes.push(midi_note(bass.to_midi(octave) as i32 - 12));
        notes
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.suffix)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl FromStr for Chord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord_name(s)
    }
}

/// Parse a chord name such as `Am`, `F#7`, `Bbmaj7` or `C/E`
pub fn parse_chord_name(text: &str) -> Result<Chord, ChordError> {
    let (head, bass) = match text.split_once('/') {
        Some((head, bass)) => (head, Some(bass)),
        None => (text, None),
    };

    let (root, suffix) =
        split_root(head).ok_or_else(|| ChordError::MalformedChord(text.to_string()))?;
    let root = NoteName::parse(root)?;
    let bass = bass.map(NoteName::parse).transpose()?;

    Ok(Chord::new(root, suffix, bass))
}

/// Split a leading root (letter plus optional `#`/`b`) from the suffix
pub(crate) fn split_root(text: &str) -> Option<(&str, &str)> {
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let root_len = match chars.next() {
        Some((idx, '#')) | Some((idx, 'b')) => idx + 1,
        _ => 1,
    };
    Some(text.split_at(root_len))
}

/// Pitch classes of a chord: the chord tones followed by the bass.
///
/// The last entry is always the bass note (the slash bass, or the root
/// doubled), which sounds one octave below the rest.
pub fn notes_of(chord: &Chord) -> Vec<PitchClass> {
    let mut notes: Vec<PitchClass> = chord
        .quality
        .intervals()
        .iter()
        .map(|&i| chord.root.pitch_class.transpose(i as i32))
        .collect();
    notes.push(chord.bass.unwrap_or(chord.root).pitch_class);
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcs(chord: &str) -> Vec<u8> {
        notes_of(&parse_chord_name(chord).unwrap())
            .into_iter()
            .map(|pc| pc.value())
            .collect()
    }

    #[test]
    fn test_quality_aliases() {
        assert_eq!(chord_quality_of("m"), ChordQuality::Minor);
        assert_eq!(chord_quality_of("MIN"), ChordQuality::Minor);
        assert_eq!(chord_quality_of("minor"), ChordQuality::Minor);
        assert_eq!(chord_quality_of("Maj7"), ChordQuality::MajorSeventh);
        assert_eq!(chord_quality_of("min7"), ChordQuality::MinorSeventh);
        assert_eq!(chord_quality_of("sus"), ChordQuality::Sus4);
        assert_eq!(chord_quality_of("diminished"), ChordQuality::Diminished);
        assert_eq!(chord_quality_of(""), ChordQuality::Major);
    }

    #[test]
    fn test_unknown_quality_is_major() {
        assert_eq!(chord_quality_of("xyz"), ChordQuality::Major);
        assert_eq!(chord_quality_of("add9"), ChordQuality::Major);
        assert_eq!(pcs("Cxyz"), pcs("C"));
    }

    #[test]
    fn test_parse_simple() {
        let chord = parse_chord_name("Am").unwrap();
        assert_eq!(chord.root().as_str(), "A");
        assert_eq!(chord.suffix(), "m");
        assert_eq!(chord.quality(), ChordQuality::Minor);
        assert!(chord.bass().is_none());
    }

    #[test]
    fn test_parse_accidentals() {
        let chord = parse_chord_name("Bbmaj7").unwrap();
        assert_eq!(chord.root().as_str(), "Bb");
        assert_eq!(chord.quality(), ChordQuality::MajorSeventh);

        let chord = parse_chord_name("F#m7").unwrap();
        assert_eq!(chord.root().pitch_class.value(), 6);
        assert_eq!(chord.quality(), ChordQuality::MinorSeventh);
    }

    #[test]
    fn test_parse_slash_chord() {
        let chord = parse_chord_name("C/E").unwrap();
        assert_eq!(chord.bass().unwrap().as_str(), "E");
        assert_eq!(chord.to_string(), "C/E");
        assert_eq!(pcs("C/E"), vec![0, 4, 7, 4]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_chord_name("7"),
            Err(ChordError::MalformedChord("7".to_string()))
        );
        assert_eq!(
            parse_chord_name(""),
            Err(ChordError::MalformedChord(String::new()))
        );
        assert_eq!(
            parse_chord_name("Hm"),
            Err(ChordError::UnknownNote("H".to_string()))
        );
        assert_eq!(
            parse_chord_name("C/X"),
            Err(ChordError::UnknownNote("X".to_string()))
        );
    }

    #[test]
    fn test_notes_of() {
        assert_eq!(pcs("C"), vec![0, 4, 7, 0]);
        assert_eq!(pcs("G7"), vec![7, 11, 2, 5, 7]);
        assert_eq!(pcs("Bdim"), vec![11, 2, 5, 11]);
        assert_eq!(pcs("Dsus2"), vec![2, 4, 9, 2]);
        assert_eq!(pcs("Eaug"), vec![4, 8, 0, 4]);
    }

    #[test]
    fn test_midi_notes() {
        let c = parse_chord_name("C").unwrap();
        assert_eq!(c.midi_notes(4), vec![60, 64, 67, 48]);

        let g = parse_chord_name("G/B").unwrap();
        assert_eq!(g.midi_notes(4), vec![67, 71, 62, 59]);
    }

    #[test]
    fn test_harmonic_equality() {
        assert_eq!(
            parse_chord_name("A#m").unwrap(),
            parse_chord_name("Bbm").unwrap()
        );
        assert_ne!(
            parse_chord_name("Am").unwrap(),
            parse_chord_name("A").unwrap()
        );
    }

    #[test]
    fn test_from_str_and_display() {
        let chord: Chord = "Ebsus4/Bb".parse().unwrap();
        assert_eq!(chord.to_string(), "Ebsus4/Bb");
    }
}
