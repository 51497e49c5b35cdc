// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord transposition.
//!
//! Two entry points: [`transpose_chord`] works on a parsed [`Chord`], and
//! [`transpose_progression`] rewrites a whole chart in place at the text
//! level so spacing, bar lines, dots and dashes survive untouched.
//!
//! Transposed notes are always respelled: pitch classes 1, 3, 6, 8 and 10
//! come out flat (Db, Eb, Gb, Ab, Bb), everything else natural or sharp.

use std::ops::Range;

use crate::music::{Chord, NoteName};

/// Transpose a single note name by semitones, using the preferred spelling
pub fn transpose_note(note: NoteName, semitones: i32) -> NoteName {
    NoteName::preferred(note.pitch_class.transpose(semitones))
}

/// Transpose a chord by semitones.
///
/// The quality suffix is kept verbatim and a slash bass moves by the same
/// interval. Zero semitones returns the chord as written.
pub fn transpose_chord(chord: &Chord, semitones: i32) -> Chord {
    if semitones == 0 {
        return chord.clone();
    }
    Chord::new(
        transpose_note(chord.root(), semitones),
        chord.suffix(),
        chord.bass().map(|bass| transpose_note(bass, semitones)),
    )
}

/// Transpose every chord-shaped word in a chart.
///
/// Anything that is not a chord (whitespace, bars, dots, dashes, parens)
/// passes through unchanged. Words whose root is not a known note name
/// are left as they are.
pub fn transpose_progression(text: &str, semitones: i32) -> String {
    if semitones == 0 {
        return text.to_string();
    }

    let matches = find_chords(text);
    let mut result = text.to_string();

    // Back to front so earlier offsets stay valid
    for found in matches.iter().rev() {
        if let Some(replacement) = found.transposed(text, semitones) {
            result.replace_range(found.span.clone(), &replacement);
        }
    }

    result
}

/// Location of a chord-shaped word in a chart
#[derive(Debug, Clone, PartialEq)]
struct ChordMatch {
    /// Whole word including suffix and bass
    span: Range<usize>,
    /// Root note name
    root: Range<usize>,
    /// Slash bass note name
    bass: Option<Range<usize>>,
}

impl ChordMatch {
    fn transposed(&self, text: &str, semitones: i32) -> Option<String> {
        let root = NoteName::parse(&text[self.root.clone()]).ok()?;
        let mut out = transpose_note(root, semitones).to_string();

        match &self.bass {
            Some(bass_range) => {
                let bass = NoteName::parse(&text[bass_range.clone()]).ok()?;
                out.push_str(&text[self.root.end..bass_range.start]);
                out.push_str(transpose_note(bass, semitones).as_str());
                out.push_str(&text[bass_range.end..self.span.end]);
            }
            None => out.push_str(&text[self.root.end..self.span.end]),
        }

        Some(out)
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '-' | '(' | ')' | '|')
}

/// Match a note name (`A`-`G` plus optional `#`/`b`) at a byte offset
fn note_at(text: &str, start: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(start), Some(b'A'..=b'G')) {
        return None;
    }
    let end = match bytes.get(start + 1) {
        Some(b'#') | Some(b'b') => start + 2,
        _ => start + 1,
    };
    Some(start..end)
}

/// Skip forward while characters satisfy `keep`
fn scan_while(text: &str, start: usize, keep: impl Fn(char) -> bool) -> usize {
    text[start..]
        .char_indices()
        .find(|&(_, c)| !keep(c))
        .map(|(idx, _)| start + idx)
        .unwrap_or(text.len())
}

/// Longest chord-shaped word starting exactly at `start`
fn chord_at(text: &str, start: usize) -> Option<ChordMatch> {
    let root = note_at(text, start)?;
    let suffix_end = scan_while(text, root.end, |c| !is_separator(c) && c != '/');

    if text[suffix_end..].starts_with('/') {
        if let Some(bass) = note_at(text, suffix_end + 1) {
            let end = scan_while(text, bass.end, |c| !is_separator(c));
            return Some(ChordMatch {
                span: start..end,
                root,
                bass: Some(bass),
            });
        }
    }

    Some(ChordMatch {
        span: start..suffix_end,
        root,
        bass: None,
    })
}

/// Find all non-overlapping chord words, left to right
fn find_chords(text: &str) -> Vec<ChordMatch> {
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        match chord_at(text, pos) {
            Some(found) => {
                pos = found.span.end;
                matches.push(found);
            }
            None => {
                let width = text[pos..].chars().next().map_or(1, char::len_utf8);
                pos += width;
            }
        }
    }

    matches
}
