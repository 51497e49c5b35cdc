// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Token types for chord chart notation.

use std::fmt;

/// One unit of chart notation, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A chord to strike, as written
    Chord(String),
    /// `.` - strike the previous chord again
    Repeat,
    /// `-` - keep the previous chord sounding for another beat
    Hold,
    /// `()` - one beat of silence
    Rest,
    /// One of `total` chords sharing a single beat, from `(C G)`
    Group {
        /// Position within the group (0-based)
        position: usize,
        /// Number of chords in the group
        total: usize,
        /// Chord text
        chord: String,
    },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Chord(chord) => write!(f, "{}", chord),
            Token::Repeat => write!(f, "."),
            Token::Hold => write!(f, "-"),
            Token::Rest => write!(f, "()"),
            Token::Group {
                position,
                total,
                chord,
            } => write!(f, "({}/{} {})", position + 1, total, chord),
        }
    }
}

/// A playable step after repeats have been resolved.
///
/// `Hold` stays symbolic: only the player knows what is still sounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Strike this chord for one beat
    Strike(String),
    /// Let whatever is sounding ring for one beat
    Hold,
    /// Silence for one beat
    Rest,
    /// Strike this chord for `1 / total` of a beat
    Group {
        position: usize,
        total: usize,
        chord: String,
    },
}

impl Step {
    /// Chord text struck by this step, if any
    pub fn chord(&self) -> Option<&str> {
        match self {
            Step::Strike(chord) | Step::Group { chord, .. } => Some(chord),
            Step::Hold | Step::Rest => None,
        }
    }

    /// Whether `next` is the following member of the same group
    pub fn continues_group(&self, next: &Step) -> bool {
        match (self, next) {
            (
                Step::Group {
                    position, total, ..
                },
                Step::Group {
                    position: next_position,
                    total: next_total,
                    ..
                },
            ) => *next_position == position + 1 && next_total == total,
            _ => false,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Strike(chord) => write!(f, "{}", chord),
            Step::Hold => write!(f, "HOLD"),
            Step::Rest => write!(f, "REST"),
            Step::Group {
                position,
                total,
                chord,
            } => write!(f, "{}[{}/{}]", chord, position + 1, total),
        }
    }
}
