// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Single-pass scanner for chord chart text.
//!
//! Notation:
//! - `C G Am F` - one chord per beat, separated by anything that is not a chord character
//! - `.` - strike the previous chord again
//! - `-` - hold the previous chord for another beat
//! - `(C G)` - several chords sharing one beat; `()` is a one-beat rest
//!
//! Bar lines and other symbols only separate chords.

use super::token::{Step, Token};

/// Scanner state
#[derive(Debug, Default)]
struct Scanner {
    tokens: Vec<Token>,
    /// Chord text being collected
    chord: String,
    /// Raw group text, including the opening paren, while inside `( ... )`
    group: Option<String>,
}

impl Scanner {
    fn feed(&mut self, c: char) {
        if let Some(buffer) = self.group.as_mut() {
            if c == ')' {
                self.close_group();
            } else {
                buffer.push(c);
            }
            return;
        }

        match c {
            '(' => {
                self.flush();
                self.group = Some(String::from("("));
            }
            '.' => {
                self.flush();
                self.tokens.push(Token::Repeat);
            }
            '-' => {
                self.flush();
                self.tokens.push(Token::Hold);
            }
            c if is_chord_char(c) => self.chord.push(c),
            _ => self.flush(),
        }
    }

    /// Emit the in-flight chord, if any
    fn flush(&mut self) {
        if !self.chord.is_empty() {
            self.tokens.push(Token::Chord(std::mem::take(&mut self.chord)));
        }
    }

    fn close_group(&mut self) {
        let Some(buffer) = self.group.take() else {
            return;
        };
        let inner = buffer.strip_prefix('(').unwrap_or(&buffer);
        let chords: Vec<&str> = inner.split_whitespace().collect();

        if chords.is_empty() {
            self.tokens.push(Token::Rest);
            return;
        }

        let total = chords.len();
        for (position, chord) in chords.into_iter().enumerate() {
            self.tokens.push(Token::Group {
                position,
                total,
                chord: chord.to_string(),
            });
        }
    }

    fn finish(mut self) -> Vec<Token> {
        // An unclosed group ends with the input
        if self.group.is_some() {
            self.close_group();
        }
        self.flush();
        self.tokens
    }
}

fn is_chord_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '#' || c == '/'
}

/// Split chart text into tokens, in source order
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut scanner = Scanner::default();
    for c in text.chars() {
        scanner.feed(c);
    }
    scanner.finish()
}

/// Rewrite repeats into concrete strikes.
///
/// A repeat before any chord is dropped. Holds and rests stay symbolic.
/// The last chord of a group counts as the previous chord for what follows.
pub fn resolve_tokens(tokens: &[Token]) -> Vec<Step> {
    let mut steps = Vec::with_capacity(tokens.len());
    let mut last: Option<&str> = None;

    for token in tokens {
        match token {
            Token::Chord(chord) => {
                last = Some(chord.as_str());
                steps.push(Step::Strike(chord.clone()));
            }
            Token::Repeat => {
                if let Some(chord) = last {
                    steps.push(Step::Strike(chord.to_string()));
                }
            }
            Token::Hold => steps.push(Step::Hold),
            Token::Rest => steps.push(Step::Rest),
            Token::Group {
                position,
                total,
                chord,
            } => {
                last = Some(chord.as_str());
                steps.push(Step::Group {
                    position: *position,
                    total: *total,
                    chord: chord.clone(),
                });
            }
        }
    }

    steps
}

/// Tokenize and resolve in one go
pub fn steps_of(text: &str) -> Vec<Step> {
    resolve_tokens(&tokenize(text))
}
