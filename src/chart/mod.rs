// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord chart notation.
//!
//! This module turns free-form chart text into tokens and playable steps:
//! - Tokenizer with bar symbols, repeat dots, hold dashes and beat groups
//! - Repeat resolution into concrete strikes
//! - Joining the chord lines of several song sections

pub mod token;
pub mod tokenizer;

pub use token::{Step, Token};
pub use tokenizer::{resolve_tokens, steps_of, tokenize};

/// Join the chord lines of several sections into one progression.
///
/// Line breaks become spaces, each section is trimmed and empty sections
/// are skipped. Dots and dashes are kept as written.
pub fn join_sections<I, S>(sections: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sections
        .into_iter()
        .map(|section| section.as_ref().replace(['\r', '\n'], " ").trim().to_string())
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
