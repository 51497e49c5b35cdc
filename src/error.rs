// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for chord parsing.
//!
//! Only chord names can fail. An unknown quality suffix is not an error
//! (it reads as a major triad), and neither is an empty progression.

use thiserror::Error;

/// Errors raised while reading a chord or note name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    /// The note name matches none of the twelve pitch-class names
    #[error("Unknown note name: {0:?}")]
    UnknownNote(String),

    /// No leading note letter could be found
    #[error("Malformed chord: {0:?}")]
    MalformedChord(String),
}
