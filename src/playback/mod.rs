// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Real-time playback of chord progressions.
//!
//! This module provides:
//! - Tempo clamping and beat arithmetic
//! - Cancellable playback sessions
//! - The [`Player`] that schedules strikes, holds, groups and the count-in

pub mod player;
mod session;
pub mod timing;

pub use player::{PlaybackEvent, PlaybackOutcome, Player};
pub use timing::{
    beat_duration, clamp_tempo, Tempo, COUNT_IN_BEATS, DEFAULT_TEMPO, MAX_TEMPO, MIN_TEMPO,
};
