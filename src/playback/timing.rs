// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tempo and beat arithmetic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Slowest accepted tempo in BPM
pub const MIN_TEMPO: f64 = 20.0;

/// Fastest accepted tempo in BPM
pub const MAX_TEMPO: f64 = 240.0;

/// Tempo used when nothing else is given
pub const DEFAULT_TEMPO: f64 = 60.0;

/// Clicks in a count-in
pub const COUNT_IN_BEATS: u32 = 4;

/// Clamp a tempo into the accepted range. NaN falls back to the default.
pub fn clamp_tempo(bpm: f64) -> f64 {
    if bpm.is_nan() {
        DEFAULT_TEMPO
    } else {
        bpm.clamp(MIN_TEMPO, MAX_TEMPO)
    }
}

/// Length of one scheduling step: `60 / tempo * multiplier` seconds.
///
/// The tempo is clamped first. A multiplier that is not a positive finite
/// number counts as 1. Lengths too large for a `Duration` saturate.
pub fn beat_duration(bpm: f64, multiplier: f64) -> Duration {
    let multiplier = if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        1.0
    };
    Duration::try_from_secs_f64(60.0 / clamp_tempo(bpm) * multiplier).unwrap_or(Duration::MAX)
}

/// Tempo shared between the control side and a running player
#[derive(Debug)]
pub struct Tempo(AtomicU64);

impl Tempo {
    pub fn new(bpm: f64) -> Self {
        Tempo(AtomicU64::new(clamp_tempo(bpm).to_bits()))
    }

    /// Current tempo in BPM
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Store a new tempo, clamped, and return what was stored
    pub fn set(&self, bpm: f64) -> f64 {
        let bpm = clamp_tempo(bpm);
        self.0.store(bpm.to_bits(), Ordering::Relaxed);
        bpm
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo::new(DEFAULT_TEMPO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_clamping() {
        assert_eq!(clamp_tempo(5.0), 20.0);
        assert_eq!(clamp_tempo(500.0), 240.0);
        assert_eq!(clamp_tempo(96.0), 96.0);
        assert_eq!(clamp_tempo(f64::NAN), DEFAULT_TEMPO);
        assert_eq!(clamp_tempo(f64::INFINITY), MAX_TEMPO);
    }

    #[test]
    fn test_beat_duration() {
        assert_eq!(beat_duration(60.0, 1.0), Duration::from_secs(1));
        assert_eq!(beat_duration(120.0, 1.0), Duration::from_millis(500));
        assert_eq!(beat_duration(60.0, 0.5), Duration::from_millis(500));
        assert_eq!(beat_duration(60.0, 2.0), Duration::from_secs(2));
        // Clamped tempo
        assert_eq!(beat_duration(10.0, 1.0), Duration::from_secs(3));
    }

    #[test]
    fn test_bad_multiplier_is_one_beat() {
        assert_eq!(beat_duration(60.0, 0.0), Duration::from_secs(1));
        assert_eq!(beat_duration(60.0, -2.0), Duration::from_secs(1));
        assert_eq!(beat_duration(60.0, f64::NAN), Duration::from_secs(1));
    }

    #[test]
    fn test_huge_multiplier_saturates() {
        assert_eq!(beat_duration(60.0, 1e20), Duration::MAX);
        assert_eq!(beat_duration(20.0, f64::MAX), Duration::MAX);
        assert_eq!(beat_duration(60.0, 1e6), Duration::from_secs(1_000_000));
    }

    #[test]
    fn test_tempo_cell() {
        let tempo = Tempo::default();
        assert_eq!(tempo.get(), 60.0);
        assert_eq!(tempo.set(5.0), 20.0);
        assert_eq!(tempo.get(), 20.0);
        assert_eq!(tempo.set(500.0), 240.0);
        assert_eq!(tempo.get(), 240.0);
    }
}
