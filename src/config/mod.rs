// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the playback engine.
//!
//! Everything here has a default, so an empty file (or no file at all)
//! gives the stock behaviour: piano voice, 60 BPM, chords around middle C
//! and a woodblock count-in on the percussion channel.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial tempo in BPM (clamped to 20-240 when applied)
    pub tempo: f64,
    /// Octave of the chord root (4 = middle C octave)
    pub octave: i32,
    /// Velocity for struck chords (0-127)
    pub chord_velocity: u8,
    /// MIDI channel for chords (0-15)
    pub channel: u8,
    /// Program number of the chord voice
    pub voice_program: u8,
    /// Silence between two struck chords, as a fraction of a beat
    pub inter_chord_gap: f64,
    /// Wait after switching voices, in milliseconds
    pub settle_delay_ms: u64,
    /// Metronome count-in
    pub count_in: CountInConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: 60.0,
            octave: 4,
            chord_velocity: 80,
            channel: 0,
            voice_program: 0,
            inter_chord_gap: 0.01,
            settle_delay_ms: 20,
            count_in: CountInConfig::default(),
        }
    }
}

/// Count-in click settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CountInConfig {
    /// Percussion program used for the clicks (115 = woodblock)
    pub percussion_program: u8,
    /// Channel for the clicks
    pub channel: u8,
    /// Note of the first (accented) click
    pub accent_note: u8,
    /// Velocity of the first click
    pub accent_velocity: u8,
    /// Note of the other clicks
    pub click_note: u8,
    /// Velocity of the other clicks
    pub click_velocity: u8,
    /// How long each click sounds, in milliseconds
    pub click_length_ms: u64,
    /// Trailing silence after the last click, as a fraction of a beat.
    /// Shorter than a full beat to hide the voice switch back.
    pub last_tick_factor: f64,
}

impl Default for CountInConfig {
    fn default() -> Self {
        Self {
            percussion_program: 115,
            channel: 9,
            accent_note: 81,
            accent_velocity: 100,
            click_note: 76,
            click_velocity: 80,
            click_length_ms: 50,
            last_tick_factor: 0.8,
        }
    }
}

impl CountInConfig {
    /// Last tick factor limited to 0.0-1.0
    pub fn last_tick_factor(&self) -> f64 {
        unit_fraction(self.last_tick_factor, 1.0)
    }
}

impl EngineConfig {
    /// Load a configuration file, TOML for `.toml` files and YAML otherwise
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let is_toml = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
        .with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse a configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse a configuration from TOML
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Inter-chord gap limited to 0.0-0.5 of a beat
    pub fn gap_fraction(&self) -> f64 {
        unit_fraction(self.inter_chord_gap, 0.5)
    }
}

/// Clamp a fraction to 0..=max, mapping NaN to zero
fn unit_fraction(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.tempo, 60.0);
        assert_eq!(config.octave, 4);
        assert_eq!(config.chord_velocity, 80);
        assert_eq!(config.count_in.percussion_program, 115);
        assert_eq!(config.count_in.channel, 9);
        assert_eq!(config.count_in.last_tick_factor, 0.8);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
tempo: 96
voice_program: 24
count_in:
  last_tick_factor: 0.1
"#;

        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tempo, 96.0);
        assert_eq!(config.voice_program, 24);
        assert_eq!(config.count_in.last_tick_factor, 0.1);
        // Untouched fields keep their defaults
        assert_eq!(config.count_in.accent_note, 81);
        assert_eq!(config.settle_delay_ms, 20);
    }

    #[test]
    fn test_parse_toml() {
        let source = r#"
tempo = 120.0
octave = 3

[count_in]
channel = 10
"#;

        let config = EngineConfig::from_toml(source).unwrap();
        assert_eq!(config.tempo, 120.0);
        assert_eq!(config.octave, 3);
        assert_eq!(config.count_in.channel, 10);
        assert_eq!(config.count_in.click_note, 76);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(EngineConfig::from_yaml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(EngineConfig::from_yaml("tempo: [fast]").is_err());
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");

        let mut config = EngineConfig::default();
        config.tempo = 132.0;
        config.count_in.accent_velocity = 110;
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        fs::write(&path, "chord_velocity = 64\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.chord_velocity, 64);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/nonexistent/engine.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_fractions_are_clamped() {
        let mut config = EngineConfig::default();
        config.inter_chord_gap = f64::NAN;
        assert_eq!(config.gap_fraction(), 0.0);
        config.inter_chord_gap = 2.0;
        assert_eq!(config.gap_fraction(), 0.5);

        config.count_in.last_tick_factor = -1.0;
        assert_eq!(config.count_in.last_tick_factor(), 0.0);
    }
}
