// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for HARMONYGEN.
//!
//! A composition run is fully described by one [`CompositionConfig`]:
//! musical settings (key, mode, meter) and search parameters (memory size,
//! consideration/adjustment rates, bandwidth, iteration budget). Configs
//! are validated once, up front, and immutable for the life of a run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::music::scale::{Mode, Note, Scale};

/// Errors raised while validating a configuration
///
/// All of these are fatal: an invalid configuration is rejected before any
/// optimization begins and is never retried.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Key name did not parse as a pitch class
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
    /// Mode name did not parse (supported: major, minor)
    #[error("unknown mode: {0:?}")]
    UnknownMode(String),
    /// A count parameter that must be positive was zero
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: i64 },
    /// Harmony memory needs at least two slots for replace-worst to mean anything
    #[error("harmony memory size must be at least 2 (got {0})")]
    MemoryTooSmall(usize),
    /// A rate parameter left the unit interval
    #[error("{name} must be within [0, 1] (got {value})")]
    RateOutOfRange { name: &'static str, value: f64 },
    /// Pitch-adjustment bandwidth cannot be negative
    #[error("bandwidth must be non-negative (got {0})")]
    NegativeBandwidth(f64),
}

/// Configuration for one composition run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionConfig {
    /// Musical key as a pitch-class name (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Scale mode ("major" or "minor")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Number of measures to compose
    #[serde(default = "default_measures")]
    pub measures: usize,
    /// Beats per measure (time signature numerator)
    #[serde(default = "default_beats_per_measure")]
    pub beats_per_measure: usize,
    /// Melody subdivisions per beat
    #[serde(default = "default_notes_per_beat")]
    pub notes_per_beat: usize,
    /// Tempo in BPM; forwarded to the arrangement, no effect on the search
    #[serde(default = "default_tempo")]
    pub tempo: u32,
    /// Harmony memory size (HMS)
    #[serde(default = "default_hms")]
    pub hms: usize,
    /// Harmony memory considering rate (HMCR), probability in [0, 1]
    #[serde(default = "default_hmcr")]
    pub hmcr: f64,
    /// Pitch adjustment rate (PAR), probability in [0, 1]
    #[serde(default = "default_par")]
    pub par: f64,
    /// Pitch-adjustment bandwidth (BW), non-negative
    #[serde(default = "default_bw")]
    pub bw: f64,
    /// Improvisation budget; the loop always runs exactly this many iterations
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Arrangement style preset for the rendered score
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_key() -> String {
    "C".to_string()
}
fn default_mode() -> String {
    "major".to_string()
}
fn default_measures() -> usize {
    4
}
fn default_beats_per_measure() -> usize {
    4
}
fn default_notes_per_beat() -> usize {
    2
}
fn default_tempo() -> u32 {
    120
}
fn default_hms() -> usize {
    20
}
fn default_hmcr() -> f64 {
    0.9
}
fn default_par() -> f64 {
    0.3
}
fn default_bw() -> f64 {
    0.2
}
fn default_max_iter() -> usize {
    100
}
fn default_style() -> String {
    "classical".to_string()
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            mode: default_mode(),
            measures: default_measures(),
            beats_per_measure: default_beats_per_measure(),
            notes_per_beat: default_notes_per_beat(),
            tempo: default_tempo(),
            hms: default_hms(),
            hmcr: default_hmcr(),
            par: default_par(),
            bw: default_bw(),
            max_iter: default_max_iter(),
            style: default_style(),
        }
    }
}

impl CompositionConfig {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Validate all parameters and resolve the key/mode into a scale
    ///
    /// Called at optimizer construction; every later stage may assume the
    /// values are in range.
    pub fn validate(&self) -> Result<Scale, ConfigError> {
        let root =
            Note::parse(&self.key).ok_or_else(|| ConfigError::UnknownKey(self.key.clone()))?;
        let mode =
            Mode::parse(&self.mode).ok_or_else(|| ConfigError::UnknownMode(self.mode.clone()))?;

        if self.measures == 0 {
            return Err(ConfigError::NonPositive {
                name: "measures",
                value: 0,
            });
        }
        if self.beats_per_measure == 0 {
            return Err(ConfigError::NonPositive {
                name: "beats_per_measure",
                value: 0,
            });
        }
        if self.notes_per_beat == 0 {
            return Err(ConfigError::NonPositive {
                name: "notes_per_beat",
                value: 0,
            });
        }
        if self.tempo == 0 {
            return Err(ConfigError::NonPositive {
                name: "tempo",
                value: 0,
            });
        }
        if self.hms < 2 {
            return Err(ConfigError::MemoryTooSmall(self.hms));
        }
        if !(0.0..=1.0).contains(&self.hmcr) {
            return Err(ConfigError::RateOutOfRange {
                name: "hmcr",
                value: self.hmcr,
            });
        }
        if !(0.0..=1.0).contains(&self.par) {
            return Err(ConfigError::RateOutOfRange {
                name: "par",
                value: self.par,
            });
        }
        if self.bw < 0.0 || !self.bw.is_finite() {
            return Err(ConfigError::NegativeBandwidth(self.bw));
        }

        Ok(Scale::new(root, mode))
    }

    /// Total number of melody positions in one harmony
    pub fn melody_len(&self) -> usize {
        self.measures * self.beats_per_measure * self.notes_per_beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CompositionConfig::default();
        let scale = config.validate().expect("defaults must validate");
        assert_eq!(scale.to_string(), "C major");
        assert_eq!(config.melody_len(), 32);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let config = CompositionConfig {
            key: "H".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::UnknownKey("H".to_string())
        );
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let config = CompositionConfig {
            mode: "phrygian".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::UnknownMode(_)
        ));
    }

    #[test]
    fn test_memory_size_floor() {
        let config = CompositionConfig {
            hms: 1,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::MemoryTooSmall(1));
    }

    #[test]
    fn test_rates_must_be_probabilities() {
        let config = CompositionConfig {
            hmcr: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::RateOutOfRange { name: "hmcr", .. }
        ));

        let config = CompositionConfig {
            par: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::RateOutOfRange { name: "par", .. }
        ));
    }

    #[test]
    fn test_negative_bandwidth_rejected() {
        let config = CompositionConfig {
            bw: -0.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::NegativeBandwidth(-0.5)
        );
    }

    #[test]
    fn test_zero_counts_rejected() {
        for (name, config) in [
            (
                "measures",
                CompositionConfig {
                    measures: 0,
                    ..Default::default()
                },
            ),
            (
                "beats_per_measure",
                CompositionConfig {
                    beats_per_measure: 0,
                    ..Default::default()
                },
            ),
            (
                "notes_per_beat",
                CompositionConfig {
                    notes_per_beat: 0,
                    ..Default::default()
                },
            ),
        ] {
            let err = config.validate().unwrap_err();
            assert_eq!(err, ConfigError::NonPositive { name, value: 0 });
        }
    }

    #[test]
    fn test_max_iter_zero_is_allowed() {
        let config = CompositionConfig {
            max_iter: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = CompositionConfig {
            key: "F#".to_string(),
            mode: "minor".to_string(),
            measures: 8,
            hmcr: 0.85,
            ..Default::default()
        };

        let yaml = config.to_yaml().unwrap();
        let parsed = CompositionConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_yaml_defaults_fill_missing_fields() {
        let config = CompositionConfig::from_yaml("key: G\nmeasures: 2\n").unwrap();
        assert_eq!(config.key, "G");
        assert_eq!(config.measures, 2);
        assert_eq!(config.mode, "major");
        assert_eq!(config.hms, 20);
    }
}
