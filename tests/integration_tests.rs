// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for HARMONYGEN
//!
//! These tests exercise the public API end to end: configuration loading,
//! the full optimization run, and score rendering.

use std::io::Write;
use std::sync::atomic::AtomicBool;

use harmonygen::{
    ArrangementStyle, Arranger, CompositionConfig, Optimizer, REST,
};

/// Full pipeline: config -> optimize -> arrange, all invariants hold
#[test]
fn test_full_composition_pipeline() {
    let config = CompositionConfig::default();
    let melody_len = config.melody_len();
    let measures = config.measures;
    let tempo = config.tempo;

    let mut optimizer = Optimizer::new(config.clone(), 2024).expect("default config is valid");
    let best = optimizer.optimize().expect("optimization succeeds");

    assert_eq!(best.melody.len(), melody_len);
    assert_eq!(best.chords.len(), measures);
    assert!(best.fitness.is_finite());
    assert!(best.melody.iter().all(|&p| p == REST || (0..=13).contains(&p)));
    assert!(best.chords.iter().all(|&c| (1..=7).contains(&c)));

    let style = ArrangementStyle::parse(&config.style).expect("default style is known");
    let arranger = Arranger::new(
        optimizer.scale().clone(),
        style,
        tempo,
        config.beats_per_measure,
        config.notes_per_beat,
    );
    let score = arranger.arrange(&best);

    assert_eq!(score.tracks.len(), 3);
    assert_eq!(score.tempo, tempo);
    // Chord and bass tracks always cover every measure
    assert_eq!(score.tracks[1].events.len(), measures * 3);
    assert_eq!(
        score.tracks[2].events.len(),
        measures * config.beats_per_measure
    );
    // All notes are valid MIDI data
    for track in &score.tracks {
        for event in &track.events {
            assert!(event.note <= 127);
            assert!(event.velocity <= 127);
            assert!(event.duration_ticks > 0);
        }
    }
}

/// The same seed and configuration reproduce the same composition
#[test]
fn test_seeded_runs_are_reproducible() {
    let config = CompositionConfig {
        max_iter: 150,
        ..Default::default()
    };

    let mut first = Optimizer::new(config.clone(), 77).unwrap();
    let mut second = Optimizer::new(config, 77).unwrap();
    assert_eq!(first.optimize().unwrap(), second.optimize().unwrap());
}

/// A YAML configuration file drives the whole run
#[test]
fn test_yaml_config_drives_composition() {
    let yaml = "
key: A
mode: minor
measures: 2
beats_per_measure: 3
notes_per_beat: 2
hms: 5
max_iter: 30
style: jazz
";
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(yaml.as_bytes()).expect("write config");

    let config = CompositionConfig::load(file.path()).expect("config loads");
    assert_eq!(config.measures, 2);
    assert_eq!(config.style, "jazz");
    // Unspecified fields fall back to defaults
    assert_eq!(config.tempo, 120);

    let mut optimizer = Optimizer::new(config, 5).expect("config validates");
    assert_eq!(optimizer.scale().to_string(), "A minor");

    let best = optimizer.optimize().unwrap();
    assert_eq!(best.melody.len(), 2 * 3 * 2);
    assert_eq!(best.chords.len(), 2);
}

/// Invalid configuration fails at optimizer construction, not mid-run
#[test]
fn test_invalid_config_rejected_up_front() {
    let yaml = "
key: C
mode: major
hms: 1
";
    let config = CompositionConfig::from_yaml(yaml).expect("parses");
    assert!(Optimizer::new(config, 0).is_err());
}

/// More iterations never produce a worse result under the same seed
#[test]
fn test_longer_search_never_worse() {
    let base = CompositionConfig::default();

    let mut fitnesses = Vec::new();
    for max_iter in [0, 50, 500] {
        let config = CompositionConfig {
            max_iter,
            ..base.clone()
        };
        let mut optimizer = Optimizer::new(config, 31).unwrap();
        fitnesses.push(optimizer.optimize().unwrap().fitness);
    }

    assert!(fitnesses[1] >= fitnesses[0]);
    assert!(fitnesses[2] >= fitnesses[1]);
}

/// Cancellation stops the run and still yields a complete harmony
#[test]
fn test_cancelled_run_returns_valid_result() {
    let config = CompositionConfig {
        max_iter: 10_000_000,
        ..Default::default()
    };
    let melody_len = config.melody_len();

    let cancel = AtomicBool::new(true);
    let mut optimizer = Optimizer::new(config, 9).unwrap();
    let best = optimizer.optimize_with_cancel(&cancel).unwrap();

    assert_eq!(best.melody.len(), melody_len);
    assert!(best.fitness.is_finite());
}

/// Every arrangement style renders a playable three-track score
#[test]
fn test_all_styles_render() {
    let config = CompositionConfig {
        max_iter: 20,
        ..Default::default()
    };
    let mut optimizer = Optimizer::new(config.clone(), 64).unwrap();
    let best = optimizer.optimize().unwrap();

    for name in ["classical", "jazz", "rock", "pop"] {
        let style = ArrangementStyle::parse(name).expect("known style");
        let arranger = Arranger::new(
            optimizer.scale().clone(),
            style,
            config.tempo,
            config.beats_per_measure,
            config.notes_per_beat,
        );
        let score = arranger.arrange(&best);
        assert_eq!(score.tracks.len(), 3, "style {name}");
        assert!(score.event_count() > 0, "style {name}");
    }
}
