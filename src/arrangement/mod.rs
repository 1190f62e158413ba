// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rendering an optimized harmony into a multi-track score.
//!
//! The arranger is a pure function from a [`Harmony`] to a [`Score`]: tick
//! positions, MIDI note numbers, velocities, and General MIDI program
//! assignments, with no device or file I/O. Three tracks are produced:
//! melody, block chords one octave below, and a bass line alternating
//! root and fifth on the beats.

use tracing::debug;

use crate::music::scale::{MidiNote, Scale};
use crate::search::Harmony;

/// Ticks per quarter note in rendered scores
pub const PPQN: u32 = 480;

/// General MIDI program numbers used by the arrangement styles
pub mod programs {
    pub const PIANO: u8 = 0;
    pub const ACOUSTIC_GUITAR: u8 = 24;
    pub const ELECTRIC_GUITAR: u8 = 27;
    pub const ACOUSTIC_BASS: u8 = 32;
    pub const ELECTRIC_BASS: u8 = 33;
    pub const VIOLIN: u8 = 40;
    pub const CELLO: u8 = 42;
    pub const TRUMPET: u8 = 56;
    pub const SAXOPHONE: u8 = 65;
    pub const FLUTE: u8 = 73;
}

/// Velocity for notes on the first beat of a measure
const VELOCITY_DOWNBEAT: u8 = 90;
/// Velocity for notes on other beat boundaries
const VELOCITY_BEAT: u8 = 75;
/// Velocity for notes between beats
const VELOCITY_OFFBEAT: u8 = 60;
/// Velocity for sustained block chords
const VELOCITY_CHORD: u8 = 70;

/// Octave anchors for the three tracks (MIDI convention, middle C = C4)
const MELODY_OCTAVE: i8 = 4;
const CHORD_OCTAVE: i8 = 3;
const BASS_OCTAVE: i8 = 2;

/// Instrumentation preset: which GM programs play each track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrangementStyle {
    Classical,
    Jazz,
    Rock,
    Pop,
}

impl ArrangementStyle {
    /// Parse a style name from configuration
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classical" => Some(ArrangementStyle::Classical),
            "jazz" => Some(ArrangementStyle::Jazz),
            "rock" => Some(ArrangementStyle::Rock),
            "pop" => Some(ArrangementStyle::Pop),
            _ => None,
        }
    }

    /// GM programs for the melody, chord, and bass tracks
    pub fn instrumentation(self) -> [u8; 3] {
        use programs::*;
        match self {
            ArrangementStyle::Classical => [VIOLIN, PIANO, CELLO],
            ArrangementStyle::Jazz => [SAXOPHONE, PIANO, ACOUSTIC_BASS],
            ArrangementStyle::Rock => [ELECTRIC_GUITAR, ELECTRIC_GUITAR, ELECTRIC_BASS],
            ArrangementStyle::Pop => [PIANO, ACOUSTIC_GUITAR, ELECTRIC_BASS],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArrangementStyle::Classical => "classical",
            ArrangementStyle::Jazz => "jazz",
            ArrangementStyle::Rock => "rock",
            ArrangementStyle::Pop => "pop",
        }
    }
}

/// One note in a rendered track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    pub note: MidiNote,
    pub velocity: u8,
    pub start_tick: u32,
    pub duration_ticks: u32,
}

/// A named instrument track
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub program: u8,
    pub channel: u8,
    pub events: Vec<NoteEvent>,
}

/// A complete rendered composition
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub tempo: u32,
    pub beats_per_measure: usize,
    pub ppqn: u32,
    pub tracks: Vec<Track>,
}

impl Score {
    /// Total note events across all tracks
    pub fn event_count(&self) -> usize {
        self.tracks.iter().map(|t| t.events.len()).sum()
    }

    /// Length of the score in ticks (end of the latest event)
    pub fn length_ticks(&self) -> u32 {
        self.tracks
            .iter()
            .flat_map(|t| t.events.iter())
            .map(|e| e.start_tick + e.duration_ticks)
            .max()
            .unwrap_or(0)
    }
}

/// Renders harmonies into scores for one scale, style, and meter
#[derive(Debug, Clone)]
pub struct Arranger {
    scale: Scale,
    style: ArrangementStyle,
    tempo: u32,
    beats_per_measure: usize,
    notes_per_beat: usize,
}

impl Arranger {
    pub fn new(
        scale: Scale,
        style: ArrangementStyle,
        tempo: u32,
        beats_per_measure: usize,
        notes_per_beat: usize,
    ) -> Self {
        Self {
            scale,
            style,
            tempo,
            beats_per_measure,
            notes_per_beat,
        }
    }

    /// Render a harmony into a three-track score
    pub fn arrange(&self, harmony: &Harmony) -> Score {
        let [melody_program, chord_program, bass_program] = self.style.instrumentation();

        let tracks = vec![
            Track {
                name: "melody".to_string(),
                program: melody_program,
                channel: 0,
                events: self.melody_events(harmony),
            },
            Track {
                name: "chords".to_string(),
                program: chord_program,
                channel: 1,
                events: self.chord_events(harmony),
            },
            Track {
                name: "bass".to_string(),
                program: bass_program,
                channel: 2,
                events: self.bass_events(harmony),
            },
        ];

        let score = Score {
            tempo: self.tempo,
            beats_per_measure: self.beats_per_measure,
            ppqn: PPQN,
            tracks,
        };
        debug!(
            style = self.style.name(),
            events = score.event_count(),
            "arranged harmony"
        );
        score
    }

    fn ticks_per_position(&self) -> u32 {
        PPQN / self.notes_per_beat as u32
    }

    fn melody_events(&self, harmony: &Harmony) -> Vec<NoteEvent> {
        let ticks = self.ticks_per_position();
        let positions_per_measure = self.beats_per_measure * self.notes_per_beat;

        let mut events = Vec::new();
        for (i, &pitch) in harmony.melody.iter().enumerate() {
            let Some(note) = self.scale.midi_note(pitch, MELODY_OCTAVE) else {
                continue; // rest
            };
            events.push(NoteEvent {
                note,
                velocity: self.melody_velocity(i, positions_per_measure),
                start_tick: i as u32 * ticks,
                duration_ticks: ticks,
            });
        }
        events
    }

    /// Metric accent: downbeats loudest, beats next, subdivisions softest
    fn melody_velocity(&self, position: usize, positions_per_measure: usize) -> u8 {
        if position % positions_per_measure == 0 {
            VELOCITY_DOWNBEAT
        } else if position % self.notes_per_beat == 0 {
            VELOCITY_BEAT
        } else {
            VELOCITY_OFFBEAT
        }
    }

    fn chord_events(&self, harmony: &Harmony) -> Vec<NoteEvent> {
        let measure_ticks = self.beats_per_measure as u32 * PPQN;

        let mut events = Vec::new();
        for (measure, &degree) in harmony.chords.iter().enumerate() {
            let start_tick = measure as u32 * measure_ticks;
            for tone in self.scale.triad_degrees(degree) {
                let Some(note) = self.scale.midi_note(tone as i32, CHORD_OCTAVE) else {
                    continue;
                };
                events.push(NoteEvent {
                    note,
                    velocity: VELOCITY_CHORD,
                    start_tick,
                    duration_ticks: measure_ticks,
                });
            }
        }
        events
    }

    /// One bass note per beat, alternating chord root and fifth
    fn bass_events(&self, harmony: &Harmony) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        for (measure, &degree) in harmony.chords.iter().enumerate() {
            let triad = self.scale.triad_degrees(degree);
            for beat in 0..self.beats_per_measure {
                let tone = if beat % 2 == 0 { triad[0] } else { triad[2] };
                let Some(note) = self.scale.midi_note(tone as i32, BASS_OCTAVE) else {
                    continue;
                };
                let velocity = if beat == 0 {
                    VELOCITY_DOWNBEAT
                } else {
                    VELOCITY_BEAT
                };
                events.push(NoteEvent {
                    note,
                    velocity,
                    start_tick: (measure * self.beats_per_measure + beat) as u32 * PPQN,
                    duration_ticks: PPQN,
                });
            }
        }
        events
    }
}
