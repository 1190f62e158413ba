// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and key system for the composition engine.
//!
//! The search itself works entirely in scale-degree indices; this module
//! owns the mapping between those indices and concrete pitches, plus
//! diatonic triad construction for Roman-numeral chord degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Number of degrees in the diatonic scales the engine uses
pub const SCALE_DEGREES: usize = 7;

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        Note::ALL.iter().position(|&n| n == self).unwrap_or(0) as u8
    }

    /// Get note from pitch class
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" => Some(Note::C),
            "C#" | "CS" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "DS" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" | "ES" => Some(Note::F),
            "F#" | "FS" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "GS" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "AS" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Scale mode (quality of the key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    Minor, // Natural minor (Aeolian)
}

impl Mode {
    /// Get the intervals (semitones from root) for this mode
    pub fn intervals(self) -> [u8; SCALE_DEGREES] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Parse mode from string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" | "ionian" => Some(Mode::Major),
            "minor" | "naturalminor" | "aeolian" => Some(Mode::Minor),
            _ => None,
        }
    }

    /// Get a human-readable name for this mode
    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A complete scale with root and mode
///
/// Immutable theory data: interval table, triad construction, and the
/// scale-degree-index to MIDI mapping used when rendering a harmony.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: Note,
    mode: Mode,
    intervals: [u8; SCALE_DEGREES],
}

impl Scale {
    /// Create a new scale from root and mode
    pub fn new(root: Note, mode: Mode) -> Self {
        Self {
            root,
            mode,
            intervals: mode.intervals(),
        }
    }

    /// Parse a scale from strings (e.g., "C", "major")
    pub fn parse(root_str: &str, mode_str: &str) -> Option<Self> {
        let root = Note::parse(root_str)?;
        let mode = Mode::parse(mode_str)?;
        Some(Scale::new(root, mode))
    }

    /// Get the root note
    pub fn root(&self) -> Note {
        self.root
    }

    /// Get the mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the number of degrees in the scale
    pub fn len(&self) -> usize {
        SCALE_DEGREES
    }

    /// Scales always have seven degrees
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Get the note at a 0-based pitch degree
    pub fn note_at(&self, degree: usize) -> Note {
        let pc = self.root.pitch_class() + self.intervals[degree % SCALE_DEGREES];
        Note::from_pitch_class(pc % 12)
    }

    /// Semitones above the root for a non-negative scale-degree index
    ///
    /// Index 0..6 is octave zero of the scale; index 7 is the root one
    /// octave up, and so on.
    pub fn semitones_at(&self, index: i32) -> i32 {
        debug_assert!(index >= 0);
        let octave = index / SCALE_DEGREES as i32;
        let degree = (index % SCALE_DEGREES as i32) as usize;
        self.intervals[degree] as i32 + octave * 12
    }

    /// Map a scale-degree index to a MIDI note, anchored at `base_octave`
    /// (MIDI convention: middle C = C4 = 60)
    pub fn midi_note(&self, index: i32, base_octave: i8) -> Option<MidiNote> {
        if index < 0 {
            return None;
        }
        let root_midi = (base_octave as i32 + 1) * 12 + self.root.pitch_class() as i32;
        let midi = root_midi + self.semitones_at(index);
        if (0..=127).contains(&midi) {
            Some(midi as MidiNote)
        } else {
            None
        }
    }

    /// The 0-based pitch degrees forming the diatonic triad on a
    /// Roman-numeral chord degree (1-7): root, third, fifth
    pub fn triad_degrees(&self, chord_degree: u8) -> [usize; 3] {
        let root = (chord_degree.clamp(1, 7) as usize - 1) % SCALE_DEGREES;
        [root, (root + 2) % SCALE_DEGREES, (root + 4) % SCALE_DEGREES]
    }

    /// Check whether a 0-based pitch degree is a tone of the triad built
    /// on the given chord degree
    pub fn is_chord_tone(&self, pitch_degree: usize, chord_degree: u8) -> bool {
        self.triad_degrees(chord_degree)
            .contains(&(pitch_degree % SCALE_DEGREES))
    }

    /// Roman-numeral spelling for a chord degree, quality-aware per mode
    pub fn roman(&self, chord_degree: u8) -> &'static str {
        let idx = (chord_degree.clamp(1, 7) - 1) as usize;
        match self.mode {
            Mode::Major => ["I", "ii", "iii", "IV", "V", "vi", "vii\u{00b0}"][idx],
            Mode::Minor => ["i", "ii\u{00b0}", "III", "iv", "v", "VI", "VII"][idx],
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}
