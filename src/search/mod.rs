// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmony-search engine.
//!
//! The search works on [`Harmony`] candidates: a melody of scale-degree
//! indices plus a chord progression of Roman-numeral degrees. A fixed-size
//! [`memory::HarmonyMemory`] holds the population, the
//! [`improvise::Improviser`] produces new candidates from it, the
//! [`fitness::FitnessEvaluator`] scores them, and the
//! [`optimizer::Optimizer`] drives the replace-worst loop.

pub mod fitness;
pub mod improvise;
pub mod memory;
pub mod optimizer;

use crate::music::scale::SCALE_DEGREES;

/// A melody position: a scale-degree index, or [`REST`]
///
/// Index 0..6 is octave zero of the scale, 7..13 the octave above
/// (`index % 7` is the degree, `index / 7` the octave shift).
pub type Pitch = i32;

/// Rest marker for melody positions
pub const REST: Pitch = -1;

/// Highest scale-degree index a melody may use (two octaves)
pub const MELODY_MAX: Pitch = (2 * SCALE_DEGREES - 1) as Pitch;

/// A Roman-numeral chord degree in [1, 7]
pub type ChordDegree = u8;

/// One candidate composition in the search population
#[derive(Debug, Clone, PartialEq)]
pub struct Harmony {
    /// Scale-degree indices, one per melody position;
    /// length = measures * beats_per_measure * notes_per_beat
    pub melody: Vec<Pitch>,
    /// Chord degrees, one per measure
    pub chords: Vec<ChordDegree>,
    /// Fitness under the evaluator that produced this harmony;
    /// `NEG_INFINITY` until first evaluated
    pub fitness: f64,
}

impl Harmony {
    /// Create an unevaluated harmony
    pub fn new(melody: Vec<Pitch>, chords: Vec<ChordDegree>) -> Self {
        Self {
            melody,
            chords,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Iterate over the pitched (non-rest) melody positions
    pub fn pitched(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.melody.iter().copied().filter(|&p| p != REST)
    }

    /// Count of pitched melody positions
    pub fn pitched_count(&self) -> usize {
        self.pitched().count()
    }
}
