// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Improvisation operator: produces new candidate harmonies.
//!
//! Each melody and chord position is decided independently, choosing
//! between memory consideration (probability HMCR) and fresh random
//! selection. Memory-sourced values may then be pitch-adjusted
//! (probability PAR) within the bandwidth BW. Position independence trades
//! local musical coherence for a search space the optimizer can actually
//! explore; the fitness function pulls candidates toward coherence over
//! iterations.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::CompositionConfig;
use crate::music::scale::SCALE_DEGREES;

use super::fitness::FitnessEvaluator;
use super::memory::{HarmonyMemory, MemoryError};
use super::{ChordDegree, Harmony, Pitch, MELODY_MAX, REST};

/// Chance that a freshly drawn melody position is a rest
pub const REST_PROBABILITY: f64 = 0.1;

/// Selection weights for freshly drawn chord degrees 1-7.
///
/// Tonic, subdominant, and dominant (1, 4, 5) dominate, echoing their role
/// in common-practice harmony; the leading-tone triad (7) is rare.
pub const CHORD_DEGREE_WEIGHTS: [f64; 7] = [4.0, 1.0, 1.0, 3.0, 3.0, 2.0, 0.5];

/// Stochastic candidate producer for the harmony search
#[derive(Debug, Clone)]
pub struct Improviser {
    hmcr: f64,
    par: f64,
    bw: f64,
    melody_len: usize,
    measures: usize,
}

impl Improviser {
    /// Create an improviser from a validated configuration
    pub fn new(config: &CompositionConfig) -> Self {
        Self {
            hmcr: config.hmcr,
            par: config.par,
            bw: config.bw,
            melody_len: config.melody_len(),
            measures: config.measures,
        }
    }

    /// Produce a fully random, evaluated harmony (memory initialization)
    pub fn random_harmony(&self, evaluator: &FitnessEvaluator, rng: &mut StdRng) -> Harmony {
        let melody = (0..self.melody_len).map(|_| self.random_pitch(rng)).collect();
        let chords = (0..self.measures).map(|_| self.random_chord(rng)).collect();

        let mut harmony = Harmony::new(melody, chords);
        evaluator.evaluate_into(&mut harmony);
        harmony
    }

    /// Improvise a new candidate from the harmony memory
    ///
    /// The returned harmony is always evaluated. Fails only if the memory
    /// has not been initialized.
    pub fn improvise(
        &self,
        memory: &HarmonyMemory,
        evaluator: &FitnessEvaluator,
        rng: &mut StdRng,
    ) -> Result<Harmony, MemoryError> {
        if !memory.is_initialized() {
            return Err(MemoryError::Uninitialized);
        }

        let mut melody = Vec::with_capacity(self.melody_len);
        for i in 0..self.melody_len {
            let pitch = if rng.gen::<f64>() < self.hmcr {
                let member = memory.member(rng.gen_range(0..memory.len()));
                let recalled = member.melody[i];
                if recalled != REST && rng.gen::<f64>() < self.par {
                    self.adjust_pitch(recalled, rng)
                } else {
                    recalled
                }
            } else {
                self.random_pitch(rng)
            };
            melody.push(pitch);
        }

        let mut chords = Vec::with_capacity(self.measures);
        for i in 0..self.measures {
            let degree = if rng.gen::<f64>() < self.hmcr {
                let member = memory.member(rng.gen_range(0..memory.len()));
                let recalled = member.chords[i];
                if rng.gen::<f64>() < self.par {
                    self.adjust_chord(recalled, rng)
                } else {
                    recalled
                }
            } else {
                self.random_chord(rng)
            };
            chords.push(degree);
        }

        let mut harmony = Harmony::new(melody, chords);
        evaluator.evaluate_into(&mut harmony);
        Ok(harmony)
    }

    /// Fresh random melody value: occasional rest, otherwise uniform in range
    fn random_pitch(&self, rng: &mut StdRng) -> Pitch {
        if rng.gen::<f64>() < REST_PROBABILITY {
            REST
        } else {
            rng.gen_range(0..=MELODY_MAX)
        }
    }

    /// Fresh random chord degree, weighted toward tonal anchors
    fn random_chord(&self, rng: &mut StdRng) -> ChordDegree {
        let total: f64 = CHORD_DEGREE_WEIGHTS.iter().sum();
        let mut roll = rng.gen::<f64>() * total;

        for (i, &weight) in CHORD_DEGREE_WEIGHTS.iter().enumerate() {
            roll -= weight;
            if roll <= 0.0 {
                return (i + 1) as ChordDegree;
            }
        }
        1
    }

    /// Shift a pitched note within the bandwidth, staying pitched
    fn adjust_pitch(&self, pitch: Pitch, rng: &mut StdRng) -> Pitch {
        // uniform in [-bw, bw]; not gen_range, which rejects an empty
        // span when bw is zero
        let offset = (rng.gen::<f64>() * 2.0 - 1.0) * self.bw;
        let shift = (offset * SCALE_DEGREES as f64).round() as i32;
        (pitch + shift).clamp(0, MELODY_MAX)
    }

    /// Nudge a chord one scale degree up or down
    fn adjust_chord(&self, degree: ChordDegree, rng: &mut StdRng) -> ChordDegree {
        if rng.gen::<bool>() {
            (degree + 1).min(7)
        } else {
            degree.saturating_sub(1).max(1)
        }
    }
}
