// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Multi-criteria fitness evaluation for candidate harmonies.
//!
//! Scoring is a pure function of the harmony and the theory tables bundled
//! at construction. Every criterion contributes additively and the weights
//! are plain data, so a caller can retune the musical taste of the search
//! without touching the scoring code.
//!
//! Default weights:
//!
//! | Criterion                                   | Weight        |
//! |---------------------------------------------|---------------|
//! | Melodic step (<= 2 semitones)               | +0.5          |
//! | Small skip (<= 4 semitones)                 | +0.2          |
//! | Leap (> 4 semitones)                        | -0.2          |
//! | Contour direction change                    | +0.2          |
//! | Final melody note on the tonic              | +1.0          |
//! | Chord-progression template match            | +2.0 each     |
//! | Perfect cadence (V -> I)                    | +2.0          |
//! | Plagal cadence (IV -> I)                    | +1.5          |
//! | Melody note is a chord tone of its measure  | +0.5          |
//! | Chord tone lands on a strong beat           | +0.3 extra    |

use crate::music::scale::{Scale, SCALE_DEGREES};

use super::{ChordDegree, Harmony, Pitch};

/// Tunable weights for each scoring criterion
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessWeights {
    /// Stepwise motion, interval <= 2 semitones
    pub step: f64,
    /// Small skip, interval <= 4 semitones
    pub small_skip: f64,
    /// Large leap, interval > 4 semitones (typically negative)
    pub leap: f64,
    /// Direction change between consecutive melodic intervals
    pub contour_change: f64,
    /// Melody ends on the tonic scale degree
    pub final_tonic: f64,
    /// One contiguous occurrence of a known progression template
    pub template_match: f64,
    /// Progression ends V -> I
    pub perfect_cadence: f64,
    /// Progression ends IV -> I
    pub plagal_cadence: f64,
    /// Melody note is a tone of its measure's chord
    pub chord_tone: f64,
    /// Bonus when the chord tone falls on a strong beat
    pub strong_beat_bonus: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            step: 0.5,
            small_skip: 0.2,
            leap: -0.2,
            contour_change: 0.2,
            final_tonic: 1.0,
            template_match: 2.0,
            perfect_cadence: 2.0,
            plagal_cadence: 1.5,
            chord_tone: 0.5,
            strong_beat_bonus: 0.3,
        }
    }
}

/// Canonical progressions rewarded when they appear contiguously
fn default_templates() -> Vec<Vec<ChordDegree>> {
    vec![
        vec![1, 4, 5, 1], // I-IV-V-I
        vec![1, 6, 4, 5], // I-vi-IV-V
        vec![2, 5, 1],    // ii-V-I
    ]
}

/// Scores a harmony against music-theoretic heuristics
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    weights: FitnessWeights,
    templates: Vec<Vec<ChordDegree>>,
    scale: Scale,
    beats_per_measure: usize,
    notes_per_beat: usize,
}

impl FitnessEvaluator {
    /// Create an evaluator with the default weights and templates
    pub fn new(scale: Scale, beats_per_measure: usize, notes_per_beat: usize) -> Self {
        Self {
            weights: FitnessWeights::default(),
            templates: default_templates(),
            scale,
            beats_per_measure,
            notes_per_beat,
        }
    }

    /// Override the criterion weights
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Override the progression templates
    pub fn with_templates(mut self, templates: Vec<Vec<ChordDegree>>) -> Self {
        self.templates = templates;
        self
    }

    /// Get the active weights
    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Total fitness for a harmony
    ///
    /// Unbounded above and below; an all-rest melody scores zero from the
    /// pitch-dependent criteria rather than erroring.
    pub fn evaluate(&self, harmony: &Harmony) -> f64 {
        let pitched: Vec<Pitch> = harmony.pitched().collect();

        self.melodic_motion_score(&pitched)
            + self.contour_score(&pitched)
            + self.final_tonic_score(&pitched)
            + self.template_score(&harmony.chords)
            + self.cadence_score(&harmony.chords)
            + self.alignment_score(harmony)
    }

    /// Evaluate and store the fitness on the harmony
    pub fn evaluate_into(&self, harmony: &mut Harmony) {
        harmony.fitness = self.evaluate(harmony);
    }

    /// Reward stepwise motion and small skips, penalize leaps
    fn melodic_motion_score(&self, pitched: &[Pitch]) -> f64 {
        pitched
            .windows(2)
            .map(|pair| {
                let interval =
                    (self.scale.semitones_at(pair[1]) - self.scale.semitones_at(pair[0])).abs();
                if interval <= 2 {
                    self.weights.step
                } else if interval <= 4 {
                    self.weights.small_skip
                } else {
                    self.weights.leap
                }
            })
            .sum()
    }

    /// Reward changes of melodic direction
    fn contour_score(&self, pitched: &[Pitch]) -> f64 {
        let mut score = 0.0;
        let mut prev_direction = 0i32;

        for pair in pitched.windows(2) {
            let direction = (pair[1] - pair[0]).signum();
            if direction != 0 {
                if prev_direction != 0 && direction != prev_direction {
                    score += self.weights.contour_change;
                }
                prev_direction = direction;
            }
        }
        score
    }

    /// Reward a melody that comes to rest on the tonic
    fn final_tonic_score(&self, pitched: &[Pitch]) -> f64 {
        match pitched.last() {
            Some(&last) if last as usize % SCALE_DEGREES == 0 => self.weights.final_tonic,
            _ => 0.0,
        }
    }

    /// Reward contiguous occurrences of known progression templates
    fn template_score(&self, chords: &[ChordDegree]) -> f64 {
        let mut matches = 0usize;
        for template in &self.templates {
            if chords.len() < template.len() {
                continue;
            }
            matches += chords
                .windows(template.len())
                .filter(|window| *window == template.as_slice())
                .count();
        }
        matches as f64 * self.weights.template_match
    }

    /// Reward a perfect or plagal cadence at the very end
    fn cadence_score(&self, chords: &[ChordDegree]) -> f64 {
        match chords {
            [.., 5, 1] => self.weights.perfect_cadence,
            [.., 4, 1] => self.weights.plagal_cadence,
            _ => 0.0,
        }
    }

    /// Reward melody notes that are chord tones of the governing measure
    fn alignment_score(&self, harmony: &Harmony) -> f64 {
        let positions_per_measure = self.beats_per_measure * self.notes_per_beat;
        let mut score = 0.0;

        for (i, &pitch) in harmony.melody.iter().enumerate() {
            if pitch < 0 {
                continue;
            }
            let measure = i / positions_per_measure;
            let Some(&chord) = harmony.chords.get(measure) else {
                continue;
            };

            let pitch_degree = pitch as usize % SCALE_DEGREES;
            if self.scale.is_chord_tone(pitch_degree, chord) {
                score += self.weights.chord_tone;
                if self.is_strong_beat(i % positions_per_measure) {
                    score += self.weights.strong_beat_bonus;
                }
            }
        }
        score
    }

    /// Strong beats: the downbeat, and the mid-measure beat in 4/4-like meters
    fn is_strong_beat(&self, position_in_measure: usize) -> bool {
        if position_in_measure % self.notes_per_beat != 0 {
            return false;
        }
        let beat = position_in_measure / self.notes_per_beat;
        beat == 0 || (self.beats_per_measure >= 4 && beat == self.beats_per_measure / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::scale::{Mode, Note};
    use crate::search::REST;

    fn evaluator() -> FitnessEvaluator {
        FitnessEvaluator::new(Scale::new(Note::C, Mode::Major), 4, 2)
    }

    #[test]
    fn test_all_rest_melody_scores_pitch_criteria_zero() {
        let ev = evaluator();
        let h = Harmony::new(vec![REST; 32], vec![3, 6, 2, 3]);
        // No pitched notes, no template, no cadence: total must be zero
        assert_eq!(ev.evaluate(&h), 0.0);
    }

    #[test]
    fn test_stepwise_motion_rewarded() {
        let ev = evaluator();
        // C-D-E: two steps of 2 semitones
        assert_eq!(ev.melodic_motion_score(&[0, 1, 2]), 1.0);
        // C up to A (9 semitones): a leap
        assert_eq!(ev.melodic_motion_score(&[0, 5]), -0.2);
        // E-G is 3 semitones: a small skip
        assert_eq!(ev.melodic_motion_score(&[2, 4]), 0.2);
    }

    #[test]
    fn test_contour_changes_counted() {
        let ev = evaluator();
        // Up, up: no change
        assert_eq!(ev.contour_score(&[0, 2, 4]), 0.0);
        // Up, down, up: two changes
        let score = ev.contour_score(&[0, 4, 1, 5]);
        assert!((score - 0.4).abs() < 1e-9);
        // Repeated notes do not reset the direction
        let score = ev.contour_score(&[0, 4, 4, 1]);
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_final_tonic_bonus() {
        let ev = evaluator();
        assert_eq!(ev.final_tonic_score(&[4, 2, 0]), 1.0);
        // Octave-up tonic counts too (index 7 = degree 0)
        assert_eq!(ev.final_tonic_score(&[4, 2, 7]), 1.0);
        // Ending anywhere else does not
        assert_eq!(ev.final_tonic_score(&[0, 2, 4]), 0.0);
        assert_eq!(ev.final_tonic_score(&[]), 0.0);
    }

    #[test]
    fn test_template_scores_exactly_once() {
        let ev = evaluator();
        // I-IV-V-I matches its template once and nothing else
        assert_eq!(ev.template_score(&[1, 4, 5, 1]), 2.0);
    }

    #[test]
    fn test_template_requires_contiguity() {
        let ev = evaluator();
        assert_eq!(ev.template_score(&[1, 4, 3, 5, 1]), 0.0);
    }

    #[test]
    fn test_short_progression_never_matches_template() {
        let ev = evaluator();
        assert_eq!(ev.template_score(&[1, 4]), 0.0);
        assert_eq!(ev.template_score(&[]), 0.0);
    }

    #[test]
    fn test_template_can_repeat() {
        let ev = evaluator();
        // ii-V-I twice in an eight-measure progression
        assert_eq!(ev.template_score(&[2, 5, 1, 2, 5, 1, 3, 3]), 4.0);
    }

    #[test]
    fn test_cadence_preference() {
        let ev = evaluator();
        assert_eq!(ev.cadence_score(&[1, 6, 5, 1]), 2.0); // perfect
        assert_eq!(ev.cadence_score(&[1, 6, 4, 1]), 1.5); // plagal
        assert_eq!(ev.cadence_score(&[1, 6, 2, 1]), 0.0);
        assert_eq!(ev.cadence_score(&[1]), 0.0);
    }

    #[test]
    fn test_chord_tone_alignment() {
        let ev = FitnessEvaluator::new(Scale::new(Note::C, Mode::Major), 2, 1);
        // Two measures of I; melody C (chord tone, downbeat), D (not),
        // E (chord tone, downbeat), F (not)
        let h = Harmony::new(vec![0, 1, 2, 3], vec![1, 1]);
        let score = ev.alignment_score(&h);
        // 2 chord tones * 0.5 + 2 downbeats * 0.3
        assert!((score - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_strong_beats() {
        let ev = evaluator(); // 4 beats, 2 notes per beat
        assert!(ev.is_strong_beat(0)); // beat 0
        assert!(!ev.is_strong_beat(1)); // offbeat
        assert!(!ev.is_strong_beat(2)); // beat 1
        assert!(ev.is_strong_beat(4)); // beat 2 (mid-measure)
        assert!(!ev.is_strong_beat(6)); // beat 3
    }

    #[test]
    fn test_evaluate_is_pure() {
        let ev = evaluator();
        let h = Harmony::new(vec![0, 2, 4, REST, 7, 5, 4, 0], vec![1, 4, 5, 1]);
        let first = ev.evaluate(&h);
        let second = ev.evaluate(&h);
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_into_sets_fitness() {
        let ev = evaluator();
        let mut h = Harmony::new(vec![0, 1, 2, 0], vec![1, 4, 5, 1]);
        assert_eq!(h.fitness, f64::NEG_INFINITY);
        ev.evaluate_into(&mut h);
        assert!(h.fitness.is_finite());
        assert_eq!(h.fitness, ev.evaluate(&h));
    }

    #[test]
    fn test_custom_weights_change_score() {
        let scale = Scale::new(Note::C, Mode::Major);
        let ev = FitnessEvaluator::new(scale, 4, 2).with_weights(FitnessWeights {
            template_match: 10.0,
            ..FitnessWeights::default()
        });
        assert_eq!(ev.template_score(&[1, 4, 5, 1]), 10.0);
    }
}
