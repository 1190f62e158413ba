// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Harmony memory: the fixed-size population of the search.
//!
//! Uses a steady-state replace-worst policy. Best/worst lookup is a scan
//! over current fitness values rather than a maintained sort; with memory
//! sizes in the tens a scan is cheaper than keeping the slots ordered.

use thiserror::Error;
use tracing::debug;

use super::Harmony;

/// Errors from harmony memory operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    /// An operation ran before `initialize()` populated the memory.
    /// This is a programming error in the caller, not a recoverable state.
    #[error("harmony memory accessed before initialization")]
    Uninitialized,
}

/// Fixed-size population of candidate harmonies
///
/// Holds exactly `capacity` harmonies once initialized, plus a value copy
/// of the best harmony ever observed. The all-time best is tracked
/// separately because replace-worst dynamics could otherwise evict it,
/// though by construction it is always also present in a slot.
#[derive(Debug)]
pub struct HarmonyMemory {
    capacity: usize,
    slots: Vec<Harmony>,
    all_time_best: Option<Harmony>,
}

impl HarmonyMemory {
    /// Create an empty memory with the given capacity (HMS)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            all_time_best: None,
        }
    }

    /// Populate the memory with `capacity` fresh harmonies
    ///
    /// Each call starts a new run: existing slots and the all-time best
    /// are discarded. The producer must return evaluated harmonies; the
    /// best of the batch seeds the all-time best.
    pub fn initialize<F>(&mut self, mut random_harmony: F)
    where
        F: FnMut() -> Harmony,
    {
        self.slots.clear();
        self.all_time_best = None;

        for _ in 0..self.capacity {
            let harmony = random_harmony();
            if self
                .all_time_best
                .as_ref()
                .map_or(true, |best| harmony.fitness > best.fitness)
            {
                self.all_time_best = Some(harmony.clone());
            }
            self.slots.push(harmony);
        }

        debug!(
            size = self.slots.len(),
            best_fitness = self.all_time_best.as_ref().map(|h| h.fitness),
            "harmony memory initialized"
        );
    }

    /// Whether `initialize()` has run
    pub fn is_initialized(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Number of harmonies currently held
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True before initialization
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get a harmony by slot index
    ///
    /// Panics on out-of-range indices; callers draw indices from `0..len()`.
    pub fn member(&self, index: usize) -> &Harmony {
        &self.slots[index]
    }

    /// Index of the worst harmony (minimum fitness)
    ///
    /// Ties break to the first slot found, keeping runs reproducible
    /// under a fixed seed.
    pub fn worst(&self) -> Result<usize, MemoryError> {
        self.slots
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.fitness
                    .partial_cmp(&b.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .ok_or(MemoryError::Uninitialized)
    }

    /// Fitness of the current worst harmony
    pub fn worst_fitness(&self) -> Result<f64, MemoryError> {
        Ok(self.slots[self.worst()?].fitness)
    }

    /// Replace the worst harmony if the candidate is strictly better
    ///
    /// Strict inequality only: a candidate tying the worst fitness leaves
    /// the memory unchanged, preventing churn with no improvement. Returns
    /// whether a replacement occurred.
    pub fn replace_if_better(&mut self, candidate: Harmony) -> Result<bool, MemoryError> {
        let worst_idx = self.worst()?;
        if candidate.fitness <= self.slots[worst_idx].fitness {
            return Ok(false);
        }

        if self
            .all_time_best
            .as_ref()
            .map_or(true, |best| candidate.fitness > best.fitness)
        {
            self.all_time_best = Some(candidate.clone());
        }
        self.slots[worst_idx] = candidate;
        Ok(true)
    }

    /// The best harmony ever observed across this run, if initialized
    pub fn best(&self) -> Option<&Harmony> {
        self.all_time_best.as_ref()
    }
}
