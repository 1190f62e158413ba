// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Optimizer loop driving the harmony search.
//!
//! Single-threaded and synchronous: initialize the harmony memory, run
//! exactly `max_iter` improvisations with replace-worst survivor
//! selection, return a copy of the best harmony ever observed. There is
//! no convergence-based early exit; the iteration budget is the cost
//! model. Each `optimize()` call re-runs initialization from scratch, so
//! runs are independent and reproducible from their seed.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::CompositionConfig;
use crate::music::scale::Scale;

use super::fitness::FitnessEvaluator;
use super::improvise::Improviser;
use super::memory::{HarmonyMemory, MemoryError};
use super::Harmony;

/// Harmony-search optimizer for one composition configuration
///
/// Construction validates the configuration and resolves the key/mode;
/// configuration errors surface here, never mid-run.
#[derive(Debug)]
pub struct Optimizer {
    config: CompositionConfig,
    scale: Scale,
    evaluator: FitnessEvaluator,
    improviser: Improviser,
    memory: HarmonyMemory,
    rng: StdRng,
}

impl Optimizer {
    /// Create an optimizer from a configuration and an RNG seed
    ///
    /// The seed fully determines the run: equal configurations and seeds
    /// produce bit-identical results.
    pub fn new(config: CompositionConfig, seed: u64) -> Result<Self, crate::ConfigError> {
        let scale = config.validate()?;
        let evaluator = FitnessEvaluator::new(
            scale.clone(),
            config.beats_per_measure,
            config.notes_per_beat,
        );
        let improviser = Improviser::new(&config);
        let memory = HarmonyMemory::new(config.hms);

        Ok(Self {
            config,
            scale,
            evaluator,
            improviser,
            memory,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The configuration this optimizer was built from
    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// The resolved scale (theory tables) for this run
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    /// The fitness evaluator in use
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// Best harmony from the most recent run, if any
    ///
    /// Remains valid and re-exportable even if a downstream consumer
    /// (e.g., a renderer) fails after `optimize()` returns.
    pub fn best(&self) -> Option<&Harmony> {
        self.memory.best()
    }

    /// Run the full search and return a copy of the best harmony
    pub fn optimize(&mut self) -> Result<Harmony, MemoryError> {
        self.run(None)
    }

    /// Run the search, polling a cancellation flag once per iteration
    ///
    /// On cancellation the best harmony found so far is returned.
    pub fn optimize_with_cancel(&mut self, cancel: &AtomicBool) -> Result<Harmony, MemoryError> {
        self.run(Some(cancel))
    }

    fn run(&mut self, cancel: Option<&AtomicBool>) -> Result<Harmony, MemoryError> {
        // Split borrows: the initialization closure needs the RNG while
        // the memory is borrowed mutably.
        let Self {
            ref config,
            ref evaluator,
            ref improviser,
            ref mut memory,
            ref mut rng,
            ..
        } = *self;

        memory.initialize(|| improviser.random_harmony(evaluator, rng));
        info!(
            hms = config.hms,
            max_iter = config.max_iter,
            initial_best = memory.best().map(|h| h.fitness),
            "harmony memory initialized"
        );

        let mut best_fitness = memory.best().map(|h| h.fitness).unwrap_or(f64::NEG_INFINITY);

        for iteration in 0..config.max_iter {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    info!(iteration, "optimization cancelled, returning best so far");
                    break;
                }
            }

            let candidate = improviser.improvise(memory, evaluator, rng)?;
            memory.replace_if_better(candidate)?;

            if let Some(best) = memory.best() {
                if best.fitness > best_fitness {
                    best_fitness = best.fitness;
                    debug!(iteration, fitness = best_fitness, "new best harmony");
                }
            }
        }

        let best = memory.best().cloned().ok_or(MemoryError::Uninitialized)?;
        info!(fitness = best.fitness, "optimization complete");
        Ok(best)
    }
}
