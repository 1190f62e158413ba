// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! HARMONYGEN - Harmony-search music composition engine.
//!
//! Generates short compositions (melody plus chord progression) by running
//! a harmony-search metaheuristic over scale-degree sequences, scoring
//! candidates with music-theoretic heuristics, and converting the winner
//! into a pure-data score for downstream MIDI/notation tooling.

pub mod arrangement;
pub mod config;
pub mod music;
pub mod search;

pub use arrangement::{Arranger, ArrangementStyle, NoteEvent, Score, Track};
pub use config::{CompositionConfig, ConfigError};
pub use music::scale::{Mode, Note, Scale};
pub use search::memory::{HarmonyMemory, MemoryError};
pub use search::optimizer::Optimizer;
pub use search::{ChordDegree, Harmony, Pitch, REST};

use thiserror::Error;

/// Top-level error type for the composition engine
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration, raised before any optimization begins
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Harmony memory used before initialization (programming error)
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
