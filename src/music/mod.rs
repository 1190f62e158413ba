// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for HARMONYGEN.
//!
//! This module provides the scale/key system the search operates over:
//! pitch-class parsing, major/minor scale tables, diatonic triad
//! construction, and scale-degree to MIDI mapping.

pub mod scale;

pub use scale::{Mode, Note, Scale};
