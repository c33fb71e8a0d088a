// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for stepgrid.
//!
//! Pitch naming and chord voicing. Everything here is pure and stateless.

pub mod chord;
pub mod pitch;

pub use chord::{chord_voicing, Chord, ChordType, TheoryError};
pub use pitch::{Octave, Pitch, PitchClass};
