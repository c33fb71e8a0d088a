// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequencer core: the one-bar step grid and everything edited on it.
//!
//! This module provides:
//! - Track model with rhythm, melodic and chord variants
//! - Chord zones for chord tracks
//! - Composition state (ordered tracks plus selection)
//! - Score compilation into per-step playback events

pub mod composition;
pub mod score;
pub mod track;
pub mod zones;

pub use composition::{Composition, CompositionError};
pub use score::{compile_score, Notes, Score, ScoreEvent};
pub use track::{DrumRow, MelodicTrack, RhythmTrack, Track, TrackId, TrackKind};
pub use zones::{ChordZones, Direction, Zone};

/// Steps in the bar
pub const STEPS: usize = 16;

/// Steps per quarter-note beat (the grid is in sixteenths)
pub const STEPS_PER_BEAT: usize = 4;

/// On/off state of one lane across the bar
pub type StepRow = [bool; STEPS];

/// Indices of the steps switched on in a row
pub fn active_steps(row: &StepRow) -> impl Iterator<Item = usize> + '_ {
    row.iter().enumerate().filter(|(_, on)| **on).map(|(step, _)| step)
}

/// Whether a step falls on a beat
pub fn is_beat(step: usize) -> bool {
    step % STEPS_PER_BEAT == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_steps() {
        let mut row = [false; STEPS];
        row[0] = true;
        row[7] = true;
        row[15] = true;
        assert_eq!(active_steps(&row).collect::<Vec<_>>(), vec![0, 7, 15]);
    }

    #[test]
    fn test_beats() {
        let beats: Vec<_> = (0..STEPS).filter(|&s| is_beat(s)).collect();
        assert_eq!(beats, vec![0, 4, 8, 12]);
    }
}
