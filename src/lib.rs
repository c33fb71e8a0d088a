// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! stepgrid: a one-bar, sixteen-step composer.
//!
//! Tracks of drums, melodic instruments and chord progressions are edited on
//! a shared grid and compiled into a per-step score that an external
//! playback engine sounds.

pub mod config;
pub mod music;
pub mod playback;
pub mod sequencer;
pub mod ui;
