// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for stepgrid.
//!
//! This module provides the instrument catalog (which instruments can be
//! added as tracks, and what shape their tracks take) and playback settings.
//! Both load from a single YAML or TOML file; every field has a default so
//! an empty file yields the stock catalog.

pub mod catalog;

pub use catalog::{
    max_view_base, DrumRowConfig, InstrumentCatalog, InstrumentConfig, InstrumentKind, VIEW_OCTAVES,
};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::music::Octave;

/// Catalog validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("duplicate instrument id: {0}")]
    DuplicateInstrument(String),
    #[error("instrument {id}: empty octave range {low}..={high}")]
    EmptyOctaveRange { id: String, low: Octave, high: Octave },
    #[error("instrument {id}: octave range {low}..={high} outside -1..=9")]
    OctaveOutOfBounds { id: String, low: Octave, high: Octave },
    #[error("instrument {id}: view base {view_base} outside octave range")]
    ViewBaseOutOfRange { id: String, view_base: Octave },
    #[error("instrument {id}: voice {voice} is not a melodic instrument in the catalog")]
    UnknownVoice { id: String, voice: String },
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// Root configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposerFile {
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Instrument catalog entries, in picker order
    #[serde(default = "catalog::builtin_instruments")]
    pub instruments: Vec<InstrumentConfig>,
}

impl Default for ComposerFile {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            instruments: catalog::builtin_instruments(),
        }
    }
}

impl ComposerFile {
    /// Load a configuration file, picking the parser from the extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file = match ext {
            "yaml" | "yml" => Self::from_yaml(&contents)?,
            "toml" => Self::from_toml(&contents)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
        };

        tracing::info!(
            path = %path.display(),
            instruments = file.instruments.len(),
            "loaded configuration"
        );
        Ok(file)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse TOML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Build the validated instrument catalog
    pub fn catalog(&self) -> Result<InstrumentCatalog, ConfigError> {
        InstrumentCatalog::new(self.instruments.clone())
    }
}

/// Playback settings handed to the playback engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Tempo in BPM
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    /// Loop the bar until stopped
    #[serde(default = "default_looping")]
    pub looping: bool,
    /// Note length used when an event carries none
    #[serde(default = "default_note_length")]
    pub note_length: String,
}

fn default_bpm() -> f64 {
    120.0
}
fn default_looping() -> bool {
    true
}
fn default_note_length() -> String {
    "16n".to_string()
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            looping: default_looping(),
            note_length: default_note_length(),
        }
    }
}
