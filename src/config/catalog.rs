// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument catalog.
//!
//! Maps instrument ids to the kind of track they produce. Adding an entry
//! here is all it takes to offer a new instrument.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::music::{Octave, Pitch, PitchClass};

/// Width of the melodic view window in octaves
pub const VIEW_OCTAVES: Octave = 3;

/// Octaves a melodic instrument may span
pub const OCTAVE_BOUNDS: RangeInclusive<Octave> = -1..=9;

/// Highest view base for an octave range; narrow ranges pin it to `low`
pub fn max_view_base(low: Octave, high: Octave) -> Octave {
    high.saturating_sub(VIEW_OCTAVES - 1).max(low)
}

/// Which track variant an instrument produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Fixed drum rows
    Rhythm,
    /// Chromatic piano roll
    Melody,
    /// Chord zones plus trigger steps
    Chord,
}

/// One fixed row of a rhythm instrument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrumRowConfig {
    /// Row label shown in the editor
    pub label: String,
    /// Pitch sent to the sampler when the row fires
    pub note: Pitch,
}

impl DrumRowConfig {
    fn new(label: &str, class: PitchClass, octave: Octave) -> Self {
        Self {
            label: label.to_string(),
            note: Pitch::new(class, octave),
        }
    }
}

/// Kick, snare, hi-hat and tom on the sampler's drum keys
pub fn default_drum_rows() -> Vec<DrumRowConfig> {
    vec![
        DrumRowConfig::new("Kick", PitchClass::C, 1),
        DrumRowConfig::new("Snare", PitchClass::D, 1),
        DrumRowConfig::new("HiHat", PitchClass::Fs, 1),
        DrumRowConfig::new("Tom", PitchClass::G, 1),
    ]
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentConfig {
    /// Identifier used in score events
    pub id: String,
    /// Display name
    pub label: String,
    /// Track variant
    pub kind: InstrumentKind,
    /// Drum rows (rhythm only, empty means the stock kit)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<DrumRowConfig>,
    /// Lowest and highest stored octave (melody only)
    #[serde(default = "default_octaves")]
    pub octaves: [Octave; 2],
    /// First octave of the initial view window (melody only)
    #[serde(default = "default_view_base")]
    pub view_base: Octave,
    /// Instrument that sounds the voicings (chord only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

fn default_octaves() -> [Octave; 2] {
    [1, 7]
}
fn default_view_base() -> Octave {
    3
}

impl InstrumentConfig {
    /// Create a melodic instrument with the stock range
    pub fn melody(id: &str, label: &str, view_base: Octave) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: InstrumentKind::Melody,
            rows: Vec::new(),
            octaves: default_octaves(),
            view_base,
            voice: None,
        }
    }

    /// Create a rhythm instrument with the stock kit
    pub fn rhythm(id: &str, label: &str) -> Self {
        Self {
            kind: InstrumentKind::Rhythm,
            ..Self::melody(id, label, default_view_base())
        }
    }

    /// Create a chord instrument sounded through `voice`
    pub fn chord(id: &str, label: &str, voice: &str) -> Self {
        Self {
            kind: InstrumentKind::Chord,
            voice: Some(voice.to_string()),
            ..Self::melody(id, label, default_view_base())
        }
    }

    /// Drum rows, falling back to the stock kit
    pub fn drum_rows(&self) -> Vec<DrumRowConfig> {
        if self.rows.is_empty() {
            default_drum_rows()
        } else {
            self.rows.clone()
        }
    }

    /// Instrument id that plays this instrument's events
    pub fn voice(&self) -> &str {
        match self.kind {
            InstrumentKind::Chord => self.voice.as_deref().unwrap_or("piano"),
            _ => &self.id,
        }
    }

    /// Highest view base that keeps a full view window inside the range
    pub fn max_view_base(&self) -> Octave {
        let [low, high] = self.octaves;
        max_view_base(low, high)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            InstrumentKind::Melody => {
                let [low, high] = self.octaves;
                if low > high {
                    return Err(ConfigError::EmptyOctaveRange {
                        id: self.id.clone(),
                        low,
                        high,
                    });
                }
                if !OCTAVE_BOUNDS.contains(&low) || !OCTAVE_BOUNDS.contains(&high) {
                    return Err(ConfigError::OctaveOutOfBounds {
                        id: self.id.clone(),
                        low,
                        high,
                    });
                }
                if self.view_base < low || self.view_base > self.max_view_base() {
                    return Err(ConfigError::ViewBaseOutOfRange {
                        id: self.id.clone(),
                        view_base: self.view_base,
                    });
                }
            }
            InstrumentKind::Rhythm | InstrumentKind::Chord => {}
        }
        Ok(())
    }
}

/// The stock instrument set, in picker order
pub fn builtin_instruments() -> Vec<InstrumentConfig> {
    vec![
        InstrumentConfig::rhythm("drums", "Drums"),
        InstrumentConfig::chord("chord", "Chords", "piano"),
        InstrumentConfig::melody("piano", "Piano", 3),
        InstrumentConfig::melody("bass", "Bass", 1),
        InstrumentConfig::melody("aco_guitar", "Acoustic Guitar", 2),
        InstrumentConfig::melody("ele_guitar", "Electric Guitar", 2),
        InstrumentConfig::melody("violin", "Violin", 3),
        InstrumentConfig::melody("trumpet", "Trumpet", 3),
    ]
}

/// Validated, ordered set of instruments
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentCatalog {
    instruments: Vec<InstrumentConfig>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl InstrumentCatalog {
    /// Validate and wrap a list of instruments
    pub fn new(instruments: Vec<InstrumentConfig>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for inst in &instruments {
            if !seen.insert(inst.id.as_str()) {
                return Err(ConfigError::DuplicateInstrument(inst.id.clone()));
            }
            inst.validate()?;
        }

        for inst in instruments.iter().filter(|i| i.kind == InstrumentKind::Chord) {
            let voice = inst.voice();
            let playable = instruments
                .iter()
                .any(|i| i.id == voice && i.kind == InstrumentKind::Melody);
            if !playable {
                return Err(ConfigError::UnknownVoice {
                    id: inst.id.clone(),
                    voice: voice.to_string(),
                });
            }
        }

        Ok(Self { instruments })
    }

    /// The stock catalog
    pub fn builtin() -> Self {
        Self {
            instruments: builtin_instruments(),
        }
    }

    /// Look up an instrument by id
    pub fn get(&self, id: &str) -> Option<&InstrumentConfig> {
        self.instruments.iter().find(|i| i.id == id)
    }

    /// Instrument at a picker position
    pub fn at(&self, index: usize) -> Option<&InstrumentConfig> {
        self.instruments.get(index)
    }

    /// Iterate in picker order
    pub fn iter(&self) -> impl Iterator<Item = &InstrumentConfig> {
        self.instruments.iter()
    }

    /// Number of instruments
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Display label for an id, falling back to the id itself
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|i| i.label.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = InstrumentCatalog::new(builtin_instruments()).unwrap();
        assert_eq!(catalog, InstrumentCatalog::builtin());
        assert_eq!(catalog.at(0).unwrap().id, "drums");
        assert_eq!(catalog.get("bass").unwrap().view_base, 1);
        assert_eq!(catalog.get("chord").unwrap().voice(), "piano");
        assert_eq!(catalog.get("violin").unwrap().voice(), "violin");
    }

    #[test]
    fn test_default_drum_rows() {
        let drums = InstrumentConfig::rhythm("drums", "Drums");
        let rows = drums.drum_rows();
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Kick", "Snare", "HiHat", "Tom"]);
        assert_eq!(rows[2].note.to_string(), "F#1");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = InstrumentCatalog::new(vec![
            InstrumentConfig::melody("piano", "Piano", 3),
            InstrumentConfig::melody("piano", "Piano 2", 3),
        ]);
        assert_eq!(result, Err(ConfigError::DuplicateInstrument("piano".to_string())));
    }

    #[test]
    fn test_view_base_validation() {
        let mut inst = InstrumentConfig::melody("piano", "Piano", 6);
        assert_eq!(inst.max_view_base(), 5);
        assert!(matches!(
            InstrumentCatalog::new(vec![inst.clone()]),
            Err(ConfigError::ViewBaseOutOfRange { .. })
        ));

        inst.octaves = [4, 5];
        inst.view_base = 4;
        assert_eq!(inst.max_view_base(), 4);
        assert!(InstrumentCatalog::new(vec![inst]).is_ok());
    }

    #[test]
    fn test_empty_octave_range() {
        let mut inst = InstrumentConfig::melody("piano", "Piano", 3);
        inst.octaves = [5, 2];
        assert!(matches!(
            InstrumentCatalog::new(vec![inst]),
            Err(ConfigError::EmptyOctaveRange { .. })
        ));
    }

    #[test]
    fn test_octave_range_bounds() {
        let mut inst = InstrumentConfig::melody("piano", "Piano", -128);
        inst.octaves = [-128, -127];
        assert_eq!(inst.max_view_base(), -128);
        assert!(matches!(
            InstrumentCatalog::new(vec![inst.clone()]),
            Err(ConfigError::OctaveOutOfBounds { .. })
        ));

        inst.octaves = [126, 127];
        inst.view_base = 126;
        assert!(matches!(
            InstrumentCatalog::new(vec![inst.clone()]),
            Err(ConfigError::OctaveOutOfBounds { .. })
        ));

        inst.octaves = [-1, 9];
        inst.view_base = -1;
        assert_eq!(inst.max_view_base(), 7);
        assert!(InstrumentCatalog::new(vec![inst]).is_ok());
    }

    #[test]
    fn test_chord_voice_must_exist() {
        let result = InstrumentCatalog::new(vec![InstrumentConfig::chord("chord", "Chords", "organ")]);
        assert!(matches!(result, Err(ConfigError::UnknownVoice { .. })));
    }

    #[test]
    fn test_label_fallback() {
        let catalog = InstrumentCatalog::builtin();
        assert_eq!(catalog.label("aco_guitar"), "Acoustic Guitar");
        assert_eq!(catalog.label("theremin"), "theremin");
    }
}
