// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord types and voicings.
//!
//! A chord is stored as root, type and octave; its pitches are always
//! derived on demand and never cached.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::pitch::{Octave, Pitch, PitchClass};

/// Errors from the string-facing theory entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    #[error("unknown pitch class: {0}")]
    UnknownPitchClass(String),
    #[error("unknown chord type: {0}")]
    UnknownChordType(String),
    #[error("octave {0} leaves no room for the chord voicing")]
    OctaveOutOfRange(Octave),
}

/// Chord qualities offered by the chord panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordType {
    #[serde(rename = "maj")]
    Major,
    #[serde(rename = "min")]
    Minor,
    #[serde(rename = "7")]
    Dominant7,
    #[serde(rename = "maj7")]
    Major7,
    #[serde(rename = "min7")]
    Minor7,
    #[serde(rename = "sus4")]
    Sus4,
    #[serde(rename = "sus2")]
    Sus2,
    #[serde(rename = "dim")]
    Diminished,
    #[serde(rename = "aug")]
    Augmented,
}

impl ChordType {
    /// All chord types in panel order
    pub const ALL: [ChordType; 9] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Dominant7,
        ChordType::Major7,
        ChordType::Minor7,
        ChordType::Sus4,
        ChordType::Sus2,
        ChordType::Diminished,
        ChordType::Augmented,
    ];

    /// Semitone intervals above the root
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Sus4 => &[0, 5, 7],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
        }
    }

    /// Short identifier used in labels and config ("maj", "min7", "7")
    pub fn id(self) -> &'static str {
        match self {
            ChordType::Major => "maj",
            ChordType::Minor => "min",
            ChordType::Dominant7 => "7",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "min7",
            ChordType::Sus4 => "sus4",
            ChordType::Sus2 => "sus2",
            ChordType::Diminished => "dim",
            ChordType::Augmented => "aug",
        }
    }

    /// Parse a chord type from its id or a common alias
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "maj" | "major" => Some(ChordType::Major),
            "min" | "minor" | "m" => Some(ChordType::Minor),
            "7" | "dom7" | "dominant7" => Some(ChordType::Dominant7),
            "maj7" | "major7" => Some(ChordType::Major7),
            "min7" | "minor7" | "m7" => Some(ChordType::Minor7),
            "sus4" | "sus" => Some(ChordType::Sus4),
            "sus2" => Some(ChordType::Sus2),
            "dim" | "diminished" => Some(ChordType::Diminished),
            "aug" | "augmented" | "+" => Some(ChordType::Augmented),
            _ => None,
        }
    }

    /// Next type in panel order, wrapping
    pub fn next(self) -> Self {
        let pos = ChordType::ALL.iter().position(|&t| t == self).unwrap_or(0);
        ChordType::ALL[(pos + 1) % ChordType::ALL.len()]
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A chord assignment: root, quality and the octave of its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    #[serde(rename = "type")]
    pub chord_type: ChordType,
    pub octave: Octave,
}

impl Chord {
    /// Create a chord
    pub fn new(root: PitchClass, chord_type: ChordType, octave: Octave) -> Self {
        Self {
            root,
            chord_type,
            octave,
        }
    }

    /// Pitches of this chord in close root position.
    ///
    /// Intervals that pass B roll into the next octave, so A min7 in octave 3
    /// is A3 C4 E4 G4. Notes that would land above the highest octave are
    /// left out.
    pub fn voicing(&self) -> Vec<Pitch> {
        let root = self.root.index();
        self.chord_type
            .intervals()
            .iter()
            .filter_map(|&interval| {
                let offset = root + interval;
                let octave = self.octave.checked_add((offset / 12) as Octave)?;
                Some(Pitch::new(PitchClass::from_index(offset % 12), octave))
            })
            .collect()
    }

    /// Compact label, e.g. "Cmaj" or "F#min7"
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.chord_type)
    }
}

/// Voicing lookup by name, for callers holding plain strings.
///
/// An unknown root or chord type, or an octave too high to hold the whole
/// voicing, is reported as an error so callers can skip the chord instead of
/// producing a partial voicing.
pub fn chord_voicing(root: &str, chord_type: &str, octave: Octave) -> Result<Vec<Pitch>, TheoryError> {
    let root = PitchClass::parse(root).ok_or_else(|| TheoryError::UnknownPitchClass(root.to_string()))?;
    let chord_type =
        ChordType::parse(chord_type).ok_or_else(|| TheoryError::UnknownChordType(chord_type.to_string()))?;
    let notes = Chord::new(root, chord_type, octave).voicing();
    if notes.len() < chord_type.intervals().len() {
        return Err(TheoryError::OctaveOutOfRange(octave));
    }
    Ok(notes)
}
