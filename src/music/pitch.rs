// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and octave-qualified pitches.
//!
//! A `Pitch` is written the way the sampler expects it: chromatic name
//! followed by the octave number (`"C#4"`).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Octave number as used in pitch names (`C4` is middle C)
pub type Octave = i8;

/// The twelve chromatic pitch classes, named with sharps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Chromatic index (0-11)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class at a chromatic index, wrapping past B
    pub fn from_index(index: u8) -> Self {
        PitchClass::ALL[(index % 12) as usize]
    }

    /// Canonical name with sharps
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a pitch class ("C", "C#", "Cs", "Db")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" => Some(PitchClass::C),
            "C#" | "CS" | "DB" => Some(PitchClass::Cs),
            "D" => Some(PitchClass::D),
            "D#" | "DS" | "EB" => Some(PitchClass::Ds),
            "E" | "FB" => Some(PitchClass::E),
            "F" | "E#" => Some(PitchClass::F),
            "F#" | "FS" | "GB" => Some(PitchClass::Fs),
            "G" => Some(PitchClass::G),
            "G#" | "GS" | "AB" => Some(PitchClass::Gs),
            "A" => Some(PitchClass::A),
            "A#" | "AS" | "BB" => Some(PitchClass::As),
            "B" | "CB" => Some(PitchClass::B),
            _ => None,
        }
    }

    /// Whether this class sits on a black piano key
    pub fn is_black_key(self) -> bool {
        matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pitch class in a specific octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: Octave,
}

impl Pitch {
    /// Create a pitch
    pub fn new(class: PitchClass, octave: Octave) -> Self {
        Self { class, octave }
    }

    /// Parse a pitch name such as "C4", "F#1" or "Bb-1"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit() || c == '-')?;
        if split == 0 {
            return None;
        }
        let class = PitchClass::parse(&s[..split])?;
        let octave = s[split..].parse::<Octave>().ok()?;
        Some(Self { class, octave })
    }

    /// Semitones from C0, used for ordering and distance
    pub fn semitone(self) -> i16 {
        self.octave as i16 * 12 + self.class.index() as i16
    }
}

impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semitone().cmp(&other.semitone())
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pitch::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid pitch: {s}")))
    }
}
