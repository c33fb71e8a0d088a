// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track model.
//!
//! A track is one instrument lane on the shared 16-step bar. Its payload
//! depends on the instrument kind: fixed drum rows, a chromatic grid over the
//! instrument's octave range, or chord zones.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use tracing::debug;

use super::zones::ChordZones;
use super::{StepRow, STEPS};
use crate::config::{max_view_base, InstrumentConfig, InstrumentKind, VIEW_OCTAVES};
use crate::music::{Chord, Octave, Pitch, PitchClass};

/// Track identifier, unique within a composition
pub type TrackId = u32;

/// One fixed row of a rhythm track
#[derive(Debug, Clone, PartialEq)]
pub struct DrumRow {
    /// Row label ("Kick")
    pub label: String,
    /// Pitch fired by every active step
    pub note: Pitch,
    /// Step on/off state
    pub steps: StepRow,
}

/// Drum rows in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmTrack {
    pub rows: Vec<DrumRow>,
}

impl RhythmTrack {
    /// Build the rows of a rhythm instrument, all steps off
    pub fn from_config(config: &InstrumentConfig) -> Self {
        let rows = config
            .drum_rows()
            .into_iter()
            .map(|row| DrumRow {
                label: row.label,
                note: row.note,
                steps: [false; STEPS],
            })
            .collect();
        Self { rows }
    }

    /// Row by label
    pub fn row(&self, label: &str) -> Option<&DrumRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Flip a step on the row with this label
    pub fn toggle(&mut self, label: &str, step: usize) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.label == label) else {
            return false;
        };
        match row.steps.get_mut(step) {
            Some(on) => {
                *on = !*on;
                true
            }
            None => false,
        }
    }

    /// Whether the row's step is on; unknown rows read as off
    pub fn is_on(&self, label: &str, step: usize) -> bool {
        self.row(label)
            .and_then(|r| r.steps.get(step).copied())
            .unwrap_or(false)
    }
}

/// Chromatic piano roll over the instrument's full octave range.
///
/// Only the boolean grid is musical state. The view window, the open
/// accordion octave and the chord stamps exist for the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct MelodicTrack {
    grid: BTreeMap<Pitch, StepRow>,
    low: Octave,
    high: Octave,
    view_base: Octave,
    open_octave: Option<Octave>,
    stamps: [Option<Chord>; STEPS],
}

impl MelodicTrack {
    /// Empty grid over `low..=high` with the view window starting at `view_base`
    pub fn new(low: Octave, high: Octave, view_base: Octave) -> Self {
        let (low, high) = (low.min(high), low.max(high));
        let mut grid = BTreeMap::new();
        for octave in low..=high {
            for class in PitchClass::ALL {
                grid.insert(Pitch::new(class, octave), [false; STEPS]);
            }
        }
        let view_base = view_base.clamp(low, max_view_base(low, high));
        Self {
            grid,
            low,
            high,
            view_base,
            open_octave: Some(view_base.saturating_add(1).min(high)),
            stamps: [None; STEPS],
        }
    }

    pub fn from_config(config: &InstrumentConfig) -> Self {
        let [low, high] = config.octaves;
        Self::new(low, high, config.view_base)
    }

    /// Stored octave range
    pub fn octave_range(&self) -> RangeInclusive<Octave> {
        self.low..=self.high
    }

    /// Whether a pitch is inside the stored range
    pub fn contains(&self, pitch: Pitch) -> bool {
        self.grid.contains_key(&pitch)
    }

    /// Steps of one pitch
    pub fn row(&self, pitch: Pitch) -> Option<&StepRow> {
        self.grid.get(&pitch)
    }

    /// Flip one cell. Pitches outside the range are ignored.
    pub fn toggle(&mut self, pitch: Pitch, step: usize) -> bool {
        match self.grid.get_mut(&pitch).and_then(|row| row.get_mut(step)) {
            Some(on) => {
                *on = !*on;
                true
            }
            None => false,
        }
    }

    pub fn is_on(&self, pitch: Pitch, step: usize) -> bool {
        self.grid
            .get(&pitch)
            .and_then(|row| row.get(step).copied())
            .unwrap_or(false)
    }

    /// Every pitch switched on at a step, lowest first
    pub fn pitches_at(&self, step: usize) -> Vec<Pitch> {
        if step >= STEPS {
            return Vec::new();
        }
        self.grid
            .iter()
            .filter(|(_, row)| row[step])
            .map(|(pitch, _)| *pitch)
            .collect()
    }

    /// Octaves currently shown by the editor
    pub fn view_octaves(&self) -> RangeInclusive<Octave> {
        self.view_base..=self.view_base.saturating_add(VIEW_OCTAVES - 1).min(self.high)
    }

    pub fn view_base(&self) -> Octave {
        self.view_base
    }

    /// Shift the view window by `delta` octaves, clamped to the range.
    ///
    /// Returns false when the window is already at the limit. An open
    /// octave that scrolls out of view is closed.
    pub fn shift_view(&mut self, delta: Octave) -> bool {
        let base = self
            .view_base
            .saturating_add(delta)
            .clamp(self.low, max_view_base(self.low, self.high));
        if base == self.view_base {
            return false;
        }
        self.view_base = base;
        if let Some(open) = self.open_octave {
            if !self.view_octaves().contains(&open) {
                self.open_octave = None;
            }
        }
        true
    }

    /// Octave whose accordion section is expanded
    pub fn open_octave(&self) -> Option<Octave> {
        self.open_octave
    }

    /// Expand an octave, or collapse it if it is already open
    pub fn toggle_open_octave(&mut self, octave: Octave) -> bool {
        if !self.view_octaves().contains(&octave) {
            return false;
        }
        self.open_octave = if self.open_octave == Some(octave) {
            None
        } else {
            Some(octave)
        };
        true
    }

    /// Replace a step's notes with a chord voicing.
    ///
    /// Voicing pitches outside the range are skipped.
    pub fn stamp_chord(&mut self, step: usize, chord: Chord) -> bool {
        if step >= STEPS {
            return false;
        }
        for row in self.grid.values_mut() {
            row[step] = false;
        }
        for pitch in chord.voicing() {
            if let Some(row) = self.grid.get_mut(&pitch) {
                row[step] = true;
            } else {
                debug!(%pitch, step, "stamp skipped pitch outside range");
            }
        }
        self.stamps[step] = Some(chord);
        true
    }

    /// Switch off a stamped voicing and forget the stamp
    pub fn clear_stamp(&mut self, step: usize) -> bool {
        let Some(chord) = self.stamps.get_mut(step).and_then(Option::take) else {
            return false;
        };
        for pitch in chord.voicing() {
            if let Some(row) = self.grid.get_mut(&pitch) {
                row[step] = false;
            }
        }
        true
    }

    /// Stamp `chord`, or clear the step if that chord is already stamped there
    pub fn toggle_stamp(&mut self, step: usize, chord: Chord) -> bool {
        if self.stamp_at(step) == Some(chord) {
            self.clear_stamp(step)
        } else {
            self.stamp_chord(step, chord)
        }
    }

    /// Chord stamped at a step, if any
    pub fn stamp_at(&self, step: usize) -> Option<Chord> {
        self.stamps.get(step).copied().flatten()
    }
}

/// Variant payload of a track
#[derive(Debug, Clone, PartialEq)]
pub enum TrackKind {
    Rhythm(RhythmTrack),
    Melodic(MelodicTrack),
    Chord(ChordZones),
}

/// One instrument lane
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique id
    pub id: TrackId,
    /// Catalog instrument id
    pub instrument: String,
    /// Instrument that sounds this track's events
    pub voice: String,
    /// Variant payload
    pub kind: TrackKind,
}

impl Track {
    /// Build an empty track for a catalog instrument
    pub fn from_config(id: TrackId, config: &InstrumentConfig) -> Self {
        let kind = match config.kind {
            InstrumentKind::Rhythm => TrackKind::Rhythm(RhythmTrack::from_config(config)),
            InstrumentKind::Melody => TrackKind::Melodic(MelodicTrack::from_config(config)),
            InstrumentKind::Chord => TrackKind::Chord(ChordZones::new()),
        };
        Self {
            id,
            instrument: config.id.clone(),
            voice: config.voice().to_string(),
            kind,
        }
    }

    /// Flip a step on a lane: a row label for rhythm tracks, a pitch name
    /// ("C#4") for melodic tracks. Chord tracks have no lanes.
    pub fn toggle_step(&mut self, lane: &str, step: usize) -> bool {
        let toggled = match &mut self.kind {
            TrackKind::Rhythm(rhythm) => rhythm.toggle(lane, step),
            TrackKind::Melodic(melodic) => {
                Pitch::parse(lane).is_some_and(|pitch| melodic.toggle(pitch, step))
            }
            TrackKind::Chord(_) => false,
        };
        if !toggled {
            debug!(track = self.id, lane, step, "toggle ignored");
        }
        toggled
    }

    pub fn as_rhythm(&self) -> Option<&RhythmTrack> {
        match &self.kind {
            TrackKind::Rhythm(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_rhythm_mut(&mut self) -> Option<&mut RhythmTrack> {
        match &mut self.kind {
            TrackKind::Rhythm(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_melodic(&self) -> Option<&MelodicTrack> {
        match &self.kind {
            TrackKind::Melodic(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_melodic_mut(&mut self) -> Option<&mut MelodicTrack> {
        match &mut self.kind {
            TrackKind::Melodic(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_chord(&self) -> Option<&ChordZones> {
        match &self.kind {
            TrackKind::Chord(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_chord_mut(&mut self) -> Option<&mut ChordZones> {
        match &mut self.kind {
            TrackKind::Chord(z) => Some(z),
            _ => None,
        }
    }
}
