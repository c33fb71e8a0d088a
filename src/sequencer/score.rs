// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Score compilation.
//!
//! Flattens every track into sixteen slots of events. This is the whole
//! contract with the playback engine: a slot is either empty or a list of
//! `{instrument, notes, duration?}` entries.

use serde::{Deserialize, Serialize};

use super::track::{Track, TrackKind};
use super::{active_steps, STEPS};
use crate::music::Pitch;

/// A single pitch or a set of pitches sounded together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Notes {
    Single(Pitch),
    Chord(Vec<Pitch>),
}

impl Notes {
    /// Collapse a one-element set to a single pitch
    pub fn from_pitches(mut pitches: Vec<Pitch>) -> Self {
        if pitches.len() == 1 {
            Notes::Single(pitches.remove(0))
        } else {
            Notes::Chord(pitches)
        }
    }

    pub fn as_slice(&self) -> &[Pitch] {
        match self {
            Notes::Single(p) => std::slice::from_ref(p),
            Notes::Chord(ps) => ps,
        }
    }
}

/// One sound at one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Instrument id that plays the notes
    pub instrument: String,
    pub notes: Notes,
    /// Note length token ("8n"); the engine default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl ScoreEvent {
    pub fn new(instrument: impl Into<String>, notes: Notes) -> Self {
        Self {
            instrument: instrument.into(),
            notes,
            duration: None,
        }
    }
}

/// Sixteen slots, one per step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score {
    steps: [Option<Vec<ScoreEvent>>; STEPS],
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    /// All slots empty
    pub fn new() -> Self {
        Self {
            steps: Default::default(),
        }
    }

    /// Events at a step; empty slots and out-of-range steps give `None`
    pub fn step(&self, step: usize) -> Option<&[ScoreEvent]> {
        self.steps.get(step).and_then(|slot| slot.as_deref())
    }

    /// Whether every slot is empty
    pub fn is_silent(&self) -> bool {
        self.steps.iter().all(Option::is_none)
    }

    /// Append an event to a step's slot
    pub fn push(&mut self, step: usize, event: ScoreEvent) {
        if let Some(slot) = self.steps.get_mut(step) {
            slot.get_or_insert_with(Vec::new).push(event);
        }
    }

    /// Every event with its step, in step order
    pub fn events(&self) -> impl Iterator<Item = (usize, &ScoreEvent)> {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(step, slot)| slot.as_ref().map(|events| (step, events)))
            .flat_map(|(step, events)| events.iter().map(move |e| (step, e)))
    }
}

/// Compile tracks into a score.
///
/// Within a slot, events follow track order, and rhythm rows follow row
/// order. Chord tracks sound their voicing at every trigger step where a
/// chord is in effect.
pub fn compile_score(tracks: &[Track]) -> Score {
    let mut score = Score::new();

    for track in tracks {
        match &track.kind {
            TrackKind::Rhythm(rhythm) => {
                for row in &rhythm.rows {
                    for step in active_steps(&row.steps) {
                        score.push(step, ScoreEvent::new(&track.voice, Notes::Single(row.note)));
                    }
                }
            }
            TrackKind::Melodic(melodic) => {
                for step in 0..STEPS {
                    let pitches = melodic.pitches_at(step);
                    if !pitches.is_empty() {
                        score.push(step, ScoreEvent::new(&track.voice, Notes::from_pitches(pitches)));
                    }
                }
            }
            TrackKind::Chord(zones) => {
                for (step, chord) in zones.triggered_chords() {
                    score.push(step, ScoreEvent::new(&track.voice, Notes::Chord(chord.voicing())));
                }
            }
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstrumentCatalog;
    use crate::music::{Chord, ChordType, PitchClass};
    use crate::sequencer::Composition;

    fn pitch(s: &str) -> Pitch {
        Pitch::parse(s).unwrap()
    }

    #[test]
    fn test_empty_composition_is_silent() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        for inst in catalog.iter() {
            comp.create_track(&catalog, &inst.id).unwrap();
        }
        let score = comp.compile();
        assert!(score.is_silent());
        assert!((0..STEPS).all(|s| score.step(s).is_none()));
    }

    #[test]
    fn test_rhythm_rows_in_order() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        let drums = comp.create_track(&catalog, "drums").unwrap();
        comp.toggle_step(drums, "HiHat", 0);
        comp.toggle_step(drums, "Kick", 0);

        let score = comp.compile();
        let events = score.step(0).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].notes, Notes::Single(pitch("C1")));
        assert_eq!(events[1].notes, Notes::Single(pitch("F#1")));
        assert_eq!(events[0].instrument, "drums");
    }

    #[test]
    fn test_melodic_singleton_collapses() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        let piano = comp.create_track(&catalog, "piano").unwrap();
        comp.toggle_step(piano, "E4", 3);
        comp.toggle_step(piano, "C4", 3);
        comp.toggle_step(piano, "A2", 7);

        let score = comp.compile();
        assert_eq!(
            score.step(3).unwrap()[0].notes,
            Notes::Chord(vec![pitch("C4"), pitch("E4")])
        );
        assert_eq!(score.step(7).unwrap()[0].notes, Notes::Single(pitch("A2")));
    }

    #[test]
    fn test_chord_track_uses_voice() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        let id = comp.create_track(&catalog, "chord").unwrap();
        let zones = comp.track_mut(id).unwrap().as_chord_mut().unwrap();
        zones.apply_chord(0, Chord::new(PitchClass::A, ChordType::Minor, 3));
        zones.toggle_sound_step(2);
        zones.toggle_sound_step(16);

        let score = comp.compile();
        let event = &score.step(2).unwrap()[0];
        assert_eq!(event.instrument, "piano");
        assert_eq!(
            event.notes.as_slice(),
            &[pitch("A3"), pitch("C4"), pitch("E4")]
        );
        assert_eq!(score.events().count(), 1);
    }

    #[test]
    fn test_trigger_without_chord_is_silent() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        let id = comp.create_track(&catalog, "chord").unwrap();
        comp.track_mut(id).unwrap().as_chord_mut().unwrap().toggle_sound_step(0);
        assert!(comp.compile().is_silent());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let catalog = InstrumentCatalog::builtin();
        let mut comp = Composition::new();
        let piano = comp.create_track(&catalog, "piano").unwrap();
        comp.toggle_step(piano, "G3", 1);
        assert_eq!(comp.compile(), comp.compile());
    }

    #[test]
    fn test_score_yaml_shape() {
        let mut score = Score::new();
        score.push(0, ScoreEvent::new("drums", Notes::Single(pitch("C1"))));
        let mut chord = ScoreEvent::new("piano", Notes::Chord(vec![pitch("C4"), pitch("E4")]));
        chord.duration = Some("8n".to_string());
        score.push(1, chord);

        let yaml = serde_yaml::to_string(&score).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        let slots = value.as_sequence().unwrap();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0][0]["notes"].as_str(), Some("C1"));
        assert!(slots[0][0].get("duration").is_none());
        assert_eq!(slots[1][0]["notes"][1].as_str(), Some("E4"));
        assert_eq!(slots[1][0]["duration"].as_str(), Some("8n"));
        assert!(slots[2].is_null());

        let back: Score = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, score);
    }
}
