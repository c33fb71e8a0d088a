// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Composition state: the ordered track list and the selected track.
//!
//! List order is display order only; every track plays at once.

use thiserror::Error;
use tracing::info;

use super::score::{compile_score, Score};
use super::track::{Track, TrackId};
use super::StepRow;
use crate::config::InstrumentCatalog;

/// Composition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),
}

/// All tracks of the session
#[derive(Debug, Clone, Default)]
pub struct Composition {
    tracks: Vec<Track>,
    next_id: TrackId,
    selected: Option<TrackId>,
}

impl Composition {
    /// Empty composition
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty track for `instrument` and select it
    pub fn create_track(
        &mut self,
        catalog: &InstrumentCatalog,
        instrument: &str,
    ) -> Result<TrackId, CompositionError> {
        let config = catalog
            .get(instrument)
            .ok_or_else(|| CompositionError::UnknownInstrument(instrument.to_string()))?;

        self.next_id += 1;
        let id = self.next_id;
        self.tracks.push(Track::from_config(id, config));
        self.selected = Some(id);

        info!(id, instrument, "created track");
        Ok(id)
    }

    /// Remove a track. If it was selected, the last remaining track is
    /// selected instead, or nothing when the list is empty.
    pub fn delete_track(&mut self, id: TrackId) -> bool {
        let Some(index) = self.tracks.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tracks.remove(index);
        if self.selected == Some(id) {
            self.selected = self.tracks.last().map(|t| t.id);
        }

        info!(id, "deleted track");
        true
    }

    /// Select a track by id; unknown ids are ignored
    pub fn select_track(&mut self, id: TrackId) -> bool {
        if self.track(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Move the selection to the next (or previous) track, wrapping
    pub fn cycle_selection(&mut self, forward: bool) -> bool {
        let len = self.tracks.len();
        if len == 0 {
            return false;
        }
        let current = self
            .selected
            .and_then(|id| self.tracks.iter().position(|t| t.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.selected = Some(self.tracks[next].id);
        true
    }

    pub fn selected_id(&self) -> Option<TrackId> {
        self.selected
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected.and_then(|id| self.track(id))
    }

    pub fn selected_track_mut(&mut self) -> Option<&mut Track> {
        let id = self.selected?;
        self.track_mut(id)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Tracks in display order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Flip a step on a track lane; unknown tracks are ignored
    pub fn toggle_step(&mut self, id: TrackId, lane: &str, step: usize) -> bool {
        self.track_mut(id)
            .is_some_and(|track| track.toggle_step(lane, step))
    }

    /// Every drum row of every rhythm track, for the chord panel's overview
    pub fn rhythm_reference(&self) -> Vec<(&str, &StepRow)> {
        self.tracks
            .iter()
            .filter_map(Track::as_rhythm)
            .flat_map(|rhythm| rhythm.rows.iter())
            .map(|row| (row.label.as_str(), &row.steps))
            .collect()
    }

    /// Compile every track into a score
    pub fn compile(&self) -> Score {
        compile_score(&self.tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InstrumentCatalog {
        InstrumentCatalog::builtin()
    }

    #[test]
    fn test_create_selects_new_track() {
        let catalog = catalog();
        let mut comp = Composition::new();
        assert_eq!(comp.selected_id(), None);

        let a = comp.create_track(&catalog, "drums").unwrap();
        let b = comp.create_track(&catalog, "piano").unwrap();
        assert!(b > a);
        assert_eq!(comp.selected_id(), Some(b));
        assert_eq!(comp.len(), 2);
        assert_eq!(comp.tracks()[0].id, a);
    }

    #[test]
    fn test_create_unknown_instrument() {
        let mut comp = Composition::new();
        assert_eq!(
            comp.create_track(&catalog(), "kazoo"),
            Err(CompositionError::UnknownInstrument("kazoo".to_string()))
        );
        assert!(comp.is_empty());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let catalog = catalog();
        let mut comp = Composition::new();
        let a = comp.create_track(&catalog, "drums").unwrap();
        comp.delete_track(a);
        let b = comp.create_track(&catalog, "drums").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_delete_reselects_last() {
        let catalog = catalog();
        let mut comp = Composition::new();
        let a = comp.create_track(&catalog, "drums").unwrap();
        let b = comp.create_track(&catalog, "piano").unwrap();
        let c = comp.create_track(&catalog, "bass").unwrap();

        assert!(comp.select_track(b));
        assert!(comp.delete_track(b));
        assert_eq!(comp.selected_id(), Some(c));

        // deleting an unselected track keeps the selection
        assert!(comp.delete_track(a));
        assert_eq!(comp.selected_id(), Some(c));

        assert!(comp.delete_track(c));
        assert_eq!(comp.selected_id(), None);
        assert!(!comp.delete_track(c));
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let catalog = catalog();
        let mut comp = Composition::new();
        let a = comp.create_track(&catalog, "drums").unwrap();
        assert!(!comp.select_track(99));
        assert_eq!(comp.selected_id(), Some(a));
    }

    #[test]
    fn test_cycle_selection_wraps() {
        let catalog = catalog();
        let mut comp = Composition::new();
        assert!(!comp.cycle_selection(true));

        let a = comp.create_track(&catalog, "drums").unwrap();
        let b = comp.create_track(&catalog, "piano").unwrap();
        assert!(comp.cycle_selection(true));
        assert_eq!(comp.selected_id(), Some(a));
        assert!(comp.cycle_selection(false));
        assert_eq!(comp.selected_id(), Some(b));
    }

    #[test]
    fn test_toggle_step_routes_to_track() {
        let catalog = catalog();
        let mut comp = Composition::new();
        let drums = comp.create_track(&catalog, "drums").unwrap();
        assert!(comp.toggle_step(drums, "Snare", 4));
        assert!(!comp.toggle_step(42, "Snare", 4));
        assert!(comp.track(drums).unwrap().as_rhythm().unwrap().is_on("Snare", 4));
    }

    #[test]
    fn test_rhythm_reference_collects_all_rows() {
        let catalog = catalog();
        let mut comp = Composition::new();
        let d1 = comp.create_track(&catalog, "drums").unwrap();
        comp.create_track(&catalog, "piano").unwrap();
        comp.create_track(&catalog, "drums").unwrap();
        comp.toggle_step(d1, "HiHat", 2);

        let reference = comp.rhythm_reference();
        assert_eq!(reference.len(), 8);
        let (label, steps) = reference[2];
        assert_eq!(label, "HiHat");
        assert!(steps[2]);
    }
}
