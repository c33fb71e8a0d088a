// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord zones for chord tracks.
//!
//! The bar is partitioned by a sorted list of dividers, always starting at
//! step 0. Each divider opens a zone that runs up to the next divider (or the
//! end of the bar). A chord applied to a zone is written at the zone's start
//! step only; the chord heard at any step is the last chord written at or
//! before it, so a zone without its own chord carries on the chord of the
//! zone before it.
//!
//! Applying a chord, splitting an unassigned zone and deleting a divider
//! also clear the chord map inside the affected zone, so the only chord
//! written within a zone is the one at its start and every step of a zone
//! always resolves to the same chord.
//!
//! Trigger steps are independent of the zones: a set trigger sounds
//! whatever chord is in effect at that step.
//!
//! Every editing operation returns `false` and leaves the state untouched
//! when its preconditions are not met.

use tracing::debug;

use super::{StepRow, STEPS};
use crate::music::Chord;

/// Direction for moving a divider by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A derived zone: inclusive step range and the chord in effect at its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    /// First step (a divider position)
    pub start: usize,
    /// Last step, inclusive
    pub end: usize,
    /// Chord heard in this zone, if any
    pub chord: Option<Chord>,
}

impl Zone {
    /// Number of steps in the zone
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether a step falls inside this zone
    pub fn contains(&self, step: usize) -> bool {
        step >= self.start && step <= self.end
    }
}

/// Zone partition, chord assignments and trigger steps of one chord track
#[derive(Debug, Clone, PartialEq)]
pub struct ChordZones {
    /// Zone start positions, strictly increasing, first is always 0
    dividers: Vec<usize>,
    /// Chords written at zone starts
    chord_map: [Option<Chord>; STEPS],
    /// Steps that sound the chord in effect
    sound_steps: StepRow,
    /// Divider currently selected in the editor
    selected: Option<usize>,
}

impl Default for ChordZones {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordZones {
    /// One zone spanning the whole bar, no chords, no triggers
    pub fn new() -> Self {
        Self {
            dividers: vec![0],
            chord_map: [None; STEPS],
            sound_steps: [false; STEPS],
            selected: None,
        }
    }

    /// Zone start positions
    pub fn dividers(&self) -> &[usize] {
        &self.dividers
    }

    /// Whether `pos` is a zone start
    pub fn is_divider(&self, pos: usize) -> bool {
        self.dividers.binary_search(&pos).is_ok()
    }

    /// Raw chord assignments, indexed by step
    pub fn chord_map(&self) -> &[Option<Chord>; STEPS] {
        &self.chord_map
    }

    /// Trigger steps
    pub fn sound_steps(&self) -> &StepRow {
        &self.sound_steps
    }

    /// Currently selected divider position
    pub fn selected_divider(&self) -> Option<usize> {
        self.selected
    }

    /// Index into `dividers` of the zone starting at `start`
    fn zone_index(&self, start: usize) -> Option<usize> {
        self.dividers.binary_search(&start).ok()
    }

    /// Exclusive end of the zone at `index`
    fn zone_end(&self, index: usize) -> usize {
        self.dividers.get(index + 1).copied().unwrap_or(STEPS)
    }

    fn zone_at(&self, index: usize) -> Zone {
        let start = self.dividers[index];
        Zone {
            start,
            end: self.zone_end(index) - 1,
            chord: self.resolve_chord_at(start),
        }
    }

    /// All zones in step order
    pub fn zones(&self) -> Vec<Zone> {
        (0..self.dividers.len()).map(|i| self.zone_at(i)).collect()
    }

    /// The zone a step belongs to
    pub fn zone_containing(&self, step: usize) -> Option<Zone> {
        if step >= STEPS {
            return None;
        }
        let index = match self.dividers.binary_search(&step) {
            Ok(i) => i,
            // dividers[0] == 0, so a miss always lands after it
            Err(i) => i - 1,
        };
        Some(self.zone_at(index))
    }

    /// Chord in effect at a step: the last chord written at or before it
    pub fn resolve_chord_at(&self, step: usize) -> Option<Chord> {
        if step >= STEPS {
            return None;
        }
        self.chord_map[..=step].iter().rev().find_map(|slot| *slot)
    }

    /// Assign a chord to the zone starting at `zone_start`.
    ///
    /// Stale assignments inside the zone are dropped so the new chord covers
    /// the whole zone.
    pub fn apply_chord(&mut self, zone_start: usize, chord: Chord) -> bool {
        let Some(index) = self.zone_index(zone_start) else {
            debug!(zone_start, "apply rejected: not a zone start");
            return false;
        };
        let end = self.zone_end(index);
        self.chord_map[zone_start] = Some(chord);
        self.chord_map[zone_start + 1..end].fill(None);
        true
    }

    /// Remove the zone's own chord so it carries on the previous zone's chord
    pub fn clear_zone_chord(&mut self, zone_start: usize) -> bool {
        let Some(index) = self.zone_index(zone_start) else {
            debug!(zone_start, "clear rejected: not a zone start");
            return false;
        };
        let end = self.zone_end(index);
        self.chord_map[zone_start..end].fill(None);
        true
    }

    /// Insert a divider `offset` steps into the zone starting at `zone_start`.
    ///
    /// The offset must land strictly inside the zone. The new right-hand zone
    /// has no chord of its own and keeps sounding the parent's chord until one
    /// is applied.
    pub fn split_zone(&mut self, zone_start: usize, offset: usize) -> bool {
        let Some(index) = self.zone_index(zone_start) else {
            debug!(zone_start, "split rejected: not a zone start");
            return false;
        };
        let end = self.zone_end(index);
        let pos = zone_start + offset;
        if offset == 0 || pos >= end {
            debug!(zone_start, offset, "split rejected: offset outside zone interior");
            return false;
        }
        // Interior entries only ever repeat the zone start's chord. When the
        // new start has none, drop them so it keeps inheriting as one unit.
        if self.chord_map[pos].is_none() {
            self.chord_map[pos + 1..end].fill(None);
        }
        self.dividers.insert(index + 1, pos);
        true
    }

    /// Split a zone at the step nearest to `fraction` of its length.
    ///
    /// The offset is rounded to the nearest step and clamped so the split
    /// never lands on either edge; zones of one step cannot be split.
    pub fn split_at_fraction(&mut self, zone_start: usize, fraction: f64) -> bool {
        let Some(index) = self.zone_index(zone_start) else {
            return false;
        };
        let len = self.zone_end(index) - zone_start;
        if len < 2 || !fraction.is_finite() {
            return false;
        }
        let offset = (fraction * len as f64).round().clamp(1.0, (len - 1) as f64) as usize;
        self.split_zone(zone_start, offset)
    }

    /// Move a divider one step left or right.
    ///
    /// The first divider never moves, and a divider cannot reach or pass its
    /// neighbours. The divider's own chord travels with it. Moving right
    /// also backfills the vacated step with the chord written just before it,
    /// so that step keeps sounding the left zone's chord.
    pub fn move_divider(&mut self, pos: usize, direction: Direction) -> bool {
        let Some(index) = self.zone_index(pos).filter(|&i| i > 0) else {
            debug!(pos, ?direction, "move rejected: not a movable divider");
            return false;
        };
        let prev = self.dividers[index - 1];
        let next = self.zone_end(index);
        let new_pos = match direction {
            Direction::Left => pos - 1,
            Direction::Right => pos + 1,
        };
        if new_pos <= prev || new_pos >= next {
            debug!(pos, ?direction, "move rejected: would collide with a neighbour");
            return false;
        }

        self.chord_map[new_pos] = self.chord_map[pos];
        if direction == Direction::Right {
            self.chord_map[pos] = self.chord_map[pos - 1];
        }
        self.dividers[index] = new_pos;

        if self.selected == Some(pos) {
            self.selected = Some(new_pos);
        }
        true
    }

    /// Remove a divider, merging its zone into the zone on its left.
    ///
    /// Chords written inside the absorbed range are dropped so the merged
    /// zone sounds the left zone's chord throughout.
    pub fn delete_divider(&mut self, pos: usize) -> bool {
        let Some(index) = self.zone_index(pos).filter(|&i| i > 0) else {
            debug!(pos, "delete rejected: not a removable divider");
            return false;
        };
        let end = self.zone_end(index);
        self.chord_map[pos..end].fill(None);
        self.dividers.remove(index);

        if self.selected == Some(pos) {
            self.selected = None;
        }
        true
    }

    /// Back to one empty zone. Trigger steps are kept.
    pub fn clear_all(&mut self) {
        self.dividers = vec![0];
        self.chord_map = [None; STEPS];
        self.selected = None;
    }

    /// Flip a trigger step
    pub fn toggle_sound_step(&mut self, step: usize) -> bool {
        match self.sound_steps.get_mut(step) {
            Some(on) => {
                *on = !*on;
                true
            }
            None => false,
        }
    }

    /// Select the divider at `pos`
    pub fn select_divider(&mut self, pos: usize) -> bool {
        if !self.is_divider(pos) {
            return false;
        }
        self.selected = Some(pos);
        true
    }

    /// Clear the divider selection
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Trigger steps paired with the chord they sound; silent triggers are skipped
    pub fn triggered_chords(&self) -> impl Iterator<Item = (usize, Chord)> + '_ {
        self.sound_steps
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .filter_map(|(step, _)| self.resolve_chord_at(step).map(|chord| (step, chord)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{ChordType, PitchClass};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn c_major() -> Chord {
        Chord::new(PitchClass::C, ChordType::Major, 4)
    }

    fn a_minor() -> Chord {
        Chord::new(PitchClass::A, ChordType::Minor, 3)
    }

    fn f_major() -> Chord {
        Chord::new(PitchClass::F, ChordType::Major, 3)
    }

    fn resolutions(zones: &ChordZones) -> Vec<Option<Chord>> {
        (0..STEPS).map(|s| zones.resolve_chord_at(s)).collect()
    }

    fn assert_dividers_valid(zones: &ChordZones) {
        let d = zones.dividers();
        assert_eq!(d[0], 0);
        assert!(d.windows(2).all(|w| w[0] < w[1]), "dividers not increasing: {:?}", d);
        assert!(d.iter().all(|&p| p < STEPS));
    }

    #[test]
    fn test_new_is_single_empty_zone() {
        let zones = ChordZones::new();
        assert_eq!(zones.dividers(), &[0]);
        let all = zones.zones();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].start, 0);
        assert_eq!(all[0].end, 15);
        assert_eq!(all[0].len(), 16);
        assert!(resolutions(&zones).iter().all(Option::is_none));
    }

    #[test]
    fn test_apply_requires_zone_start() {
        let mut zones = ChordZones::new();
        assert!(!zones.apply_chord(3, c_major()));
        assert!(zones.apply_chord(0, c_major()));
        assert_eq!(zones.chord_map()[0], Some(c_major()));
        assert!(zones.chord_map()[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_split_then_resolve_inherits() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        assert!(zones.split_zone(0, 8));
        assert_eq!(zones.dividers(), &[0, 8]);
        assert_eq!(zones.chord_map()[8], None);
        for step in 0..STEPS {
            assert_eq!(zones.resolve_chord_at(step), Some(c_major()));
        }
    }

    #[test]
    fn test_reassign_after_split() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 8);
        assert!(zones.apply_chord(8, a_minor()));
        for step in 0..8 {
            assert_eq!(zones.resolve_chord_at(step), Some(c_major()));
        }
        for step in 8..STEPS {
            assert_eq!(zones.resolve_chord_at(step), Some(a_minor()));
        }
    }

    #[test]
    fn test_split_bounds() {
        let mut zones = ChordZones::new();
        assert!(!zones.split_zone(0, 0));
        assert!(!zones.split_zone(0, 16));
        assert!(!zones.split_zone(5, 1));
        assert!(zones.split_zone(0, 15));
        // zone [15, 15] has length 1
        assert!(!zones.split_zone(15, 1));
        assert!(zones.split_zone(0, 4));
        // 4 + 11 == 15 is the next divider
        assert!(!zones.split_zone(4, 11));
        assert_eq!(zones.dividers(), &[0, 4, 15]);
    }

    #[test]
    fn test_split_at_fraction() {
        let mut zones = ChordZones::new();
        assert!(zones.split_at_fraction(0, 0.5));
        assert_eq!(zones.dividers(), &[0, 8]);

        // clamped to the interior
        assert!(zones.split_at_fraction(8, 0.0));
        assert_eq!(zones.dividers(), &[0, 8, 9]);
        assert!(zones.split_at_fraction(9, 1.0));
        assert_eq!(zones.dividers(), &[0, 8, 9, 15]);

        // 0.3 * 8 = 2.4 rounds to 2
        assert!(zones.split_at_fraction(0, 0.3));
        assert_eq!(zones.dividers(), &[0, 2, 8, 9, 15]);

        assert!(!zones.split_at_fraction(8, 0.5));
        assert!(!zones.split_at_fraction(0, f64::NAN));
    }

    #[test]
    fn test_first_divider_is_fixed() {
        let mut zones = ChordZones::new();
        assert!(!zones.move_divider(0, Direction::Right));
        assert!(!zones.move_divider(0, Direction::Left));
        assert!(!zones.delete_divider(0));
        assert_eq!(zones.dividers(), &[0]);
    }

    #[test]
    fn test_move_cannot_reach_neighbours() {
        let mut zones = ChordZones::new();
        zones.split_zone(0, 4);
        zones.split_zone(4, 1);
        assert_eq!(zones.dividers(), &[0, 4, 5]);
        assert!(!zones.move_divider(4, Direction::Right));
        assert!(!zones.move_divider(5, Direction::Left));
        assert!(zones.move_divider(4, Direction::Left));
        assert_eq!(zones.dividers(), &[0, 3, 5]);

        zones.split_zone(5, 10);
        assert_eq!(zones.dividers(), &[0, 3, 5, 15]);
        assert!(!zones.move_divider(15, Direction::Right));
        assert!(!zones.move_divider(7, Direction::Left));
    }

    #[test]
    fn test_move_left_carries_chord() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 8);
        zones.apply_chord(8, a_minor());

        assert!(zones.move_divider(8, Direction::Left));
        assert_eq!(zones.dividers(), &[0, 7]);
        assert_eq!(zones.chord_map()[7], Some(a_minor()));
        for step in 0..7 {
            assert_eq!(zones.resolve_chord_at(step), Some(c_major()));
        }
        for step in 7..STEPS {
            assert_eq!(zones.resolve_chord_at(step), Some(a_minor()));
        }
    }

    #[test]
    fn test_move_right_backfills_left_zone() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 8);
        zones.apply_chord(8, a_minor());

        assert!(zones.move_divider(8, Direction::Right));
        assert_eq!(zones.dividers(), &[0, 9]);
        assert_eq!(zones.chord_map()[9], Some(a_minor()));
        for step in 0..9 {
            assert_eq!(zones.resolve_chord_at(step), Some(c_major()));
        }
        for step in 9..STEPS {
            assert_eq!(zones.resolve_chord_at(step), Some(a_minor()));
        }
    }

    #[test]
    fn test_move_right_after_one_step_zone() {
        // left zone is a single step with its own chord: the backfill copies it
        let mut zones = ChordZones::new();
        zones.split_zone(0, 4);
        zones.split_zone(4, 1);
        zones.apply_chord(4, f_major());
        zones.apply_chord(5, a_minor());

        assert!(zones.move_divider(5, Direction::Right));
        assert_eq!(zones.dividers(), &[0, 4, 6]);
        assert_eq!(zones.chord_map()[5], Some(f_major()));
        assert_eq!(zones.resolve_chord_at(5), Some(f_major()));
        assert_eq!(zones.resolve_chord_at(6), Some(a_minor()));
    }

    #[test]
    fn test_delete_merges_into_left_zone() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 8);
        zones.apply_chord(8, a_minor());

        assert!(zones.delete_divider(8));
        assert_eq!(zones.dividers(), &[0]);
        for step in 0..STEPS {
            assert_eq!(zones.resolve_chord_at(step), Some(c_major()));
        }
        assert!(!zones.delete_divider(8));
    }

    #[test]
    fn test_delete_and_move_agree() {
        // shrinking a zone to nothing by moves and deleting it end the same way
        let mut moved = ChordZones::new();
        moved.apply_chord(0, c_major());
        moved.split_zone(0, 8);
        moved.split_zone(8, 2);
        moved.apply_chord(8, a_minor());
        moved.apply_chord(10, f_major());

        let mut deleted = moved.clone();

        assert!(moved.move_divider(8, Direction::Right));
        assert!(!moved.move_divider(9, Direction::Right));
        assert!(deleted.delete_divider(8));

        // the moved variant still has a one-step zone at 9 sounding A minor
        assert_eq!(resolutions(&moved)[..9], resolutions(&deleted)[..9]);
        assert_eq!(resolutions(&moved)[10..], resolutions(&deleted)[10..]);
    }

    #[test]
    fn test_clear_all_keeps_triggers() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 4);
        zones.select_divider(4);
        zones.toggle_sound_step(3);

        zones.clear_all();
        assert_eq!(zones.dividers(), &[0]);
        assert_eq!(zones.selected_divider(), None);
        assert!(resolutions(&zones).iter().all(Option::is_none));
        assert!(zones.sound_steps()[3]);
    }

    #[test]
    fn test_clear_zone_chord_inherits_left() {
        let mut zones = ChordZones::new();
        zones.apply_chord(0, c_major());
        zones.split_zone(0, 8);
        zones.apply_chord(8, a_minor());
        assert!(zones.clear_zone_chord(8));
        assert_eq!(zones.resolve_chord_at(12), Some(c_major()));
        assert!(!zones.clear_zone_chord(9));
    }

    #[test]
    fn test_selection_follows_divider() {
        let mut zones = ChordZones::new();
        zones.split_zone(0, 8);
        assert!(!zones.select_divider(3));
        assert!(zones.select_divider(8));
        zones.move_divider(8, Direction::Left);
        assert_eq!(zones.selected_divider(), Some(7));
        zones.delete_divider(7);
        assert_eq!(zones.selected_divider(), None);

        assert!(zones.select_divider(0));
        zones.deselect();
        assert_eq!(zones.selected_divider(), None);
    }

    #[test]
    fn test_toggle_sound_step() {
        let mut zones = ChordZones::new();
        assert!(zones.toggle_sound_step(0));
        assert!(zones.sound_steps()[0]);
        assert!(zones.toggle_sound_step(0));
        assert!(!zones.sound_steps()[0]);
        assert!(!zones.toggle_sound_step(16));
    }

    #[test]
    fn test_triggered_chords_skip_silent_steps() {
        let mut zones = ChordZones::new();
        zones.split_zone(0, 4);
        zones.apply_chord(4, c_major());
        zones.toggle_sound_step(0);
        zones.toggle_sound_step(4);
        zones.toggle_sound_step(9);
        let hits: Vec<_> = zones.triggered_chords().collect();
        assert_eq!(hits, vec![(4, c_major()), (9, c_major())]);
    }

    #[test]
    fn test_zone_containing() {
        let mut zones = ChordZones::new();
        zones.split_zone(0, 5);
        zones.split_zone(5, 6);
        let zone = zones.zone_containing(7).unwrap();
        assert_eq!((zone.start, zone.end), (5, 10));
        assert!(zone.contains(10));
        assert!(!zone.contains(11));
        assert_eq!(zones.zone_containing(0).unwrap().start, 0);
        assert_eq!(zones.zone_containing(15).unwrap().start, 11);
        assert!(zones.zone_containing(16).is_none());
    }

    /// Applies one random edit, checking that successful moves only touch
    /// the two steps around the moved divider.
    fn random_edit(zones: &mut ChordZones, rng: &mut StdRng) {
        let chords = [c_major(), a_minor(), f_major()];
        let pos = rng.gen_range(0..STEPS);
        match rng.gen_range(0..5) {
            0 => {
                zones.apply_chord(pos, chords[rng.gen_range(0..chords.len())]);
            }
            1 => {
                zones.split_zone(pos, rng.gen_range(0..STEPS));
            }
            2 => {
                zones.delete_divider(pos);
            }
            3 => {
                let direction = if rng.gen_bool(0.5) {
                    Direction::Left
                } else {
                    Direction::Right
                };
                let before = resolutions(zones);
                if zones.move_divider(pos, direction) {
                    let (lo, hi) = match direction {
                        Direction::Left => (pos - 1, pos),
                        Direction::Right => (pos, pos + 1),
                    };
                    let after = resolutions(zones);
                    for step in (0..STEPS).filter(|s| *s < lo || *s > hi) {
                        assert_eq!(before[step], after[step], "move changed step {step}");
                    }
                }
            }
            _ => {
                zones.clear_zone_chord(pos);
            }
        }
    }

    #[test]
    fn test_random_edits_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut zones = ChordZones::new();
            for _ in 0..60 {
                random_edit(&mut zones, &mut rng);
                assert_dividers_valid(&zones);

                // every step sounds its zone's chord
                for zone in zones.zones() {
                    for step in zone.start..=zone.end {
                        assert_eq!(zones.resolve_chord_at(step), zone.chord);
                    }
                }
            }
        }
    }
}
