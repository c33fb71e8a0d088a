// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor state and key handling.
//!
//! Keys map to [`EditorAction`]s, and [`Editor::apply`] performs them against
//! the composition. Nothing here touches the terminal, so the whole editing
//! flow can be driven from tests.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

use crate::config::InstrumentCatalog;
use crate::music::{Chord, ChordType, Octave, Pitch, PitchClass};
use crate::playback::{PlayOptions, PlaybackEngine, Transport};
use crate::sequencer::{Composition, Direction, MelodicTrack, Track, TrackKind, STEPS};

/// BPM change per tempo key press
const TEMPO_STEP: f64 = 5.0;

/// Lowest and highest octave offered by the chord selector
const CHORD_OCTAVES: (Octave, Octave) = (1, 6);

/// Lane index of the zone band on chord tracks
pub const ZONE_LANE: usize = 0;
/// Lane index of the trigger row on chord tracks
pub const TRIGGER_LANE: usize = 1;

/// Root, type and octave picked in the chord selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSelection {
    pub root: PitchClass,
    pub chord_type: ChordType,
    pub octave: Octave,
}

impl Default for ChordSelection {
    fn default() -> Self {
        Self {
            root: PitchClass::C,
            chord_type: ChordType::Major,
            octave: 4,
        }
    }
}

impl ChordSelection {
    pub fn chord(&self) -> Chord {
        Chord::new(self.root, self.chord_type, self.octave)
    }

    pub fn cycle_root(&mut self) {
        self.root = PitchClass::from_index(self.root.index() + 1);
    }

    pub fn cycle_type(&mut self) {
        self.chord_type = self.chord_type.next();
    }

    pub fn cycle_octave(&mut self) {
        let (low, high) = CHORD_OCTAVES;
        self.octave = if self.octave >= high { low } else { (self.octave + 1).max(low) };
    }
}

/// Grid cursor: a step and a lane of the selected track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub step: usize,
    pub lane: usize,
}

/// Editor commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    /// No action needed
    None,
    Quit,
    Play,
    Stop,
    TempoUp,
    TempoDown,
    NextTrack,
    PrevTrack,
    /// Add the catalog instrument at this index
    AddInstrument(usize),
    DeleteTrack,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Toggle the cell under the cursor (selects the zone on the zone band)
    Toggle,
    SplitZone,
    MoveDivider(Direction),
    DeleteDivider,
    ApplyChord,
    ClearZones,
    CycleRoot,
    CycleChordType,
    CycleChordOctave,
    ShiftView(Octave),
    CycleOpenOctave,
    ToggleStamp,
    ToggleHelp,
}

/// Map a key press to an action
pub fn handle_key(code: KeyCode, modifiers: KeyModifiers) -> EditorAction {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => EditorAction::Quit,
            _ => EditorAction::None,
        };
    }

    match code {
        KeyCode::Char('q') => EditorAction::Quit,

        // Transport
        KeyCode::Char(' ') => EditorAction::Play,
        KeyCode::Esc => EditorAction::Stop,
        KeyCode::Char('+') | KeyCode::Char('=') => EditorAction::TempoUp,
        KeyCode::Char('-') => EditorAction::TempoDown,

        // Tracks
        KeyCode::Tab => EditorAction::NextTrack,
        KeyCode::BackTab => EditorAction::PrevTrack,
        KeyCode::Char(c @ '1'..='9') => EditorAction::AddInstrument(c as usize - '1' as usize),
        KeyCode::Char('x') => EditorAction::DeleteTrack,

        // Grid
        KeyCode::Left => EditorAction::CursorLeft,
        KeyCode::Right => EditorAction::CursorRight,
        KeyCode::Up => EditorAction::CursorUp,
        KeyCode::Down => EditorAction::CursorDown,
        KeyCode::Enter => EditorAction::Toggle,

        // Chord zones
        KeyCode::Char('s') => EditorAction::SplitZone,
        KeyCode::Char(',') => EditorAction::MoveDivider(Direction::Left),
        KeyCode::Char('.') => EditorAction::MoveDivider(Direction::Right),
        KeyCode::Backspace | KeyCode::Delete => EditorAction::DeleteDivider,
        KeyCode::Char('c') => EditorAction::ApplyChord,
        KeyCode::Char('C') => EditorAction::ClearZones,

        // Chord selector
        KeyCode::Char('r') => EditorAction::CycleRoot,
        KeyCode::Char('t') => EditorAction::CycleChordType,
        KeyCode::Char('v') => EditorAction::CycleChordOctave,

        // Melodic view
        KeyCode::Char('[') => EditorAction::ShiftView(-1),
        KeyCode::Char(']') => EditorAction::ShiftView(1),
        KeyCode::Char('o') => EditorAction::CycleOpenOctave,
        KeyCode::Char('k') => EditorAction::ToggleStamp,

        KeyCode::Char('?') | KeyCode::Char('h') => EditorAction::ToggleHelp,
        _ => EditorAction::None,
    }
}

/// Pitches of the open accordion octave, highest first
pub fn melodic_lanes(track: &MelodicTrack) -> Vec<Pitch> {
    match track.open_octave() {
        Some(octave) => PitchClass::ALL
            .iter()
            .rev()
            .map(|&class| Pitch::new(class, octave))
            .collect(),
        None => Vec::new(),
    }
}

/// Number of cursor lanes a track offers
pub fn lane_count(track: &Track) -> usize {
    match &track.kind {
        TrackKind::Rhythm(rhythm) => rhythm.rows.len(),
        TrackKind::Melodic(melodic) => melodic_lanes(melodic).len(),
        TrackKind::Chord(_) => 2,
    }
}

/// Editor state
#[derive(Debug, Clone)]
pub struct Editor {
    pub cursor: Cursor,
    pub chord: ChordSelection,
    pub options: PlayOptions,
    pub show_help: bool,
    running: bool,
    status: Option<(String, Instant)>,
}

impl Editor {
    pub fn new(options: PlayOptions) -> Self {
        Self {
            cursor: Cursor::default(),
            chord: ChordSelection::default(),
            options,
            show_help: false,
            running: true,
            status: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current status message
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(msg, _)| msg.as_str())
    }

    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status {
            if time.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
    }

    /// Perform an action against the composition
    pub fn apply<E: PlaybackEngine>(
        &mut self,
        action: EditorAction,
        comp: &mut Composition,
        catalog: &InstrumentCatalog,
        transport: &mut Transport<E>,
    ) {
        match action {
            EditorAction::None => {}
            EditorAction::Quit => {
                transport.stop();
                self.running = false;
            }
            EditorAction::Play => self.play(comp, transport),
            EditorAction::Stop => transport.stop(),
            EditorAction::TempoUp | EditorAction::TempoDown => {
                let delta = if action == EditorAction::TempoUp {
                    TEMPO_STEP
                } else {
                    -TEMPO_STEP
                };
                self.options.nudge_bpm(delta);
                if transport.is_playing() {
                    self.play(comp, transport);
                }
            }
            EditorAction::NextTrack | EditorAction::PrevTrack => {
                if comp.cycle_selection(action == EditorAction::NextTrack) {
                    self.clamp_cursor(comp);
                }
            }
            EditorAction::AddInstrument(index) => match catalog.at(index) {
                Some(inst) => match comp.create_track(catalog, &inst.id) {
                    Ok(_) => {
                        self.cursor = Cursor::default();
                        self.set_status(format!("Added {}", inst.label));
                    }
                    Err(e) => self.set_status(e.to_string()),
                },
                None => self.set_status(format!("No instrument in slot {}", index + 1)),
            },
            EditorAction::DeleteTrack => {
                if let Some(id) = comp.selected_id() {
                    comp.delete_track(id);
                    self.clamp_cursor(comp);
                }
            }
            EditorAction::CursorLeft => {
                self.cursor.step = (self.cursor.step + STEPS - 1) % STEPS;
            }
            EditorAction::CursorRight => {
                self.cursor.step = (self.cursor.step + 1) % STEPS;
            }
            EditorAction::CursorUp => {
                self.cursor.lane = self.cursor.lane.saturating_sub(1);
            }
            EditorAction::CursorDown => {
                let lanes = comp.selected_track().map(lane_count).unwrap_or(0);
                if self.cursor.lane + 1 < lanes {
                    self.cursor.lane += 1;
                }
            }
            EditorAction::CycleRoot => self.chord.cycle_root(),
            EditorAction::CycleChordType => self.chord.cycle_type(),
            EditorAction::CycleChordOctave => self.chord.cycle_octave(),
            EditorAction::ToggleHelp => self.show_help = !self.show_help,
            _ => self.edit_track(action, comp),
        }
    }

    fn play<E: PlaybackEngine>(&mut self, comp: &Composition, transport: &mut Transport<E>) {
        let score = comp.compile();
        if let Err(e) = transport.play(&score, &self.options) {
            warn!("playback failed: {e:#}");
            self.set_status(format!("Playback failed: {e}"));
        }
    }

    /// Keep the cursor lane inside the selected track
    fn clamp_cursor(&mut self, comp: &Composition) {
        let lanes = comp.selected_track().map(lane_count).unwrap_or(0);
        self.cursor.lane = self.cursor.lane.min(lanes.saturating_sub(1));
    }

    /// Actions that edit the selected track
    fn edit_track(&mut self, action: EditorAction, comp: &mut Composition) {
        let Cursor { step, lane } = self.cursor;
        let chord = self.chord.chord();
        let Some(track) = comp.selected_track_mut() else {
            return;
        };

        let accepted = match (&mut track.kind, action) {
            (TrackKind::Rhythm(rhythm), EditorAction::Toggle) => {
                match rhythm.rows.get(lane).map(|r| r.label.clone()) {
                    Some(label) => rhythm.toggle(&label, step),
                    None => false,
                }
            }

            (TrackKind::Melodic(melodic), EditorAction::Toggle) => {
                match melodic_lanes(melodic).get(lane) {
                    Some(&pitch) => melodic.toggle(pitch, step),
                    None => false,
                }
            }
            (TrackKind::Melodic(melodic), EditorAction::ToggleStamp) => melodic.toggle_stamp(step, chord),
            (TrackKind::Melodic(melodic), EditorAction::ShiftView(delta)) => melodic.shift_view(delta),
            (TrackKind::Melodic(melodic), EditorAction::CycleOpenOctave) => {
                let view = melodic.view_octaves();
                let next = match melodic.open_octave() {
                    Some(open) if open < *view.end() => open + 1,
                    _ => *view.start(),
                };
                melodic.toggle_open_octave(next)
            }

            (TrackKind::Chord(zones), EditorAction::Toggle) if lane == ZONE_LANE => {
                match zones.zone_containing(step) {
                    Some(zone) => zones.select_divider(zone.start),
                    None => false,
                }
            }
            (TrackKind::Chord(zones), EditorAction::Toggle) => zones.toggle_sound_step(step),
            (TrackKind::Chord(zones), EditorAction::SplitZone) => match zones.zone_containing(step) {
                Some(zone) => zones.split_zone(zone.start, step - zone.start),
                None => false,
            },
            (TrackKind::Chord(zones), EditorAction::MoveDivider(direction)) => {
                match zones.selected_divider() {
                    Some(pos) => zones.move_divider(pos, direction),
                    None => false,
                }
            }
            (TrackKind::Chord(zones), EditorAction::DeleteDivider) => match zones.selected_divider() {
                Some(pos) => zones.delete_divider(pos),
                None => false,
            },
            (TrackKind::Chord(zones), EditorAction::ApplyChord) => match zones.zone_containing(step) {
                Some(zone) => zones.apply_chord(zone.start, chord),
                None => false,
            },
            (TrackKind::Chord(zones), EditorAction::ClearZones) => {
                zones.clear_all();
                true
            }

            _ => return,
        };

        if !accepted {
            self.set_status("Not possible here");
        }
        // the open octave may have changed the lane count
        self.clamp_cursor(comp);
    }
}
