// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Step grid widgets: rhythm rows, the melodic octave accordion and the
//! chord panel. Every grid cell is two columns wide, after a fixed-width
//! lane label.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use super::editor::{melodic_lanes, ChordSelection, Cursor, TRIGGER_LANE, ZONE_LANE};
use crate::music::{Pitch, PitchClass};
use crate::sequencer::{is_beat, ChordZones, MelodicTrack, StepRow, STEPS};

/// Width of the lane label column
pub const LABEL_WIDTH: usize = 7;

fn label_span(label: &str, style: Style) -> Span<'static> {
    Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), style)
}

/// Beat numbers above the grid
fn ruler() -> Line<'static> {
    let mut text = " ".repeat(LABEL_WIDTH);
    for step in 0..STEPS {
        if is_beat(step) {
            text.push_str(&format!("{:<2}", step / 4 + 1));
        } else {
            text.push_str(". ");
        }
    }
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// One row of step cells; `cursor` is the highlighted step, if on this row
fn step_spans(steps: &StepRow, cursor: Option<usize>, on: Color) -> Vec<Span<'static>> {
    steps
        .iter()
        .enumerate()
        .map(|(step, &active)| {
            let (symbol, mut style) = if active {
                ("■ ", Style::default().fg(on))
            } else if is_beat(step) {
                ("· ", Style::default().fg(Color::Gray))
            } else {
                ("· ", Style::default().fg(Color::DarkGray))
            };
            if cursor == Some(step) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(symbol, style)
        })
        .collect()
}

fn grid_line(label: Span<'static>, cells: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = Vec::with_capacity(cells.len() + 1);
    spans.push(label);
    spans.extend(cells);
    Line::from(spans)
}

fn render_in_block(block: Option<Block<'_>>, area: Rect, buf: &mut Buffer) -> Rect {
    match block {
        Some(block) => {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        }
        None => area,
    }
}

/// Plain grid of labelled step rows
pub struct StepGridWidget<'a> {
    lanes: Vec<(&'a str, &'a StepRow)>,
    cursor: Option<Cursor>,
    color: Color,
    block: Option<Block<'a>>,
}

impl<'a> StepGridWidget<'a> {
    pub fn new(lanes: Vec<(&'a str, &'a StepRow)>) -> Self {
        Self {
            lanes,
            cursor: None,
            color: Color::Green,
            block: None,
        }
    }

    /// Highlight the cursor cell
    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Colour of active cells
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for StepGridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = render_in_block(self.block, area, buf);

        let mut lines = vec![ruler()];
        for (lane, (label, steps)) in self.lanes.iter().enumerate() {
            let cursor = self.cursor.filter(|c| c.lane == lane).map(|c| c.step);
            lines.push(grid_line(
                label_span(label, Style::default().fg(Color::White)),
                step_spans(steps, cursor, self.color),
            ));
        }
        Paragraph::new(lines).render(area, buf);
    }
}

/// Melodic track as an accordion: the open octave shows all twelve pitch
/// rows, closed octaves collapse to one summary row.
pub struct OctaveAccordionWidget<'a> {
    track: &'a MelodicTrack,
    cursor: Option<Cursor>,
    block: Option<Block<'a>>,
}

impl<'a> OctaveAccordionWidget<'a> {
    pub fn new(track: &'a MelodicTrack) -> Self {
        Self {
            track,
            cursor: None,
            block: None,
        }
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for OctaveAccordionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = render_in_block(self.block, area, buf);
        let track = self.track;
        let open = track.open_octave();
        let lanes = melodic_lanes(track);

        let mut lines = vec![ruler()];
        for octave in track.view_octaves().rev() {
            if open == Some(octave) {
                lines.push(Line::from(Span::styled(
                    format!("▼ Oct {octave}"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for (lane, pitch) in lanes.iter().enumerate() {
                    let label_style = if pitch.class.is_black_key() {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    let cursor = self.cursor.filter(|c| c.lane == lane).map(|c| c.step);
                    let steps = track.row(*pitch).copied().unwrap_or([false; STEPS]);
                    lines.push(grid_line(
                        label_span(&pitch.to_string(), label_style),
                        step_spans(&steps, cursor, Color::Green),
                    ));
                }
            } else {
                let mut summary = [false; STEPS];
                for class in PitchClass::ALL {
                    if let Some(row) = track.row(Pitch::new(class, octave)) {
                        for (cell, on) in summary.iter_mut().zip(row) {
                            *cell |= *on;
                        }
                    }
                }
                lines.push(grid_line(
                    label_span(&format!("▶ Oct {octave}"), Style::default().fg(Color::Gray)),
                    step_spans(&summary, None, Color::DarkGray),
                ));
            }
        }

        let stamps: Vec<String> = (0..STEPS)
            .filter_map(|step| track.stamp_at(step).map(|chord| format!("{}:{}", step + 1, chord)))
            .collect();
        if !stamps.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Stamps {}", stamps.join(" ")),
                Style::default().fg(Color::Magenta),
            )));
        }

        Paragraph::new(lines).render(area, buf);
    }
}

/// Two-column cells of the zone band: each zone opens with `|` followed by
/// its chord label, padded with `─` to the zone's width.
pub fn zone_band(zones: &ChordZones) -> Vec<String> {
    let mut cells = Vec::with_capacity(STEPS);
    for zone in zones.zones() {
        let label = zone.chord.map(|c| c.label()).unwrap_or_else(|| "--".to_string());
        let width = zone.len() * 2;
        let chars: Vec<char> = std::iter::once('|')
            .chain(label.chars())
            .chain(std::iter::repeat('─'))
            .take(width)
            .collect();
        cells.extend(chars.chunks(2).map(|pair| pair.iter().collect::<String>()));
    }
    cells
}

/// Chord track editor: zone band, trigger row, chord selector and the
/// rhythm reference
pub struct ChordPanelWidget<'a> {
    zones: &'a ChordZones,
    selection: ChordSelection,
    reference: Vec<(&'a str, &'a StepRow)>,
    cursor: Option<Cursor>,
    block: Option<Block<'a>>,
}

impl<'a> ChordPanelWidget<'a> {
    pub fn new(zones: &'a ChordZones, selection: ChordSelection) -> Self {
        Self {
            zones,
            selection,
            reference: Vec::new(),
            cursor: None,
            block: None,
        }
    }

    /// Drum rows shown under the chord lanes
    pub fn reference(mut self, reference: Vec<(&'a str, &'a StepRow)>) -> Self {
        self.reference = reference;
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ChordPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = render_in_block(self.block, area, buf);
        let zones = self.zones;
        let cursor_on = |lane: usize| self.cursor.filter(|c| c.lane == lane).map(|c| c.step);

        let mut lines = vec![ruler()];

        // zone band
        let selected_zone = zones.selected_divider().and_then(|pos| zones.zone_containing(pos));
        let band_cursor = cursor_on(ZONE_LANE);
        let band: Vec<Span> = zone_band(zones)
            .into_iter()
            .enumerate()
            .map(|(step, cell)| {
                let zone_chord = zones.resolve_chord_at(step);
                let mut style = match (selected_zone, zone_chord) {
                    (Some(zone), _) if zone.contains(step) => Style::default().fg(Color::Yellow),
                    (_, Some(_)) => Style::default().fg(Color::Cyan),
                    _ => Style::default().fg(Color::DarkGray),
                };
                if band_cursor == Some(step) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(cell, style)
            })
            .collect();
        lines.push(grid_line(label_span("Zones", Style::default().fg(Color::White)), band));

        lines.push(grid_line(
            label_span("Trig", Style::default().fg(Color::White)),
            step_spans(zones.sound_steps(), cursor_on(TRIGGER_LANE), Color::Magenta),
        ));

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            label_span("Chord", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    "{} {} oct {}",
                    self.selection.root, self.selection.chord_type, self.selection.octave
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]));
        let notes: Vec<String> = self
            .selection
            .chord()
            .voicing()
            .iter()
            .map(|p| p.to_string())
            .collect();
        lines.push(Line::from(vec![
            label_span("", Style::default()),
            Span::styled(notes.join(" "), Style::default().fg(Color::Gray)),
        ]));

        if !self.reference.is_empty() {
            lines.push(Line::from(""));
            for (label, steps) in &self.reference {
                lines.push(grid_line(
                    label_span(label, Style::default().fg(Color::DarkGray)),
                    step_spans(steps, None, Color::Gray),
                ));
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}
