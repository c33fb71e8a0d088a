// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track list sidebar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::config::InstrumentCatalog;
use crate::sequencer::{Track, TrackId, TrackKind};

/// Short tag for a track variant
fn kind_tag(track: &Track) -> &'static str {
    match track.kind {
        TrackKind::Rhythm(_) => "rhy",
        TrackKind::Melodic(_) => "mel",
        TrackKind::Chord(_) => "chd",
    }
}

/// Widget listing every track, marking the selected one
pub struct TrackListWidget<'a> {
    tracks: &'a [Track],
    catalog: &'a InstrumentCatalog,
    selected: Option<TrackId>,
    block: Option<Block<'a>>,
}

impl<'a> TrackListWidget<'a> {
    /// Create a new track list widget
    pub fn new(tracks: &'a [Track], catalog: &'a InstrumentCatalog) -> Self {
        Self {
            tracks,
            catalog,
            selected: None,
            block: None,
        }
    }

    /// Set selected track id
    pub fn selected(mut self, id: Option<TrackId>) -> Self {
        self.selected = id;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for TrackListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.tracks.is_empty() {
            Paragraph::new("No tracks yet")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let lines: Vec<Line> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let selected = self.selected == Some(track.id);
                let style = if selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                let marker = if selected { ">" } else { " " };
                Line::from(vec![
                    Span::styled(format!("{marker}{:<2} ", i + 1), style),
                    Span::styled(format!("{:<16}", self.catalog.label(&track.instrument)), style),
                    Span::styled(kind_tag(track), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}

/// Numbered instrument picker shown when the composition is empty
pub struct InstrumentPickerWidget<'a> {
    catalog: &'a InstrumentCatalog,
}

impl<'a> InstrumentPickerWidget<'a> {
    pub fn new(catalog: &'a InstrumentCatalog) -> Self {
        Self { catalog }
    }
}

impl Widget for InstrumentPickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from(Span::styled(
            "Add an instrument:",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.extend(self.catalog.iter().take(9).enumerate().map(|(i, inst)| {
            Line::from(vec![
                Span::styled(format!("  {} ", i + 1), Style::default().fg(Color::Cyan)),
                Span::raw(inst.label.clone()),
            ])
        }));
        Paragraph::new(lines).render(area, buf);
    }
}
