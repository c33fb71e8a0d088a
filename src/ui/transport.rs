// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport display widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Paragraph, Widget},
};

use crate::playback::PlayOptions;

/// Transport widget for displaying playback state
pub struct TransportWidget<'a> {
    playing: bool,
    options: &'a PlayOptions,
    tracks: usize,
    block: Option<Block<'a>>,
}

impl<'a> TransportWidget<'a> {
    /// Create a new transport widget
    pub fn new(playing: bool, options: &'a PlayOptions) -> Self {
        Self {
            playing,
            options,
            tracks: 0,
            block: None,
        }
    }

    /// Number of tracks in the composition
    pub fn tracks(mut self, tracks: usize) -> Self {
        self.tracks = tracks;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for TransportWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10), // Play/Stop indicator
                Constraint::Length(2),  // Spacer
                Constraint::Length(12), // Tempo
                Constraint::Length(2),  // Spacer
                Constraint::Length(6),  // Loop
                Constraint::Length(2),  // Spacer
                Constraint::Min(0),     // Track count
            ])
            .split(area);

        let (indicator, style) = if self.playing {
            ("▶ PLAY", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("■ STOP", Style::default().fg(Color::Yellow))
        };
        Paragraph::new(indicator).style(style).render(chunks[0], buf);

        let tempo = format!("{:.1} BPM", self.options.bpm());
        Paragraph::new(tempo)
            .style(Style::default().fg(Color::Magenta))
            .render(chunks[2], buf);

        let looping = if self.options.looping { "LOOP" } else { "ONCE" };
        Paragraph::new(looping)
            .style(Style::default().fg(Color::Cyan))
            .render(chunks[4], buf);

        let tracks = match self.tracks {
            1 => "1 track".to_string(),
            n => format!("{n} tracks"),
        };
        Paragraph::new(tracks)
            .style(Style::default().fg(Color::White))
            .render(chunks[6], buf);
    }
}
