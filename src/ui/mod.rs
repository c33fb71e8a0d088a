// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal editor for stepgrid.
//!
//! Provides a ratatui-based terminal interface with a transport bar, the
//! track list, and an editor panel that follows the selected track: a step
//! grid for rhythm tracks, an octave accordion for melodic tracks and the
//! zone band with its trigger row for chord tracks.

mod editor;
mod grid;
mod tracks;
mod transport;

pub use editor::{
    handle_key, lane_count, melodic_lanes, ChordSelection, Cursor, Editor, EditorAction,
};
pub use grid::{zone_band, ChordPanelWidget, OctaveAccordionWidget, StepGridWidget};
pub use tracks::{InstrumentPickerWidget, TrackListWidget};
pub use transport::TransportWidget;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::config::InstrumentCatalog;
use crate::playback::{PlaybackEngine, Transport};
use crate::sequencer::{Composition, TrackKind};

/// Terminal UI application
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
}

impl App {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            frame_rate: 30,
        })
    }

    /// Set frame rate
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.clamp(1, 120);
    }

    /// Run the editor until it quits
    pub fn run<E: PlaybackEngine>(
        &mut self,
        editor: &mut Editor,
        comp: &mut Composition,
        catalog: &InstrumentCatalog,
        transport: &mut Transport<E>,
    ) -> Result<()> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        while editor.is_running() {
            editor.clear_expired_status();
            let playing = transport.is_playing();
            self.terminal
                .draw(|frame| draw(frame, editor, comp, catalog, playing))
                .context("Failed to draw terminal")?;

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action = handle_key(key.code, key.modifiers);
                        editor.apply(action, comp, catalog, transport);
                    }
                }
            }
        }
        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Draw the whole editor
pub fn draw(
    frame: &mut Frame,
    editor: &Editor,
    comp: &Composition,
    catalog: &InstrumentCatalog,
    playing: bool,
) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport
            Constraint::Min(10),   // Tracks + editor
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    frame.render_widget(
        TransportWidget::new(playing, &editor.options)
            .tracks(comp.len())
            .block(Block::default().borders(Borders::ALL).title(" Transport ")),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(40)])
        .split(rows[1]);

    frame.render_widget(
        TrackListWidget::new(comp.tracks(), catalog)
            .selected(comp.selected_id())
            .block(Block::default().borders(Borders::ALL).title(" Tracks ")),
        columns[0],
    );

    render_editor_panel(frame, columns[1], editor, comp, catalog);
    render_status_bar(frame, rows[2], editor);

    if editor.show_help {
        render_help_overlay(frame, area);
    }
}

/// Render the panel for the selected track
fn render_editor_panel(
    frame: &mut Frame,
    area: Rect,
    editor: &Editor,
    comp: &Composition,
    catalog: &InstrumentCatalog,
) {
    let Some(track) = comp.selected_track() else {
        let block = Block::default().borders(Borders::ALL).title(" Editor ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(InstrumentPickerWidget::new(catalog), inner);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", catalog.label(&track.instrument)));

    match &track.kind {
        TrackKind::Rhythm(rhythm) => {
            let lanes = rhythm
                .rows
                .iter()
                .map(|row| (row.label.as_str(), &row.steps))
                .collect();
            frame.render_widget(
                StepGridWidget::new(lanes).cursor(editor.cursor).block(block),
                area,
            );
        }
        TrackKind::Melodic(melodic) => {
            frame.render_widget(
                OctaveAccordionWidget::new(melodic)
                    .cursor(editor.cursor)
                    .block(block),
                area,
            );
        }
        TrackKind::Chord(zones) => {
            frame.render_widget(
                ChordPanelWidget::new(zones, editor.chord)
                    .reference(comp.rhythm_reference())
                    .cursor(editor.cursor)
                    .block(block),
                area,
            );
        }
    }
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, editor: &Editor) {
    let text = match editor.status() {
        Some(msg) => Span::styled(msg.to_string(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            " Space: Play | Esc: Stop | 1-9: Add | Tab: Track | Enter: Toggle | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        ),
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52.min(area.width.saturating_sub(4));
    let height = 26.min(area.height.saturating_sub(2));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
    };
    let help_text = vec![
        heading("Transport"),
        Line::from("  Space       Play (restarts)"),
        Line::from("  Esc         Stop"),
        Line::from("  +/-         Tempo +/- 5 BPM"),
        heading("Tracks"),
        Line::from("  1-9         Add instrument"),
        Line::from("  x           Delete selected track"),
        Line::from("  Tab/S-Tab   Next/previous track"),
        Line::from("  Arrows      Move cursor"),
        Line::from("  Enter       Toggle step / select zone"),
        heading("Chord tracks"),
        Line::from("  s           Split zone at cursor"),
        Line::from("  , .         Move selected divider"),
        Line::from("  Backspace   Delete selected divider"),
        Line::from("  c / C       Apply chord / clear zones"),
        Line::from("  r t v       Cycle root / type / octave"),
        heading("Melodic tracks"),
        Line::from("  [ ]         Shift octave window"),
        Line::from("  o           Open next octave"),
        Line::from("  k           Stamp chord at cursor"),
        heading("Other"),
        Line::from("  h/?         Toggle help"),
        Line::from("  q/Ctrl+c    Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Text of each buffer row, for widget tests
#[cfg(test)]
pub(crate) fn buffer_lines(buf: &ratatui::buffer::Buffer) -> Vec<String> {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}
