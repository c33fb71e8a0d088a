// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback boundary.
//!
//! The sampler that actually makes sound lives outside this crate. It is
//! reached through the [`PlaybackEngine`] trait, which receives a compiled
//! score and the play options. [`Transport`] owns an engine and enforces a
//! single playback session: starting always stops the previous session
//! first, and stopping while idle does nothing.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::PlaybackConfig;
use crate::sequencer::{Notes, Score, STEPS_PER_BEAT};

/// Slowest supported tempo
pub const MIN_BPM: f64 = 20.0;
/// Fastest supported tempo
pub const MAX_BPM: f64 = 300.0;

/// Options for one playback session
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    /// Tempo in BPM, kept within [`MIN_BPM`, `MAX_BPM`]
    bpm: f64,
    /// Repeat the bar until stopped
    pub looping: bool,
    /// Note length for events that carry none
    pub note_length: String,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

impl PlayOptions {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            bpm: config.bpm.clamp(MIN_BPM, MAX_BPM),
            looping: config.looping,
            note_length: config.note_length.clone(),
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set the tempo, clamped to the supported range
    pub fn set_bpm(&mut self, bpm: f64) {
        if bpm.is_finite() {
            self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        }
    }

    /// Nudge tempo by a delta
    pub fn nudge_bpm(&mut self, delta: f64) {
        self.set_bpm(self.bpm + delta);
    }

    /// Time between two sixteenth-note steps
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.bpm / STEPS_PER_BEAT as f64)
    }
}

/// External playback engine
pub trait PlaybackEngine {
    /// Begin sounding a score. The transport guarantees no session is active.
    fn start(&mut self, score: &Score, options: &PlayOptions) -> Result<()>;

    /// Silence the current session
    fn stop(&mut self);
}

/// A note scheduled relative to the start of the bar
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledHit {
    /// Offset from the bar start
    pub offset: Duration,
    pub step: usize,
    pub instrument: String,
    pub notes: Notes,
    /// Note length token
    pub duration: String,
}

/// Lay out one bar of a score in time
pub fn schedule(score: &Score, options: &PlayOptions) -> Vec<ScheduledHit> {
    let interval = options.step_interval();
    score
        .events()
        .map(|(step, event)| ScheduledHit {
            offset: interval * step as u32,
            step,
            instrument: event.instrument.clone(),
            notes: event.notes.clone(),
            duration: event
                .duration
                .clone()
                .unwrap_or_else(|| options.note_length.clone()),
        })
        .collect()
}

/// Owns the engine and enforces one session at a time
pub struct Transport<E: PlaybackEngine> {
    engine: E,
    playing: bool,
}

impl<E: PlaybackEngine> Transport<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            playing: false,
        }
    }

    /// Start playing a score, stopping any current session first
    pub fn play(&mut self, score: &Score, options: &PlayOptions) -> Result<()> {
        self.stop();
        self.engine.start(score, options)?;
        self.playing = true;
        info!(bpm = options.bpm(), looping = options.looping, "playback started");
        Ok(())
    }

    /// Stop playback; a no-op when idle
    pub fn stop(&mut self) {
        if self.playing {
            self.engine.stop();
            self.playing = false;
            info!("playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: PlaybackEngine> Drop for Transport<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Engine that reports its schedule through `tracing` instead of sound
#[derive(Debug, Default)]
pub struct LogEngine {
    scheduled: Vec<ScheduledHit>,
}

impl LogEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits of the current session
    pub fn scheduled(&self) -> &[ScheduledHit] {
        &self.scheduled
    }
}

impl PlaybackEngine for LogEngine {
    fn start(&mut self, score: &Score, options: &PlayOptions) -> Result<()> {
        self.scheduled = schedule(score, options);
        for hit in &self.scheduled {
            let notes: Vec<String> = hit.notes.as_slice().iter().map(|p| p.to_string()).collect();
            debug!(
                step = hit.step,
                offset_ms = hit.offset.as_millis() as u64,
                instrument = %hit.instrument,
                notes = %notes.join(" "),
                duration = %hit.duration,
                "hit"
            );
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.scheduled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Pitch;
    use crate::sequencer::ScoreEvent;
    use std::sync::{Arc, Mutex};

    /// Records engine calls for inspection
    struct MockEngine {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl MockEngine {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: calls.clone(),
                    fail: false,
                },
                calls,
            )
        }
    }

    impl PlaybackEngine for MockEngine {
        fn start(&mut self, score: &Score, _options: &PlayOptions) -> Result<()> {
            if self.fail {
                anyhow::bail!("sampler not ready");
            }
            self.calls
                .lock()
                .unwrap()
                .push(format!("start {}", score.events().count()));
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().unwrap().push("stop".to_string());
        }
    }

    fn kick_score() -> Score {
        let mut score = Score::new();
        let kick = Notes::Single(Pitch::parse("C1").unwrap());
        for step in [0, 4, 8, 12] {
            score.push(step, ScoreEvent::new("drums", kick.clone()));
        }
        score
    }

    #[test]
    fn test_bpm_clamped() {
        let config = PlaybackConfig {
            bpm: 900.0,
            ..Default::default()
        };
        let mut options = PlayOptions::from_config(&config);
        assert_eq!(options.bpm(), MAX_BPM);
        options.set_bpm(5.0);
        assert_eq!(options.bpm(), MIN_BPM);
        options.set_bpm(f64::NAN);
        assert_eq!(options.bpm(), MIN_BPM);
        options.nudge_bpm(10.0);
        assert_eq!(options.bpm(), 30.0);
    }

    #[test]
    fn test_step_interval() {
        let options = PlayOptions::default();
        // 120 BPM: a beat is 500ms, a sixteenth 125ms
        assert_eq!(options.step_interval(), Duration::from_millis(125));
    }

    #[test]
    fn test_schedule_offsets_and_lengths() {
        let mut score = kick_score();
        let mut long = ScoreEvent::new("piano", Notes::Single(Pitch::parse("C4").unwrap()));
        long.duration = Some("2n".to_string());
        score.push(8, long);

        let hits = schedule(&score, &PlayOptions::default());
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[1].offset, Duration::from_millis(500));
        assert_eq!(hits[1].duration, "16n");
        assert_eq!(hits[3].instrument, "piano");
        assert_eq!(hits[3].offset, Duration::from_millis(1000));
        assert_eq!(hits[3].duration, "2n");
    }

    #[test]
    fn test_play_stops_previous_session() {
        let (engine, calls) = MockEngine::new();
        let mut transport = Transport::new(engine);
        let score = kick_score();

        transport.stop();
        assert!(calls.lock().unwrap().is_empty());

        transport.play(&score, &PlayOptions::default()).unwrap();
        transport.play(&score, &PlayOptions::default()).unwrap();
        assert!(transport.is_playing());
        assert_eq!(*calls.lock().unwrap(), vec!["start 4", "stop", "start 4"]);

        transport.stop();
        transport.stop();
        assert!(!transport.is_playing());
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_drop_stops_playback() {
        let (engine, calls) = MockEngine::new();
        {
            let mut transport = Transport::new(engine);
            transport.play(&Score::new(), &PlayOptions::default()).unwrap();
        }
        assert_eq!(calls.lock().unwrap().last().map(String::as_str), Some("stop"));
    }

    #[test]
    fn test_failed_start_leaves_transport_idle() {
        let (mut engine, calls) = MockEngine::new();
        engine.fail = true;
        let mut transport = Transport::new(engine);
        assert!(transport.play(&kick_score(), &PlayOptions::default()).is_err());
        assert!(!transport.is_playing());
        drop(transport);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_log_engine_keeps_schedule() {
        let mut transport = Transport::new(LogEngine::new());
        transport.play(&kick_score(), &PlayOptions::default()).unwrap();
        assert_eq!(transport.engine().scheduled().len(), 4);
        transport.stop();
        assert!(transport.engine().scheduled().is_empty());
    }
}
