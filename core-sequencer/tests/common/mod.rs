//! Shared test doubles for sequencer integration tests.
//!
//! `SimulatedMedia` behaves like a host backend that accepts commands
//! synchronously and reports completion through signals the test delivers by
//! hand. Its state lives behind an `Arc<Mutex<_>>` so the test keeps a
//! [`SimHandle`] after the element has been moved into a sequencer.

#![allow(dead_code)]

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
use core_runtime::events::Receiver;
use parking_lot::Mutex;
use std::sync::Arc;

/// Command received by a simulated backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Seek(f64),
    Play,
    Pause,
    SetVolume(f64),
    SetMuted(bool),
    SetActive(bool),
}

#[derive(Debug)]
struct SimState {
    kind: MediaKind,
    clip_begin: Option<f64>,
    clip_end: Option<f64>,
    current_time: f64,
    duration: f64,
    paused: bool,
    seeking: bool,
    ready_state: ReadyState,
    volume: f64,
    muted: bool,
    active: bool,
    fail_play: bool,
    fail_seek: bool,
    fail_audio: bool,
    commands: Vec<Command>,
}

pub struct SimulatedMedia {
    id: String,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedMedia {
    /// An element whose metadata is not known yet.
    pub fn new(id: &str, kind: MediaKind) -> Self {
        Self {
            id: id.to_string(),
            state: Arc::new(Mutex::new(SimState {
                kind,
                clip_begin: None,
                clip_end: None,
                current_time: 0.0,
                duration: f64::NAN,
                paused: true,
                seeking: false,
                ready_state: ReadyState::HaveNothing,
                volume: 1.0,
                muted: false,
                active: false,
                fail_play: false,
                fail_seek: false,
                fail_audio: false,
                commands: Vec::new(),
            })),
        }
    }

    pub fn audio(id: &str) -> Self {
        Self::new(id, MediaKind::Audio)
    }

    pub fn video(id: &str) -> Self {
        Self::new(id, MediaKind::Video)
    }

    /// Metadata already known at build time.
    pub fn loaded(self, duration: f64) -> Self {
        self.handle().load(duration);
        self
    }

    pub fn clip(self, clip_begin: Option<f64>, clip_end: Option<f64>) -> Self {
        {
            let mut state = self.state.lock();
            state.clip_begin = clip_begin;
            state.clip_end = clip_end;
        }
        self
    }

    pub fn failing_play(self) -> Self {
        self.state.lock().fail_play = true;
        self
    }

    /// Seeks are rejected without moving the element.
    pub fn failing_seek(self) -> Self {
        self.state.lock().fail_seek = true;
        self
    }

    /// Volume and mute changes are rejected.
    pub fn failing_audio(self) -> Self {
        self.state.lock().fail_audio = true;
        self
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Test-side view of a [`SimulatedMedia`].
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SimState>>,
}

impl SimHandle {
    /// Metadata becomes known. The test still delivers `MetadataKnown`.
    pub fn load(&self, duration: f64) {
        let mut state = self.state.lock();
        state.duration = duration;
        state.ready_state = ReadyState::HaveMetadata;
    }

    /// Enough data buffered. The test still delivers `CanPlayThrough`.
    pub fn buffer(&self) {
        self.state.lock().ready_state = ReadyState::HaveEnoughData;
    }

    /// A pending seek completed. The test still delivers `Seeked`.
    pub fn finish_seek(&self) {
        self.state.lock().seeking = false;
    }

    /// Playback advanced. The test still delivers `Progress` or `Ended`.
    pub fn advance_to(&self, time: f64) {
        self.state.lock().current_time = time;
    }

    pub fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    pub fn paused(&self) -> bool {
        self.state.lock().paused
    }

    pub fn seeking(&self) -> bool {
        self.state.lock().seeking
    }

    pub fn active(&self) -> bool {
        self.state.lock().active
    }

    pub fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    pub fn muted(&self) -> bool {
        self.state.lock().muted
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().commands.clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                Command::Seek(time) => Some(time),
                _ => None,
            })
            .collect()
    }

    pub fn clear_commands(&self) {
        self.state.lock().commands.clear();
    }
}

impl MediaElement for SimulatedMedia {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> MediaKind {
        self.state.lock().kind
    }

    fn clip_begin(&self) -> Option<f64> {
        self.state.lock().clip_begin
    }

    fn clip_end(&self) -> Option<f64> {
        self.state.lock().clip_end
    }

    fn set_active(&mut self, active: bool) {
        let mut state = self.state.lock();
        state.active = active;
        state.commands.push(Command::SetActive(active));
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn set_current_time(&mut self, time: f64) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_seek {
            return Err(BridgeError::OperationFailed(format!("{} cannot seek", self.id)));
        }
        state.current_time = time;
        state.seeking = true;
        state.commands.push(Command::Seek(time));
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn paused(&self) -> bool {
        self.state.lock().paused
    }

    fn seeking(&self) -> bool {
        self.state.lock().seeking
    }

    fn ended(&self) -> bool {
        let state = self.state.lock();
        state.current_time >= state.duration
    }

    fn ready_state(&self) -> ReadyState {
        self.state.lock().ready_state
    }

    fn volume(&self) -> f64 {
        self.state.lock().volume
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_audio {
            return Err(BridgeError::NotAvailable(format!("{} volume control", self.id)));
        }
        state.volume = volume;
        state.commands.push(Command::SetVolume(volume));
        Ok(())
    }

    fn muted(&self) -> bool {
        self.state.lock().muted
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_audio {
            return Err(BridgeError::NotAvailable(format!("{} volume control", self.id)));
        }
        state.muted = muted;
        state.commands.push(Command::SetMuted(muted));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_play {
            return Err(BridgeError::OperationFailed(format!(
                "{} refused to play",
                self.id
            )));
        }
        state.paused = false;
        state.commands.push(Command::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.paused = true;
        state.commands.push(Command::Pause);
        Ok(())
    }
}

/// Kinds of every signal currently buffered on `receiver`.
pub fn drain_kinds(receiver: &mut Receiver<MediaSignal>) -> Vec<MediaEventKind> {
    drain(receiver).into_iter().map(|signal| signal.kind).collect()
}

/// Every signal currently buffered on `receiver`.
pub fn drain(receiver: &mut Receiver<MediaSignal>) -> Vec<MediaSignal> {
    let mut signals = Vec::new();
    while let Ok(signal) = receiver.try_recv() {
        signals.push(signal);
    }
    signals
}

/// Count occurrences of `kind`.
pub fn count(kinds: &[MediaEventKind], kind: MediaEventKind) -> usize {
    kinds.iter().filter(|k| **k == kind).count()
}
