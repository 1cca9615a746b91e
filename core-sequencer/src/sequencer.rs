//! # Media Sequencer
//!
//! Public facade of a composed player: several trimmed child media played
//! back to back behind one [`MediaElement`] surface.
//!
//! ## Architecture
//!
//! ```text
//!            handle_child_event(i, kind)
//!   Host ─────────────────────────────────┐
//!                                         ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                      MediaSequencer                        │
//! │                                                            │
//! │  ReadinessAggregator ──> Timeline ──> selector::select     │
//! │                                            │               │
//! │                    RelayController <── SeekCoordinator     │
//! └──────────────┬─────────────────────────────────┬──────────┘
//!                │ commands                        │ MediaSignal
//!                ▼                                 ▼
//!        children (dyn MediaElement)           EventBus
//! ```
//!
//! Every entry point takes `&mut self` and runs to completion, so a
//! transition between children is never interleaved with another signal.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sequencer::{MediaSequencer, Propagation};
//! use bridge_traits::MediaEventKind;
//!
//! let mut sequencer = MediaSequencer::builder()
//!     .id("intro-and-talk")
//!     .child(intro)
//!     .child(talk)
//!     .build()?;
//! let mut listener = sequencer.subscribe();
//!
//! // Host event loop: every child signal goes through the sequencer first.
//! if sequencer.handle_child_event(index, MediaEventKind::Progress)? == Propagation::Continue {
//!     deliver_elsewhere(index, MediaEventKind::Progress);
//! }
//! ```

use crate::error::{Result, SequencerError};
use crate::ids::IdGenerator;
use crate::readiness::{Countdown, ReadinessAggregator};
use crate::relay::{RelayAction, RelayController, RelayMode};
use crate::seek::{clamp_into, landing_time, needs_seek, SeekCoordinator};
use crate::selector::{self, Selection, Transition};
use crate::timeline::{round_time, ClipSpan, ClipWindow, Timeline};
use bridge_traits::error::BridgeError;
use bridge_traits::{MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
use core_runtime::config::SequencerConfig;
use core_runtime::events::{EventBus, Receiver};
use std::fmt;
use tracing::{debug, trace, warn};

/// Identifier used when the host names neither the sequencer nor a generator.
pub const DEFAULT_SEQUENCER_ID: &str = "sequencer";

/// Whether the host may keep delivering a child signal after the sequencer
/// has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// The sequencer intercepted the signal.
    Stopped,
    /// The sequencer has no interest in the signal.
    Continue,
}

/// Builder for [`MediaSequencer`].
pub struct MediaSequencerBuilder {
    config: SequencerConfig,
    events: Option<EventBus>,
    id: Option<String>,
    children: Vec<Box<dyn MediaElement>>,
}

impl MediaSequencerBuilder {
    fn new() -> Self {
        Self {
            config: SequencerConfig::default(),
            events: None,
            id: None,
            children: Vec::new(),
        }
    }

    pub fn config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish aggregate signals on an existing bus.
    ///
    /// Subscribe before [`build`](Self::build) to observe the signals raised
    /// while children that are already loaded get laid out.
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Take the next free id of a session generator.
    pub fn id_from(mut self, ids: &mut IdGenerator) -> Self {
        self.id = Some(ids.next_id());
        self
    }

    /// Append a child; clips play in the order they were added.
    pub fn child<M>(self, child: M) -> Self
    where
        M: MediaElement + 'static,
    {
        self.child_boxed(Box::new(child))
    }

    pub fn child_boxed(mut self, child: Box<dyn MediaElement>) -> Self {
        self.children.push(child);
        self
    }

    /// Validate the configuration and every clip window, then lay out the
    /// timeline right away if all children already know their metadata.
    pub fn build(self) -> Result<MediaSequencer> {
        self.config.validate()?;

        if self.children.is_empty() {
            return Err(SequencerError::NoChildren);
        }

        let windows = self
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let window = ClipWindow::from_element(child.as_ref());
                window.validate(index).map(|_| window)
            })
            .collect::<Result<Vec<_>>>()?;

        let count = self.children.len();
        let events = self
            .events
            .unwrap_or_else(|| EventBus::new(self.config.event_buffer_size));
        let id = self
            .id
            .unwrap_or_else(|| DEFAULT_SEQUENCER_ID.to_string());

        let mut sequencer = MediaSequencer {
            pending_play: self.config.autoplay,
            config: self.config,
            id,
            events,
            children: self.children,
            windows,
            timeline: None,
            readiness: ReadinessAggregator::new(count),
            relay: RelayController::new(count),
            seek: SeekCoordinator::new(),
            current_time: 0.0,
            paused: true,
            active: None,
            forced: None,
            last_active: None,
            volume: 1.0,
            muted: false,
        };

        if sequencer.config.debug {
            debug!(sequencer = %sequencer.id, children = count, "Sequencer created");
        }

        sequencer.sync_initial_readiness();
        Ok(sequencer)
    }
}

/// A composed player sequencing its children on one global timeline.
pub struct MediaSequencer {
    id: String,
    config: SequencerConfig,
    events: EventBus,
    children: Vec<Box<dyn MediaElement>>,
    windows: Vec<ClipWindow>,
    timeline: Option<Timeline>,
    readiness: ReadinessAggregator,
    relay: RelayController,
    seek: SeekCoordinator,
    current_time: f64,
    paused: bool,
    active: Option<usize>,
    /// Child pinned after a landed seek, for one tick.
    forced: Option<usize>,
    last_active: Option<usize>,
    pending_play: bool,
    volume: f64,
    muted: bool,
}

impl MediaSequencer {
    pub fn builder() -> MediaSequencerBuilder {
        MediaSequencerBuilder::new()
    }

    // ========================================================================
    // Host-driven signal delivery
    // ========================================================================

    /// Deliver one signal raised by child `child`.
    ///
    /// # Errors
    ///
    /// [`SequencerError::UnknownChild`] for an index out of range, or the
    /// error of a child command issued while reacting to the signal.
    pub fn handle_child_event(&mut self, child: usize, kind: MediaEventKind) -> Result<Propagation> {
        if child >= self.children.len() {
            return Err(SequencerError::UnknownChild(child));
        }

        if kind == MediaEventKind::Seeked {
            if let Some(landing) = self.seek.land(child) {
                trace!(sequencer = %self.id, child, token = ?landing.token, "Seek landed");
                self.complete_alignment(child, landing.announced)?;
                return Ok(Propagation::Stopped);
            }
            if self.seek.absorb(child) {
                trace!(sequencer = %self.id, child, "Absorbed confirmation of a superseded seek");
                return Ok(Propagation::Stopped);
            }
        }

        let action = self.relay.decide(child, kind);
        match action {
            RelayAction::Pass => {}
            RelayAction::Suppress => {
                trace!(sequencer = %self.id, child, signal = %kind, "Suppressed child signal");
            }
            RelayAction::Forward(kind) => self.emit(kind),
            RelayAction::Tick => self.on_tick(child, false)?,
            RelayAction::EndTick => self.on_tick(child, true)?,
            RelayAction::Readiness(MediaEventKind::MetadataKnown) => self.count_metadata(child),
            RelayAction::Readiness(_) => self.count_play_through(child),
            RelayAction::Fail => {
                warn!(
                    sequencer = %self.id,
                    child = %self.children[child].id(),
                    "Child media reported an error"
                );
                self.emit(MediaEventKind::Error);
            }
        }

        Ok(if action.intercepts() {
            Propagation::Stopped
        } else {
            Propagation::Continue
        })
    }

    // ========================================================================
    // Facade
    // ========================================================================

    /// Start playback, deferring it until the timeline is laid out.
    pub fn play(&mut self) -> Result<()> {
        self.paused = false;
        self.rewind_if_ended()?;

        if self.timeline.is_none() {
            self.pending_play = true;
            return Ok(());
        }

        if let Some(active) = self.active {
            self.children[active].play()?;
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.paused = true;
        self.pending_play = false;
        self.rewind_if_ended()?;

        if let Some(active) = self.active {
            self.children[active].pause()?;
        }
        Ok(())
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Seek the timeline.
    ///
    /// Before the timeline is laid out the position is only stored. Afterwards
    /// the owning child is realigned even when it does not change.
    pub fn set_current_time(&mut self, time: f64) -> Result<()> {
        if time.is_nan() {
            return Err(SequencerError::InvalidTime(time));
        }
        if time == self.current_time {
            return Ok(());
        }

        let resolution = self.config.time_resolution;
        match self.timeline.as_ref().map(Timeline::duration) {
            None => {
                self.current_time = round_time(time, resolution).max(0.0);
                Ok(())
            }
            Some(duration) => {
                self.current_time = round_time(time.max(0.0).min(duration), resolution);
                self.forced = None;
                self.update_active(true)
            }
        }
    }

    /// Total duration; `NaN` until every child knows its metadata.
    pub fn duration(&self) -> f64 {
        self.timeline
            .as_ref()
            .map_or(f64::NAN, Timeline::duration)
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn seeking(&self) -> bool {
        self.seek.is_pending() || self.active.map_or(false, |active| self.children[active].seeking())
    }

    pub fn ended(&self) -> bool {
        self.timeline
            .as_ref()
            .map_or(false, |timeline| self.current_time == timeline.duration())
    }

    pub fn ready_state(&self) -> ReadyState {
        if self.readiness.is_ready() {
            ReadyState::HaveEnoughData
        } else if let Some(active) = self.active {
            self.children[active].ready_state()
        } else {
            ReadyState::HaveNothing
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Apply a volume to every child. Raises one `volume-changed` signal when
    /// the value actually changes.
    ///
    /// A child rejecting the value does not stop the others from receiving
    /// it; the first rejection is returned once every child was commanded.
    pub fn set_volume(&mut self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SequencerError::InvalidVolume(volume));
        }
        if volume == self.volume {
            return Ok(());
        }

        self.volume = volume;
        let result = self.broadcast(|child| child.set_volume(volume));
        self.emit(MediaEventKind::VolumeChanged);
        result
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) -> Result<()> {
        if muted == self.muted {
            return Ok(());
        }

        self.muted = muted;
        let result = self.broadcast(|child| child.set_muted(muted));
        self.emit(MediaEventKind::VolumeChanged);
        result
    }

    /// Video if any child is video.
    pub fn media_type(&self) -> MediaKind {
        if self.children.iter().any(|child| child.kind().is_video()) {
            MediaKind::Video
        } else {
            MediaKind::Audio
        }
    }

    /// Kind of the child that most recently became active. Kept after the
    /// end of the timeline; [`media_type`](Self::media_type) before any child
    /// was activated.
    pub fn current_kind(&self) -> MediaKind {
        self.last_active
            .map_or_else(|| self.media_type(), |child| self.children[child].kind())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// Listen to aggregate signals. Past signals are not replayed.
    pub fn subscribe(&self) -> Receiver<MediaSignal> {
        self.events.subscribe()
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn active_child(&self) -> Option<usize> {
        self.active
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&dyn MediaElement> {
        self.children.get(index).map(|child| child.as_ref())
    }

    pub fn relay_mode(&self, child: usize) -> RelayMode {
        self.relay.mode(child)
    }

    /// Whether a play request waits for the timeline.
    pub fn has_pending_play(&self) -> bool {
        self.pending_play
    }

    /// Run `command` on every child, returning the first rejection.
    fn broadcast<F>(&mut self, mut command: F) -> Result<()>
    where
        F: FnMut(&mut Box<dyn MediaElement>) -> bridge_traits::error::Result<()>,
    {
        let mut rejected = None;
        for child in &mut self.children {
            if let Err(err) = command(child) {
                warn!(
                    sequencer = %self.id,
                    child = %child.id(),
                    error = %err,
                    "Child media rejected a command"
                );
                rejected.get_or_insert(err);
            }
        }
        rejected.map_or(Ok(()), |err| Err(err.into()))
    }

    // ========================================================================
    // Readiness
    // ========================================================================

    fn sync_initial_readiness(&mut self) {
        for index in 0..self.children.len() {
            let state = self.children[index].ready_state();
            if state.has_metadata() {
                self.count_metadata(index);
            }
            if state.can_play_through() {
                self.count_play_through(index);
            }
        }
    }

    fn count_metadata(&mut self, child: usize) {
        if let Countdown::Counted { remaining } = self.readiness.mark_metadata(child) {
            if self.config.debug {
                debug!(
                    sequencer = %self.id,
                    child = %self.children[child].id(),
                    remaining,
                    "Child media ready"
                );
            }
            if remaining == 0 {
                self.lay_out();
            }
        }
    }

    fn count_play_through(&mut self, child: usize) {
        if self.readiness.mark_play_through(child) != Countdown::AlreadyCounted
            && self.readiness.take_play_through_signal()
        {
            self.emit(MediaEventKind::CanPlayThrough);
        }
    }

    // ========================================================================
    // Timeline
    // ========================================================================

    /// Child failures are logged here rather than returned: the timeline
    /// stays usable and the aggregate readiness signals still fire.
    fn lay_out(&mut self) {
        let resolution = self.config.time_resolution;
        let natives: Vec<f64> = self.children.iter().map(|child| child.duration()).collect();
        let timeline = Timeline::layout(&self.windows, &natives, resolution);

        for (child, span) in self.children.iter_mut().zip(timeline.spans()) {
            if !child.positions_on_setup() || !needs_seek(child.current_time(), span.clip_begin, resolution) {
                continue;
            }
            // Activation seeks it again if it is ever selected
            if let Err(err) = child.set_current_time(span.clip_begin) {
                warn!(sequencer = %self.id, child = %child.id(), error = %err, "Failed to position child media");
            }
        }
        self.relay.set_all(RelayMode::Suppress);

        let duration = timeline.duration();
        self.current_time = self.current_time.max(0.0).min(duration);
        self.timeline = Some(timeline);

        if self.config.debug {
            debug!(sequencer = %self.id, duration, "Sequencer ready");
        }

        if let Err(err) = self.update_active(true) {
            warn!(sequencer = %self.id, error = %err, "Failed to align the initial child media");
        }

        self.emit(MediaEventKind::DurationKnown);
        self.emit(MediaEventKind::MetadataKnown);
        self.emit(MediaEventKind::DataLoaded);
        if self.readiness.take_play_through_signal() {
            self.emit(MediaEventKind::CanPlayThrough);
        }

        if self.pending_play {
            self.pending_play = false;
            // Hosts routinely refuse unattended playback
            if let Err(err) = self.play() {
                warn!(sequencer = %self.id, error = %err, "Deferred play was refused");
                self.paused = true;
            }
        }
    }

    fn span(&self, child: usize) -> Option<ClipSpan> {
        self.timeline
            .as_ref()
            .and_then(|timeline| timeline.span(child))
            .copied()
    }

    fn rewind_if_ended(&mut self) -> Result<()> {
        if self.ended() {
            self.current_time = 0.0;
            self.update_active(false)?;
        }
        Ok(())
    }

    // ========================================================================
    // Active child transitions
    // ========================================================================

    fn update_active(&mut self, realign: bool) -> Result<()> {
        let Some(timeline) = self.timeline.as_ref() else {
            return Ok(());
        };

        let Selection { transition, time } = selector::select(timeline, self.active, self.current_time);
        self.current_time = time;

        match transition {
            Transition::Stay(child) => {
                if realign {
                    self.realign(child)?;
                }
            }
            Transition::Switch { from, to } => {
                if let Some(from) = from {
                    self.deactivate(from)?;
                }
                self.activate(to);
                self.realign(to)?;
            }
            Transition::End { from } => {
                self.deactivate(from)?;
                self.paused = true;
                self.emit(MediaEventKind::Ended);
            }
            Transition::Idle => {}
        }
        Ok(())
    }

    fn activate(&mut self, child: usize) {
        self.active = Some(child);
        self.last_active = Some(child);
        let media = &mut self.children[child];
        media.set_active(true);

        if self.config.debug {
            debug!(
                sequencer = %self.id,
                child = %media.id(),
                kind = %media.kind(),
                time = self.current_time,
                "New current child media"
            );
        }
    }

    fn deactivate(&mut self, child: usize) -> Result<()> {
        self.seek.reset();
        self.relay.set_mode(child, RelayMode::Suppress);
        self.active = None;
        if self.forced == Some(child) {
            self.forced = None;
        }

        let media = &mut self.children[child];
        if !media.paused() {
            media.pause()?;
        }
        media.set_active(false);
        Ok(())
    }

    /// Bring `child` to the position matching the global time, then relay it.
    fn realign(&mut self, child: usize) -> Result<()> {
        let Some(span) = self.span(child) else {
            return Ok(());
        };
        let target = span.to_local(self.current_time);
        self.relay.set_mode(child, RelayMode::Suppress);

        let position = self.children[child].current_time();
        if needs_seek(position, target, self.config.time_resolution) {
            if let Err(err) = self.children[child].set_current_time(target) {
                warn!(
                    sequencer = %self.id,
                    child = %self.children[child].id(),
                    local = target,
                    error = %err,
                    "Child media refused to seek"
                );
                // Relay from wherever the child stayed
                self.complete_alignment(child, false)?;
                return Err(err.into());
            }
            self.seek.begin(child, target, true);
            self.emit(MediaEventKind::Seeking);
        } else if self.children[child].seeking() {
            // Already heading there; wait silently for its completion
            self.seek.begin(child, target, false);
        } else {
            self.complete_alignment(child, false)?;
        }
        Ok(())
    }

    fn complete_alignment(&mut self, child: usize, announced: bool) -> Result<()> {
        let Some(span) = self.span(child) else {
            return Ok(());
        };

        let local = self.children[child].current_time();
        self.current_time = landing_time(
            &span,
            local,
            self.config.time_resolution,
            self.config.boundary_epsilon,
        );
        self.forced = Some(child);
        self.seek.relay(child);
        self.relay.set_mode(child, RelayMode::Forward);

        if self.config.debug {
            debug!(
                sequencer = %self.id,
                child = %self.children[child].id(),
                time = self.current_time,
                "Start to relay events"
            );
        }

        if announced {
            self.emit(MediaEventKind::Seeked);
        }
        self.emit(MediaEventKind::Progress);

        let media = &mut self.children[child];
        if !self.paused && media.paused() {
            media.play()?;
        }
        Ok(())
    }

    fn on_tick(&mut self, child: usize, ended: bool) -> Result<()> {
        let Some(span) = self.span(child) else {
            return Ok(());
        };

        let local = self.children[child].current_time();
        let mut time = round_time(span.to_global(local), self.config.time_resolution)
            .max(0.0)
            .min(self.duration());

        if ended {
            // A finished clip hands over even right after a landed seek
            self.forced = None;
            time = time.max(span.end);
        }

        match self.forced.take().and_then(|forced| self.span(forced)) {
            Some(forced) => {
                self.current_time = clamp_into(&forced, time, self.config.boundary_epsilon);
            }
            None => {
                self.current_time = time;
                self.update_active(false)?;
            }
        }

        self.emit(MediaEventKind::Progress);
        Ok(())
    }

    fn emit(&self, kind: MediaEventKind) {
        trace!(sequencer = %self.id, signal = %kind, time = self.current_time, "Aggregate signal");
        // No subscriber is not an error
        self.events.emit(MediaSignal::new(kind, self.id.clone())).ok();
    }
}

impl fmt::Debug for MediaSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSequencer")
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("current_time", &self.current_time)
            .field("duration", &self.duration())
            .field("paused", &self.paused)
            .field("active", &self.active)
            .field("seek", &self.seek.phase())
            .finish()
    }
}

impl MediaElement for MediaSequencer {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> MediaKind {
        self.media_type()
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, time: f64) -> bridge_traits::error::Result<()> {
        MediaSequencer::set_current_time(self, time).map_err(BridgeError::from)
    }

    fn duration(&self) -> f64 {
        MediaSequencer::duration(self)
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn seeking(&self) -> bool {
        MediaSequencer::seeking(self)
    }

    fn ended(&self) -> bool {
        MediaSequencer::ended(self)
    }

    fn ready_state(&self) -> ReadyState {
        MediaSequencer::ready_state(self)
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) -> bridge_traits::error::Result<()> {
        MediaSequencer::set_volume(self, volume).map_err(BridgeError::from)
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) -> bridge_traits::error::Result<()> {
        MediaSequencer::set_muted(self, muted).map_err(BridgeError::from)
    }

    fn play(&mut self) -> bridge_traits::error::Result<()> {
        MediaSequencer::play(self).map_err(BridgeError::from)
    }

    fn pause(&mut self) -> bridge_traits::error::Result<()> {
        MediaSequencer::pause(self).map_err(BridgeError::from)
    }
}
