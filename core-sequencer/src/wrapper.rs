//! # Media Wrapper
//!
//! Stand-in element for a backend that cannot take the place of the element
//! it replaces (a plugin object, a streaming widget). The wrapper keeps the
//! replaced element's identity and trim window, delegates every property and
//! command to the base, and re-labels the base's signals as its own.

use crate::ids::IdGenerator;
use crate::timeline::ClipWindow;
use bridge_traits::error::Result;
use bridge_traits::{MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
use std::fmt;

/// Signals are not observed by the wrapper itself. The host receives them
/// from the base backend and publishes [`relay`](MediaWrapper::relay)'s
/// result to the wrapper's listeners, or hands them to the owning sequencer
/// as the wrapper's own when the wrapper is one of its children.
pub struct MediaWrapper {
    id: String,
    window: ClipWindow,
    base: Box<dyn MediaElement>,
}

impl MediaWrapper {
    /// Wrap `base` under `id`. An empty id takes the next id of `ids`.
    ///
    /// The trim window defaults to the one the base carries.
    pub fn new(base: Box<dyn MediaElement>, id: impl Into<String>, ids: &mut IdGenerator) -> Self {
        let id = id.into();
        let id = if id.is_empty() {
            ids.next_id()
        } else {
            ids.reserve(id.clone());
            id
        };

        Self {
            id,
            window: ClipWindow::from_element(base.as_ref()),
            base,
        }
    }

    /// Override the trim window.
    pub fn with_clip_window(mut self, window: ClipWindow) -> Self {
        self.window = window;
        self
    }

    /// Re-label a signal raised by the base.
    pub fn relay(&self, kind: MediaEventKind) -> MediaSignal {
        MediaSignal::new(kind, self.id.clone())
    }

    pub fn base(&self) -> &dyn MediaElement {
        self.base.as_ref()
    }

    pub fn into_base(self) -> Box<dyn MediaElement> {
        self.base
    }
}

impl fmt::Debug for MediaWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaWrapper")
            .field("id", &self.id)
            .field("window", &self.window)
            .field("base", &self.base.id())
            .finish()
    }
}

impl MediaElement for MediaWrapper {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> MediaKind {
        self.base.kind()
    }

    fn clip_begin(&self) -> Option<f64> {
        Some(self.window.clip_begin)
    }

    fn clip_end(&self) -> Option<f64> {
        self.window.clip_end
    }

    // The base may not accept a seek before its first play
    fn positions_on_setup(&self) -> bool {
        false
    }

    fn set_active(&mut self, active: bool) {
        self.base.set_active(active);
    }

    fn current_time(&self) -> f64 {
        self.base.current_time()
    }

    fn set_current_time(&mut self, time: f64) -> Result<()> {
        self.base.set_current_time(time)
    }

    fn duration(&self) -> f64 {
        self.base.duration()
    }

    fn paused(&self) -> bool {
        self.base.paused()
    }

    fn seeking(&self) -> bool {
        self.base.seeking()
    }

    fn ended(&self) -> bool {
        self.base.ended()
    }

    fn ready_state(&self) -> ReadyState {
        self.base.ready_state()
    }

    fn volume(&self) -> f64 {
        self.base.volume()
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.base.set_volume(volume)
    }

    fn muted(&self) -> bool {
        self.base.muted()
    }

    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.base.set_muted(muted)
    }

    fn play(&mut self) -> Result<()> {
        self.base.play()
    }

    fn pause(&mut self) -> Result<()> {
        self.base.pause()
    }
}
