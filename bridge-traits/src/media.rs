//! Media element capability contract and supporting signal types.
//!
//! Every playback backend (native player, plugin-based player, third-party
//! streaming widget) is adapted by the host into a [`MediaElement`]. The
//! composition core commands children exclusively through this trait, and the
//! composed player implements the very same trait so it can stand in wherever
//! a single element is expected.
//!
//! Signals are not delivered through callbacks registered on the element.
//! Instead the host forwards each backend signal, tagged with a
//! [`MediaEventKind`], to whichever component owns the element. That owner
//! decides whether the signal is intercepted or allowed to continue.

use crate::{error::Result, platform::PlatformSend};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the media resource the element knows about.
///
/// The composition core only distinguishes three levels: nothing known,
/// metadata known, and fully ready. The intermediate levels are kept so that
/// backends can report their state faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReadyState {
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Numeric level as exposed by the element contract.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Build a ready state from its numeric level. Levels above 4 saturate.
    pub fn from_u8(level: u8) -> Self {
        match level {
            0 => Self::HaveNothing,
            1 => Self::HaveMetadata,
            2 => Self::HaveCurrentData,
            3 => Self::HaveFutureData,
            _ => Self::HaveEnoughData,
        }
    }

    /// Returns `true` once the duration and dimensions are known.
    pub fn has_metadata(self) -> bool {
        self >= Self::HaveMetadata
    }

    /// Returns `true` when playback can proceed to the end without stalling.
    pub fn can_play_through(self) -> bool {
        self == Self::HaveEnoughData
    }
}

impl Default for ReadyState {
    fn default() -> Self {
        Self::HaveNothing
    }
}

/// Kind of media carried by an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals raised by a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaEventKind {
    /// Periodic time advance.
    Progress,
    Seeking,
    Seeked,
    Play,
    Playing,
    Pause,
    RateChange,
    CanPlay,
    MetadataKnown,
    DurationKnown,
    DataLoaded,
    CanPlayThrough,
    VolumeChanged,
    Ended,
    Error,
    LoadStart,
    Waiting,
    Stalled,
    Abort,
    Emptied,
}

/// Coarse grouping of [`MediaEventKind`] used by relay policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Load, duration and volume signals. Only meaningful per element.
    Transport,
    /// Play/pause/seek/rate/buffering signals of the element currently playing.
    Playback,
    /// Time advance and end of media.
    Progress,
    /// Readiness tiers: metadata known, can play through.
    Readiness,
    /// Backend failures.
    Failure,
}

impl MediaEventKind {
    pub const ALL: [MediaEventKind; 20] = [
        MediaEventKind::Progress,
        MediaEventKind::Seeking,
        MediaEventKind::Seeked,
        MediaEventKind::Play,
        MediaEventKind::Playing,
        MediaEventKind::Pause,
        MediaEventKind::RateChange,
        MediaEventKind::CanPlay,
        MediaEventKind::MetadataKnown,
        MediaEventKind::DurationKnown,
        MediaEventKind::DataLoaded,
        MediaEventKind::CanPlayThrough,
        MediaEventKind::VolumeChanged,
        MediaEventKind::Ended,
        MediaEventKind::Error,
        MediaEventKind::LoadStart,
        MediaEventKind::Waiting,
        MediaEventKind::Stalled,
        MediaEventKind::Abort,
        MediaEventKind::Emptied,
    ];

    /// Wire name of the signal.
    pub fn name(&self) -> &'static str {
        match self {
            MediaEventKind::Progress => "progress",
            MediaEventKind::Seeking => "seeking",
            MediaEventKind::Seeked => "seeked",
            MediaEventKind::Play => "play",
            MediaEventKind::Playing => "playing",
            MediaEventKind::Pause => "pause",
            MediaEventKind::RateChange => "rate-change",
            MediaEventKind::CanPlay => "can-play",
            MediaEventKind::MetadataKnown => "metadata-known",
            MediaEventKind::DurationKnown => "duration-known",
            MediaEventKind::DataLoaded => "data-loaded",
            MediaEventKind::CanPlayThrough => "can-play-through",
            MediaEventKind::VolumeChanged => "volume-changed",
            MediaEventKind::Ended => "ended",
            MediaEventKind::Error => "error",
            MediaEventKind::LoadStart => "load-start",
            MediaEventKind::Waiting => "waiting",
            MediaEventKind::Stalled => "stalled",
            MediaEventKind::Abort => "abort",
            MediaEventKind::Emptied => "emptied",
        }
    }

    pub fn class(&self) -> EventClass {
        match self {
            MediaEventKind::DurationKnown
            | MediaEventKind::DataLoaded
            | MediaEventKind::VolumeChanged => EventClass::Transport,
            MediaEventKind::Progress | MediaEventKind::Ended => EventClass::Progress,
            MediaEventKind::MetadataKnown | MediaEventKind::CanPlayThrough => {
                EventClass::Readiness
            }
            MediaEventKind::Error => EventClass::Failure,
            MediaEventKind::Seeking
            | MediaEventKind::Seeked
            | MediaEventKind::Play
            | MediaEventKind::Playing
            | MediaEventKind::Pause
            | MediaEventKind::RateChange
            | MediaEventKind::CanPlay
            | MediaEventKind::LoadStart
            | MediaEventKind::Waiting
            | MediaEventKind::Stalled
            | MediaEventKind::Abort
            | MediaEventKind::Emptied => EventClass::Playback,
        }
    }
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A signal together with the identifier of the element that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSignal {
    pub kind: MediaEventKind,
    pub origin: String,
}

impl MediaSignal {
    pub fn new(kind: MediaEventKind, origin: impl Into<String>) -> Self {
        Self {
            kind,
            origin: origin.into(),
        }
    }
}

impl fmt::Display for MediaSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.origin)
    }
}

/// Playback-control surface of one media element.
///
/// Times are expressed in seconds on the element's own timebase. Setters and
/// commands are fallible because they usually cross into a backend that can
/// reject them; getters report the backend's latest known state.
///
/// The clip window accessors expose the construction-time trim attributes a
/// host attached to the element. They default to "no trim".
pub trait MediaElement: PlatformSend {
    /// Identifier used in logs and as the origin of relayed signals.
    fn id(&self) -> &str;

    /// Whether the element renders audio only or video.
    fn kind(&self) -> MediaKind;

    /// Trim start, in seconds of the element's own timebase.
    fn clip_begin(&self) -> Option<f64> {
        None
    }

    /// Trim end, in seconds of the element's own timebase.
    fn clip_end(&self) -> Option<f64> {
        None
    }

    /// Whether a composing container may move the element to its trim start
    /// while laying out the timeline. Backends that cannot seek before their
    /// first play return `false`.
    fn positions_on_setup(&self) -> bool {
        true
    }

    /// Marks the element as the one currently owning playback.
    fn set_active(&mut self, _active: bool) {}

    fn current_time(&self) -> f64;

    /// Requests a seek. Completion is reported with [`MediaEventKind::Seeked`].
    fn set_current_time(&mut self, time: f64) -> Result<()>;

    /// Native duration; `NaN` while unknown.
    fn duration(&self) -> f64;

    fn paused(&self) -> bool;

    fn seeking(&self) -> bool;

    fn ended(&self) -> bool;

    fn ready_state(&self) -> ReadyState;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64) -> Result<()>;

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;
}
