//! # Timeline Builder
//!
//! Lays child clips back to back on one global timeline.
//!
//! ## Overview
//!
//! Each child carries a trim window ([`ClipWindow`]) read once at build time.
//! When every child knows its native duration, [`Timeline::layout`] resolves
//! the windows into [`ClipSpan`]s:
//!
//! ```text
//!   child 0            child 1                  child 2
//! ┌──────────────┐ ┌──────────────────────┐ ┌──────────┐
//! │ [0, 30)      │ │ [30, 70)             │ │ [70, 85) │
//! └──────────────┘ └──────────────────────┘ └──────────┘
//! 0              30                       70          85 = duration
//! ```
//!
//! Every boundary is rounded to the configured time resolution so that a
//! boundary can never be missed or counted twice through floating point drift.

use crate::error::{Result, SequencerError};
use bridge_traits::MediaElement;
use tracing::warn;

/// Round `seconds` to the nearest multiple of `resolution`.
///
/// ```rust
/// use core_sequencer::timeline::round_time;
///
/// assert_eq!(round_time(1.23456, 0.001), 1.235);
/// assert_eq!(round_time(0.1 + 0.2, 0.001), 0.3);
/// ```
pub fn round_time(seconds: f64, resolution: f64) -> f64 {
    let scale = 1.0 / resolution;
    (seconds * scale).round() / scale
}

/// Trim attributes of one child, in seconds of the child's own timebase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub clip_begin: f64,
    /// `None` plays up to the native duration.
    pub clip_end: Option<f64>,
}

impl Default for ClipWindow {
    fn default() -> Self {
        Self {
            clip_begin: 0.0,
            clip_end: None,
        }
    }
}

impl ClipWindow {
    /// Build a window from explicit attributes.
    ///
    /// A `clip_end` of zero, below zero, or not finite means "native duration".
    pub fn new(clip_begin: Option<f64>, clip_end: Option<f64>) -> Self {
        Self {
            clip_begin: clip_begin.unwrap_or(0.0),
            clip_end: clip_end.filter(|end| end.is_finite() && *end > 0.0),
        }
    }

    /// Read the window attached to a child element.
    pub fn from_element(element: &dyn MediaElement) -> Self {
        Self::new(element.clip_begin(), element.clip_end())
    }

    /// Reject windows that cannot describe a clip.
    pub fn validate(&self, child: usize) -> Result<()> {
        let begin_ok = self.clip_begin.is_finite() && self.clip_begin >= 0.0;
        let end_ok = self.clip_end.map_or(true, |end| end > self.clip_begin);

        if begin_ok && end_ok {
            Ok(())
        } else {
            Err(SequencerError::InvalidClipWindow {
                child,
                clip_begin: self.clip_begin,
                clip_end: self.clip_end,
            })
        }
    }
}

/// Resolved position of one clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipSpan {
    /// Trim start on the child's timebase.
    pub clip_begin: f64,
    /// Trim end on the child's timebase.
    pub clip_end: f64,
    /// Start on the global timeline.
    pub begin: f64,
    /// End on the global timeline (exclusive).
    pub end: f64,
}

impl ClipSpan {
    /// Length on the global timeline.
    pub fn length(&self) -> f64 {
        self.end - self.begin
    }

    /// Whether the clip occupies no time at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Half-open membership test: `begin <= time < end`.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.begin && time < self.end
    }

    /// Convert a global time to the child's own timebase.
    pub fn to_local(&self, time: f64) -> f64 {
        time - self.begin + self.clip_begin
    }

    /// Convert a position on the child's own timebase to global time.
    pub fn to_global(&self, local: f64) -> f64 {
        local + self.begin - self.clip_begin
    }
}

/// Ordered, contiguous clip spans together with the total duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    spans: Vec<ClipSpan>,
    duration: f64,
}

impl Timeline {
    /// Lay out clips in order.
    ///
    /// `native_durations[i]` is the duration child `i` reports; `NaN` when
    /// unknown. A clip whose effective end does not lie after its start gets
    /// zero length and can never become active.
    pub fn layout(windows: &[ClipWindow], native_durations: &[f64], resolution: f64) -> Self {
        let mut spans = Vec::with_capacity(windows.len());
        let mut begin = 0.0;

        for (index, (window, native)) in windows.iter().zip(native_durations).enumerate() {
            let mut clip_end = window.clip_end.unwrap_or(*native);

            // Also catches an unknown (NaN) native duration
            if !(clip_end > window.clip_begin) {
                warn!(
                    child = index,
                    clip_begin = window.clip_begin,
                    clip_end,
                    "Clip has no playable length"
                );
                clip_end = window.clip_begin;
            }

            let end = round_time(begin + (clip_end - window.clip_begin), resolution);
            spans.push(ClipSpan {
                clip_begin: window.clip_begin,
                clip_end,
                begin,
                end,
            });
            begin = end;
        }

        Self {
            spans,
            duration: begin,
        }
    }

    /// Total duration, the rounded sum of every clip length.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn spans(&self) -> &[ClipSpan] {
        &self.spans
    }

    pub fn span(&self, child: usize) -> Option<&ClipSpan> {
        self.spans.get(child)
    }

    /// First clip whose span contains `time`.
    pub fn clip_at(&self, time: f64) -> Option<usize> {
        self.spans.iter().position(|span| span.contains(time))
    }
}
