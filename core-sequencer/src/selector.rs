//! # Active Child Selector
//!
//! Decides which clip owns playback at a given global time.

use crate::timeline::Timeline;

/// Outcome of re-evaluating the active clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The current owner keeps playback.
    Stay(usize),
    /// Ownership moves to `to`.
    Switch { from: Option<usize>, to: usize },
    /// Playback ran off the end of the timeline while `from` was active.
    End { from: usize },
    /// No clip owned playback and none does now.
    Idle,
}

/// Result of [`select`]: the transition plus the possibly corrected time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub transition: Transition,
    pub time: f64,
}

/// Select the owner of `time` given the currently active clip.
///
/// The first clip with `begin <= time < end` wins. When no clip matches the
/// time is treated as the end of the timeline and snapped to its duration.
pub fn select(timeline: &Timeline, active: Option<usize>, time: f64) -> Selection {
    let selected = timeline.clip_at(time);
    let time = match selected {
        None if time != timeline.duration() => timeline.duration(),
        _ => time,
    };

    let transition = match (active, selected) {
        (Some(current), Some(next)) if current == next => Transition::Stay(current),
        (from, Some(to)) => Transition::Switch { from, to },
        (Some(from), None) => Transition::End { from },
        (None, None) => Transition::Idle,
    };

    Selection { transition, time }
}
