//! # Seek Coordinator
//!
//! Aligns the active child with the global time before its signals are
//! relayed again.
//!
//! ## State machine
//!
//! ```text
//!          begin()               land()
//!  Idle ────────────> AwaitingSeek ───────> Relaying
//!   │                   │    ▲                  ▲
//!   │                   └────┘ begin()          │
//!   │                   (supersedes)            │
//!   └───────────────────────────────────────────┘
//!                    relay() (already positioned)
//! ```
//!
//! A pending seek holds a [`SeekToken`]. Starting another seek replaces the
//! token, so whichever completion arrives next lands the newest intent and a
//! stale one can never resume relaying on its own.
//!
//! Backends differ on superseded seeks: some confirm every request, others
//! only the last one. The coordinator counts the confirmations it may still
//! receive for the landed child and [`absorb`](SeekCoordinator::absorb)s them
//! so they are not relayed as a second `seeked`.

use crate::timeline::{round_time, ClipSpan};

/// Identifies one seek request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeekToken(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekPhase {
    Idle,
    AwaitingSeek {
        child: usize,
        token: SeekToken,
        /// Clip-local target position.
        target: f64,
        /// Whether an aggregate `seeking` signal was raised for this wait.
        announced: bool,
        /// Confirmations the child may send for this wait.
        expected: u32,
    },
    Relaying {
        child: usize,
        /// Confirmations of superseded seeks still in flight.
        stale: u32,
    },
}

/// A seek that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub token: SeekToken,
    pub announced: bool,
}

#[derive(Debug, Clone)]
pub struct SeekCoordinator {
    phase: SeekPhase,
    next_token: u64,
}

impl Default for SeekCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeekCoordinator {
    pub fn new() -> Self {
        Self {
            phase: SeekPhase::Idle,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> SeekPhase {
        self.phase
    }

    /// Start waiting for `child` to reach `target`, superseding any pending
    /// seek. An announcement made for a superseded wait carries over.
    ///
    /// `announced` means a seek was issued on the child for this wait; an
    /// unannounced wait follows a seek the child was already performing.
    pub fn begin(&mut self, child: usize, target: f64, announced: bool) -> SeekToken {
        let (carried, expected) = match self.phase {
            SeekPhase::AwaitingSeek {
                child: pending,
                announced: was_announced,
                expected,
                ..
            } if pending == child => (was_announced, expected + u32::from(announced)),
            _ => (false, 1),
        };

        let token = SeekToken(self.next_token);
        self.next_token += 1;
        self.phase = SeekPhase::AwaitingSeek {
            child,
            token,
            target,
            announced: announced || carried,
            expected,
        };
        token
    }

    /// Complete the pending seek if `child` is the one being waited for.
    pub fn land(&mut self, child: usize) -> Option<Landing> {
        match self.phase {
            SeekPhase::AwaitingSeek {
                child: pending,
                token,
                announced,
                expected,
                ..
            } if pending == child => {
                self.phase = SeekPhase::Relaying {
                    child,
                    stale: expected.saturating_sub(1),
                };
                Some(Landing { token, announced })
            }
            _ => None,
        }
    }

    /// Swallow a late confirmation of a superseded seek on the relayed child.
    pub fn absorb(&mut self, child: usize) -> bool {
        match &mut self.phase {
            SeekPhase::Relaying { child: relayed, stale } if *relayed == child && *stale > 0 => {
                *stale -= 1;
                true
            }
            _ => false,
        }
    }

    /// Start relaying `child` without waiting.
    pub fn relay(&mut self, child: usize) {
        self.phase = SeekPhase::Relaying { child, stale: 0 };
    }

    /// Drop any pending seek and stop relaying.
    pub fn reset(&mut self) {
        self.phase = SeekPhase::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SeekPhase::AwaitingSeek { .. })
    }

    pub fn pending_child(&self) -> Option<usize> {
        match self.phase {
            SeekPhase::AwaitingSeek { child, .. } => Some(child),
            _ => None,
        }
    }

    pub fn relaying_child(&self) -> Option<usize> {
        match self.phase {
            SeekPhase::Relaying { child, .. } => Some(child),
            _ => None,
        }
    }
}

/// Whether a child at `current` must seek to reach `target`.
pub fn needs_seek(current: f64, target: f64, resolution: f64) -> bool {
    !((current - target).abs() < resolution)
}

/// Global time after landing in `span` at clip-local position `local`.
///
/// The result is kept at least `epsilon` below the clip's end so the landed
/// clip is not immediately deselected. Clips shorter than `epsilon` land on
/// their start.
pub fn landing_time(span: &ClipSpan, local: f64, resolution: f64, epsilon: f64) -> f64 {
    clamp_into(span, round_time(span.to_global(local), resolution), epsilon)
}

/// Clamp a global time to `[begin, max(begin, end - epsilon)]`.
pub fn clamp_into(span: &ClipSpan, time: f64, epsilon: f64) -> f64 {
    let upper = span.begin.max(span.end - epsilon);
    time.max(span.begin).min(upper)
}
