//! # Event Relay Controller
//!
//! Decides, per child, what happens to each signal the host delivers.
//!
//! ## Policy
//!
//! | Class      | `Detached`   | `Suppress`  | `Forward`          |
//! |------------|--------------|-------------|--------------------|
//! | Transport  | pass         | suppress    | suppress           |
//! | Playback   | pass         | suppress    | forward            |
//! | Progress   | pass         | suppress    | translate to tick  |
//! | Readiness  | count        | count       | count              |
//! | Failure    | relay        | relay       | relay              |
//!
//! Transport signals are synthesized once by the sequencer for the whole
//! timeline, so children's own are never relayed. Exactly one child is in
//! `Forward` mode at a time; switching modes happens inside the sequencer's
//! transition, so a signal can never be seen under both modes.

use bridge_traits::{EventClass, MediaEventKind};

/// Relay behaviour of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayMode {
    /// Timeline not laid out yet; the sequencer has no interest.
    #[default]
    Detached,
    /// Intercept and discard.
    Suppress,
    /// Re-publish as the sequencer's own signal.
    Forward,
}

/// What the sequencer does with one child signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    /// Let the host deliver the signal elsewhere.
    Pass,
    /// Intercept and discard.
    Suppress,
    /// Re-publish the same kind under the sequencer's identity.
    Forward(MediaEventKind),
    /// Recompute global time from the child's position.
    Tick,
    /// The child reached its own end.
    EndTick,
    /// Count towards a readiness tier.
    Readiness(MediaEventKind),
    /// Relay a failure.
    Fail,
}

impl RelayAction {
    /// Whether the host must stop delivering the signal.
    pub fn intercepts(&self) -> bool {
        !matches!(self, RelayAction::Pass)
    }
}

#[derive(Debug, Clone)]
pub struct RelayController {
    modes: Vec<RelayMode>,
}

impl RelayController {
    pub fn new(children: usize) -> Self {
        Self {
            modes: vec![RelayMode::Detached; children],
        }
    }

    pub fn mode(&self, child: usize) -> RelayMode {
        self.modes.get(child).copied().unwrap_or_default()
    }

    pub fn set_mode(&mut self, child: usize, mode: RelayMode) {
        if let Some(slot) = self.modes.get_mut(child) {
            *slot = mode;
        }
    }

    /// Switch every child to `mode`.
    pub fn set_all(&mut self, mode: RelayMode) {
        self.modes.iter_mut().for_each(|slot| *slot = mode);
    }

    /// Child currently forwarding, if any.
    pub fn forwarding(&self) -> Option<usize> {
        self.modes.iter().position(|mode| *mode == RelayMode::Forward)
    }

    pub fn decide(&self, child: usize, kind: MediaEventKind) -> RelayAction {
        let mode = self.mode(child);

        match kind.class() {
            EventClass::Readiness => RelayAction::Readiness(kind),
            EventClass::Failure => RelayAction::Fail,
            _ if mode == RelayMode::Detached => RelayAction::Pass,
            EventClass::Transport => RelayAction::Suppress,
            EventClass::Playback if mode == RelayMode::Forward => RelayAction::Forward(kind),
            EventClass::Progress if mode == RelayMode::Forward => {
                if kind == MediaEventKind::Ended {
                    RelayAction::EndTick
                } else {
                    RelayAction::Tick
                }
            }
            EventClass::Playback | EventClass::Progress => RelayAction::Suppress,
        }
    }
}
