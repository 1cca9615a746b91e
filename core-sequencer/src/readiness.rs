//! # Readiness Aggregator
//!
//! Two countdowns, one per readiness tier, both starting at the number of
//! children. A child is counted at most once per tier, whether its readiness
//! was observed at build time or arrived as a signal later.

/// Result of counting one child's readiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The child had already been counted for this tier.
    AlreadyCounted,
    /// The child was counted; `remaining` children are still pending.
    Counted { remaining: usize },
}

impl Countdown {
    /// Whether this very signal brought the countdown to zero.
    pub fn completed(&self) -> bool {
        matches!(self, Countdown::Counted { remaining: 0 })
    }
}

#[derive(Debug, Clone)]
pub struct ReadinessAggregator {
    metadata: Vec<bool>,
    play_through: Vec<bool>,
    metadata_pending: usize,
    play_through_pending: usize,
    play_through_signalled: bool,
}

impl ReadinessAggregator {
    pub fn new(children: usize) -> Self {
        Self {
            metadata: vec![false; children],
            play_through: vec![false; children],
            metadata_pending: children,
            play_through_pending: children,
            play_through_signalled: false,
        }
    }

    /// Count a child whose metadata became known.
    pub fn mark_metadata(&mut self, child: usize) -> Countdown {
        Self::mark(&mut self.metadata, &mut self.metadata_pending, child)
    }

    /// Count a child that can play through without stalling.
    pub fn mark_play_through(&mut self, child: usize) -> Countdown {
        Self::mark(&mut self.play_through, &mut self.play_through_pending, child)
    }

    fn mark(seen: &mut [bool], pending: &mut usize, child: usize) -> Countdown {
        match seen.get_mut(child) {
            Some(flag) if !*flag => {
                *flag = true;
                *pending -= 1;
                Countdown::Counted { remaining: *pending }
            }
            _ => Countdown::AlreadyCounted,
        }
    }

    pub fn metadata_complete(&self) -> bool {
        self.metadata_pending == 0
    }

    pub fn play_through_complete(&self) -> bool {
        self.play_through_pending == 0
    }

    /// Both tiers reached zero.
    pub fn is_ready(&self) -> bool {
        self.metadata_complete() && self.play_through_complete()
    }

    /// Returns `true` exactly once, the first time both tiers are complete.
    ///
    /// The play-through tier is held back until metadata is complete even if
    /// its own countdown finished first.
    pub fn take_play_through_signal(&mut self) -> bool {
        if self.play_through_signalled || !self.is_ready() {
            return false;
        }
        self.play_through_signalled = true;
        true
    }
}
