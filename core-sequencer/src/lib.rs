//! # Media Sequencer Module
//!
//! Composes several trimmed child media into one continuous timeline exposed
//! through the same [`MediaElement`](bridge_traits::MediaElement) surface as a
//! single player.
//!
//! ## Overview
//!
//! This module handles:
//! - Laying clips back to back once their durations are known ([`timeline`])
//! - Counting child readiness per tier ([`readiness`])
//! - Selecting the clip that owns a global time ([`selector`])
//! - Aligning the owning clip before its signals are relayed ([`seek`])
//! - Gating which child signals reach outer listeners ([`relay`])
//! - The composed player itself ([`MediaSequencer`])
//! - Wrapping backends that cannot replace an element directly ([`MediaWrapper`])

pub mod error;
pub mod ids;
pub mod readiness;
pub mod relay;
pub mod seek;
pub mod selector;
pub mod sequencer;
pub mod timeline;
pub mod wrapper;

pub use error::{Result, SequencerError};
pub use ids::IdGenerator;
pub use relay::RelayMode;
pub use sequencer::{MediaSequencer, MediaSequencerBuilder, Propagation};
pub use timeline::{round_time, ClipSpan, ClipWindow, Timeline};
pub use wrapper::MediaWrapper;
