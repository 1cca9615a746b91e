//! Workspace umbrella crate.
//!
//! Re-exports the workspace crates so a host can depend on
//! `mediaseq-workspace` alone. The composed player sits behind the
//! `sequencer` feature (enabled by default); hosts that only implement the
//! element contract can turn it off.

pub use bridge_traits;
pub use core_runtime;

#[cfg(feature = "sequencer")]
pub use core_sequencer;

pub use bridge_traits::{MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
pub use core_runtime::config::SequencerConfig;
pub use core_runtime::events::EventBus;

#[cfg(feature = "sequencer")]
pub use core_sequencer::{MediaSequencer, MediaWrapper, Propagation};
