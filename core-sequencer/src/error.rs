//! # Sequencer Error Types
//!
//! Errors raised while building or driving a composed player.

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur while composing child media.
#[derive(Error, Debug)]
pub enum SequencerError {
    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// A sequencer was built without any child media.
    #[error("A sequencer needs at least one child media")]
    NoChildren,

    /// A child carries a trim window that cannot describe a clip.
    #[error("Invalid clip window on child {child}: begin {clip_begin}, end {clip_end:?}")]
    InvalidClipWindow {
        child: usize,
        clip_begin: f64,
        clip_end: Option<f64>,
    },

    // ========================================================================
    // Control Errors
    // ========================================================================
    /// A signal was delivered for a child index the sequencer does not own.
    #[error("Unknown child media: {0}")]
    UnknownChild(usize),

    /// A position that is not a number was requested.
    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f64),

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// A child media rejected a command.
    #[error("Child media error: {0}")]
    Bridge(#[from] BridgeError),

    /// Runtime configuration error.
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl SequencerError {
    /// Returns `true` if the error originates from a child backend rather
    /// than from the composition itself.
    pub fn is_child_failure(&self) -> bool {
        matches!(self, SequencerError::Bridge(_))
    }
}

/// A composed player is itself a [`MediaElement`](bridge_traits::MediaElement),
/// so its failures must be expressible as bridge errors.
impl From<SequencerError> for BridgeError {
    fn from(error: SequencerError) -> Self {
        match error {
            SequencerError::Bridge(inner) => inner,
            SequencerError::InvalidTime(time) => BridgeError::invalid_value("current_time", time),
            SequencerError::InvalidVolume(volume) => BridgeError::invalid_value("volume", volume),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

/// Result type for sequencer operations.
pub type Result<T> = std::result::Result<T, SequencerError>;
