//! # Sequencer Configuration
//!
//! Options of a composed player.
//!
//! ## Overview
//!
//! [`SequencerConfig`] carries the container-level attributes a host reads
//! when it builds a composed player (`debug`, `autoplay`) together with the
//! tuning values the composition core uses for its timebase. Every field has
//! a serde default, so a host can deserialize a partial JSON object.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::config::SequencerConfig;
//!
//! let config = SequencerConfig::default()
//!     .with_debug(true)
//!     .with_autoplay(true);
//! assert!(config.validate().is_ok());
//!
//! let from_host = SequencerConfig::from_json(r#"{ "autoplay": true }"#).unwrap();
//! assert!(from_host.autoplay);
//! assert_eq!(from_host.event_buffer_size, 100);
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use serde::{Deserialize, Serialize};

/// Configuration of one composed player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Emit debug logs for every child transition and readiness step.
    ///
    /// Default: false.
    #[serde(default)]
    pub debug: bool,

    /// Start playing as soon as the timeline is known.
    ///
    /// Default: false.
    #[serde(default)]
    pub autoplay: bool,

    /// Capacity of the aggregate event bus, per subscriber.
    ///
    /// Default: 100 signals.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Granularity, in seconds, every global time is rounded to. Also the
    /// tolerance under which a child counts as already positioned.
    ///
    /// Default: 0.001 (one millisecond).
    #[serde(default = "default_time_resolution")]
    pub time_resolution: f64,

    /// Distance, in seconds, kept below a clip's end when a landed seek is
    /// clamped into that clip.
    ///
    /// Default: 0.001 (one millisecond).
    #[serde(default = "default_boundary_epsilon")]
    pub boundary_epsilon: f64,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            autoplay: false,
            event_buffer_size: default_event_buffer_size(),
            time_resolution: default_time_resolution(),
            boundary_epsilon: default_boundary_epsilon(),
        }
    }
}

impl SequencerConfig {
    /// Parse a configuration from JSON, applying defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid sequencer configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable debug logs
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Enable or disable autoplay
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Set the event bus capacity
    pub fn with_event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Set the time resolution in seconds
    pub fn with_time_resolution(mut self, resolution: f64) -> Self {
        self.time_resolution = resolution;
        self
    }

    /// Set the boundary epsilon in seconds
    pub fn with_boundary_epsilon(mut self, epsilon: f64) -> Self {
        self.boundary_epsilon = epsilon;
        self
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if !self.time_resolution.is_finite() || self.time_resolution <= 0.0 {
            return Err(Error::Config(format!(
                "Time resolution must be a positive number of seconds, got {}",
                self.time_resolution
            )));
        }

        if !self.boundary_epsilon.is_finite() || self.boundary_epsilon <= 0.0 {
            return Err(Error::Config(format!(
                "Boundary epsilon must be a positive number of seconds, got {}",
                self.boundary_epsilon
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

fn default_time_resolution() -> f64 {
    0.001
}

fn default_boundary_epsilon() -> f64 {
    0.001
}
