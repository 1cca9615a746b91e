//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media composition core:
//! - Logging and tracing infrastructure
//! - Sequencer configuration
//! - Event bus carrying aggregate media signals
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the sequencer depends on. It
//! establishes the logging conventions and the broadcast mechanism through
//! which outer listeners observe a composed player.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::SequencerConfig;
pub use error::{Error, Result};
pub use events::{EventBus, EventStream};
