//! # Host Bridge Traits
//!
//! Capability contracts that every host platform implements so the media
//! composition core can drive heterogeneous playback engines uniformly.
//!
//! ## Traits
//!
//! - [`MediaElement`](media::MediaElement) - Playback-control surface of one
//!   media element (native player, plugin player, streaming widget, or a
//!   composed player built from several of them)
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Capability detection
//!
//! [`select_backend`](backend::select_backend) decides which engine family an
//! element should be built on. It runs in the host before composition and the
//! core never depends on its outcome.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert engine-specific failures to `BridgeError`
//! with an actionable message.
//!
//! ## Threading
//!
//! Composition is single-threaded and event-driven. `MediaElement` only
//! requires `Send` on native targets (see [`platform`]) so that a composed
//! player can be moved to whichever thread runs the host event loop.

pub mod backend;
pub mod error;
pub mod logging;
pub mod media;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use backend::{select_backend, BackendKind, BackendSelection, SourceCandidate};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{EventClass, MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
