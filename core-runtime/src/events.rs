//! # Event Bus System
//!
//! Carries the signals a composed player raises towards its outer listeners,
//! using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **EventBus**: Broadcast channel the sequencer publishes [`MediaSignal`]s on
//! - **EventStream**: Wrapper for consuming signals with optional filtering
//! - **Subscription Management**: Multiple listeners (a page, a remote-control
//!   widget) can observe the same player independently
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐ child signal ┌───────────────┐  emit   ┌──────────┐ subscribe ┌──────────┐
//! │   Host    ├─────────────>│ MediaSequencer├────────>│ EventBus ├──────────>│ Listener │
//! └───────────┘              └───────────────┘         └──────────┘           └──────────┘
//! ```
//!
//! Child signals never reach the bus directly: the sequencer decides which of
//! them are relayed and re-publishes those under its own identity.
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::{MediaEventKind, MediaSignal};
//! use core_runtime::events::EventBus;
//!
//! let bus = EventBus::new(16);
//! let mut listener = bus.subscribe();
//!
//! bus.emit(MediaSignal::new(MediaEventKind::Play, "sequencer")).ok();
//!
//! let signal = listener.try_recv().unwrap();
//! assert_eq!(signal.kind, MediaEventKind::Play);
//! ```
//!
//! ## Single-threaded hosts
//!
//! The composition core runs inside host callbacks, one at a time. Listeners
//! on the same thread drain their receivers with `try_recv` between callbacks;
//! no async runtime is required for that. Listeners on other tasks can use
//! the async `recv` instead.
//!
//! ## Error Handling
//!
//! `tokio::sync::broadcast` can produce two types of errors:
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` signals.
//!   Progress signals are frequent, so size the buffer for the slowest listener.
//! - **`RecvError::Closed`**: The player was dropped.

use bridge_traits::{MediaEventKind, MediaSignal};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// Severity of a signal, for filtering and logging.
pub fn severity(signal: &MediaSignal) -> EventSeverity {
    match signal.kind {
        MediaEventKind::Error => EventSeverity::Error,
        MediaEventKind::Stalled | MediaEventKind::Abort => EventSeverity::Warning,
        MediaEventKind::Ended | MediaEventKind::MetadataKnown | MediaEventKind::CanPlayThrough => {
            EventSeverity::Info
        }
        _ => EventSeverity::Debug,
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central bus for publishing and subscribing to aggregate media signals.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (signals are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MediaSignal>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of signals to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; [`SequencerConfig::validate`] rejects
    /// such configurations before a bus is built from them.
    ///
    /// [`SequencerConfig::validate`]: crate::config::SequencerConfig::validate
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a signal to all subscribers.
    ///
    /// Returns the number of subscribers that received the signal, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, signal: MediaSignal) -> Result<usize, SendError<MediaSignal>> {
        self.sender.send(signal)
    }

    /// Creates a new subscriber. Past signals are not replayed.
    pub fn subscribe(&self) -> Receiver<MediaSignal> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&MediaSignal) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// # Example
///
/// ```rust
/// use bridge_traits::MediaEventKind;
/// use core_runtime::events::{EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let seeks = EventStream::new(bus.subscribe()).filter(|signal| {
///     matches!(signal.kind, MediaEventKind::Seeking | MediaEventKind::Seeked)
/// });
/// ```
pub struct EventStream {
    receiver: Receiver<MediaSignal>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<MediaSignal>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only signals that match the filter will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&MediaSignal) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, signal: &MediaSignal) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(signal))
    }

    /// Receives the next signal that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` signals.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<MediaSignal, RecvError> {
        loop {
            let signal = self.receiver.recv().await?;
            if self.accepts(&signal) {
                return Ok(signal);
            }
        }
    }

    /// Attempts to receive a signal without blocking.
    ///
    /// Returns `None` if no matching signal is currently available.
    pub fn try_recv(&mut self) -> Option<Result<MediaSignal, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(signal) => {
                    if self.accepts(&signal) {
                        return Some(Ok(signal));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    /// Drains every signal currently buffered that passes the filter.
    ///
    /// Lag errors are skipped; the stream resumes at the oldest retained signal.
    pub fn drain(&mut self) -> Vec<MediaSignal> {
        let mut signals = Vec::new();
        while let Some(result) = self.try_recv() {
            match result {
                Ok(signal) => signals.push(signal),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        signals
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(kind: MediaEventKind) -> MediaSignal {
        MediaSignal::new(kind, "sequencer")
    }

    #[test]
    fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(signal(MediaEventKind::Play)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_signal() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let sent = signal(MediaEventKind::Seeked);
        assert_eq!(bus.emit(sent.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), sent);
        assert_eq!(sub2.recv().await.unwrap(), sent);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|s| s.kind == MediaEventKind::VolumeChanged);

        bus.emit(signal(MediaEventKind::Progress)).ok();
        bus.emit(signal(MediaEventKind::VolumeChanged)).ok();

        let received = stream.recv().await.unwrap();
        assert_eq!(received.kind, MediaEventKind::VolumeChanged);
    }

    #[test]
    fn test_try_recv_without_runtime() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        bus.emit(signal(MediaEventKind::Pause)).ok();
        let received = stream.try_recv().unwrap().unwrap();
        assert_eq!(received.kind, MediaEventKind::Pause);
    }

    #[test]
    fn test_drain_skips_lag() {
        let bus = EventBus::new(2);
        let mut stream = EventStream::new(bus.subscribe());

        for _ in 0..5 {
            bus.emit(signal(MediaEventKind::Progress)).ok();
        }

        let drained = stream.drain();
        assert_eq!(drained.len(), 2);
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_signal_severity() {
        assert_eq!(severity(&signal(MediaEventKind::Error)), EventSeverity::Error);
        assert_eq!(severity(&signal(MediaEventKind::Stalled)), EventSeverity::Warning);
        assert_eq!(severity(&signal(MediaEventKind::Ended)), EventSeverity::Info);
        assert_eq!(severity(&signal(MediaEventKind::Progress)), EventSeverity::Debug);
    }

    #[test]
    fn test_signal_serialization() {
        let sent = signal(MediaEventKind::CanPlayThrough);
        let json = serde_json::to_string(&sent).unwrap();
        assert!(json.contains("can-play-through"));

        let back: MediaSignal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sent);
    }
}
