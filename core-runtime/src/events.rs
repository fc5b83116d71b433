//! # Event Bus System
//!
//! Provides an event-driven architecture for the player core using
//! `tokio::sync::broadcast`. This module enables decoupled communication
//! between the transport controller and its consumers through typed events.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for transport and
//!   playback notifications
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! Continuous state (position, volume, flags) flows through the transport
//! snapshot channel instead; the event bus carries the discrete
//! notifications a host UI reacts to (track changes, failures, natural
//! track completion).
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, PlayerEvent, TransportEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! let event = PlayerEvent::Transport(TransportEvent::TrackChanged {
//!     index: 0,
//!     name: "Example 1".to_string(),
//! });
//! event_bus.emit(event).ok();
//! ```
//!
//! ## Error Handling
//!
//! The event bus uses `tokio::sync::broadcast`, which can produce two kinds
//! of receive errors:
//!
//! - **`RecvError::Lagged(n)`**: the subscriber was too slow and missed `n`
//!   events. Non-fatal; the subscriber can continue receiving.
//! - **`RecvError::Closed`**: all senders have been dropped, signalling
//!   shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this amount receive
/// `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum PlayerEvent {
    /// Transport lifecycle events (loads, track changes).
    Transport(TransportEvent),
    /// Playback events reported by the engine.
    Playback(PlaybackEvent),
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::Transport(e) => e.description(),
            PlayerEvent::Playback(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Transport(TransportEvent::LoadFailed { .. }) => EventSeverity::Error,
            PlayerEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Error,
            PlayerEvent::Transport(TransportEvent::TrackChanged { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

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

/// Events describing transport lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TransportEvent {
    /// A new playback session is being provisioned for a playlist entry.
    LoadStarted {
        /// Playlist index being loaded.
        index: usize,
        /// Display name of the entry.
        name: String,
    },
    /// A playback session became ready; the displayed track changed.
    TrackChanged {
        /// Playlist index now bound.
        index: usize,
        /// Display name of the entry.
        name: String,
    },
    /// The engine rejected the load. Fatal for this track; no retry.
    LoadFailed {
        /// Playlist index that failed to load.
        index: usize,
        /// Human-readable failure message.
        message: String,
    },
}

impl TransportEvent {
    fn description(&self) -> &str {
        match self {
            TransportEvent::LoadStarted { .. } => "Track load started",
            TransportEvent::TrackChanged { .. } => "Track changed",
            TransportEvent::LoadFailed { .. } => "Track load failed",
        }
    }
}

/// Events reported by the playback engine for the bound session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The track finished playing naturally.
    Completed {
        /// Playlist index that completed.
        index: usize,
    },
    /// The engine reported a session error. Report-only; the session is left
    /// in whatever state the engine left it.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Completed { .. } => "Track completed",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to player events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when there are no active subscribers.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all future
    /// events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
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
type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering
/// capabilities.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, PlayerEvent};
///
/// let event_bus = EventBus::new(100);
/// let stream = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, PlayerEvent::Playback(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, or `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
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

    fn track_changed(index: usize) -> PlayerEvent {
        PlayerEvent::Transport(TransportEvent::TrackChanged {
            index,
            name: format!("Track {}", index),
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(track_changed(0)).is_err());
    }

    #[tokio::test]
    async fn test_event_emission_with_subscribers() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        let event = track_changed(1);
        let result = bus.emit(event.clone());
        assert_eq!(result.unwrap(), 1);

        let received = sub.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, PlayerEvent::Playback(_)));

        // Filtered out
        bus.emit(track_changed(0)).ok();

        // Passes through
        let completed = PlayerEvent::Playback(PlaybackEvent::Completed { index: 0 });
        bus.emit(completed.clone()).ok();

        let received = stream.recv().await.unwrap();
        assert_eq!(received, completed);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2); // Very small buffer
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(track_changed(i)).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error_event = PlayerEvent::Playback(PlaybackEvent::Error {
            message: "decoder crashed".to_string(),
        });
        assert_eq!(error_event.severity(), EventSeverity::Error);

        let failed = PlayerEvent::Transport(TransportEvent::LoadFailed {
            index: 2,
            message: "unreachable".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        assert_eq!(track_changed(0).severity(), EventSeverity::Info);

        let started = PlayerEvent::Transport(TransportEvent::LoadStarted {
            index: 0,
            name: "Track 0".to_string(),
        });
        assert_eq!(started.severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(track_changed(0).description(), "Track changed");
        let completed = PlayerEvent::Playback(PlaybackEvent::Completed { index: 1 });
        assert_eq!(completed.description(), "Track completed");
    }

    #[tokio::test]
    async fn test_event_serialization() {
        let event = PlayerEvent::Transport(TransportEvent::LoadFailed {
            index: 2,
            message: "source unreachable".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("source unreachable"));

        let deserialized: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }
}
