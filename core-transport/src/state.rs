//! Transport state model.
//!
//! [`TransportState`] is the controller's private working state: a mirror of
//! the engine's most recent status report plus the transport-level facts the
//! engine does not know about (which entry is current, whether a load is in
//! flight, whether the user is dragging the seek control).
//! [`TransportSnapshot`] is the derived, serializable view published to
//! consumers through a watch channel.

use crate::timecode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether the user is interacting with the seek control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum SeekState {
    /// No seek gesture in progress.
    Idle,
    /// The user is dragging the seek control. Playback is paused for the
    /// duration of the gesture; `resume` records whether it should restart
    /// when the gesture ends.
    Dragging {
        /// Whether playback resumes once the gesture completes.
        resume: bool,
    },
}

impl SeekState {
    /// Returns `true` while a seek gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self, SeekState::Dragging { .. })
    }
}

/// The controller's working state.
///
/// Playback fields (`should_play`, `is_playing`, `is_buffering`, `position`,
/// `duration`, `volume`) mirror the engine's reports; the engine remains the
/// source of truth and local writes to them are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    /// Index of the current playlist entry.
    pub current_index: usize,
    /// Whether a session load is in flight.
    pub is_loading: bool,
    /// Message from the most recent failed load, cleared on the next load.
    pub load_error: Option<String>,
    /// Seek gesture state.
    pub seek: SeekState,
    /// Whether the session is set to play.
    pub should_play: bool,
    /// Whether audio is actually being produced.
    pub is_playing: bool,
    /// Whether the engine is stalled waiting for data.
    pub is_buffering: bool,
    /// Playback position, when known. Frozen while a seek gesture runs.
    pub position: Option<Duration>,
    /// Stream duration, when known.
    pub duration: Option<Duration>,
    /// Volume as last reported (or requested before the first report).
    pub volume: f32,
}

impl TransportState {
    /// Initial state before any load, at the configured volume.
    pub fn new(volume: f32) -> Self {
        Self {
            current_index: 0,
            is_loading: false,
            load_error: None,
            seek: SeekState::Idle,
            should_play: false,
            is_playing: false,
            is_buffering: false,
            position: None,
            duration: None,
            volume,
        }
    }
}

/// Metadata of the currently bound track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Playlist index of the bound entry.
    pub index: usize,
    /// Display name of the bound entry.
    pub name: String,
    /// Artwork URI of the bound entry.
    pub artwork_uri: String,
}

/// Serializable view of the transport published to consumers.
///
/// `track` is populated only while a session is bound; during a load (and
/// after a failed one) it is `None`, so a UI never shows metadata for a track
/// it cannot control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSnapshot {
    /// Bound track metadata, when a session is bound.
    pub track: Option<TrackInfo>,
    /// Whether a load is in flight.
    pub is_loading: bool,
    /// Message from the most recent failed load.
    pub load_error: Option<String>,
    /// Whether a seek gesture is in progress.
    pub is_seeking: bool,
    /// Whether the session is set to play.
    pub should_play: bool,
    /// Whether audio is actually being produced.
    pub is_playing: bool,
    /// Whether the engine is buffering.
    pub is_buffering: bool,
    /// Position in milliseconds, when known.
    pub position_ms: Option<u64>,
    /// Duration in milliseconds, when known.
    pub duration_ms: Option<u64>,
    /// Current volume.
    pub volume: f32,
    /// Elapsed fraction in `0.0..=1.0`; `0.0` when unknown.
    pub seek_fraction: f64,
    /// Rendered `"mm:ss / mm:ss"` timestamp; empty when unknown.
    pub timestamp: String,
}

impl TransportSnapshot {
    /// Derive a snapshot from the working state and the bound track (if any).
    pub fn derive(state: &TransportState, track: Option<TrackInfo>) -> Self {
        let bound = track.is_some();
        Self {
            track,
            is_loading: state.is_loading,
            load_error: state.load_error.clone(),
            is_seeking: state.seek.is_dragging(),
            should_play: state.should_play,
            is_playing: state.is_playing,
            is_buffering: state.is_buffering,
            position_ms: state.position.map(|p| p.as_millis() as u64),
            duration_ms: state.duration.map(|d| d.as_millis() as u64),
            volume: state.volume,
            seek_fraction: if bound {
                timecode::seek_fraction(state.position, state.duration)
            } else {
                0.0
            },
            timestamp: if bound {
                timecode::format_timestamp(state.position, state.duration)
            } else {
                String::new()
            },
        }
    }

    /// Snapshot for a controller with no session and no load in flight.
    pub fn unbound(volume: f32) -> Self {
        Self::derive(&TransportState::new(volume), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> TransportState {
        TransportState {
            current_index: 1,
            position: Some(Duration::from_millis(65_000)),
            duration: Some(Duration::from_millis(125_000)),
            should_play: true,
            is_playing: true,
            ..TransportState::new(0.8)
        }
    }

    fn track() -> TrackInfo {
        TrackInfo {
            index: 1,
            name: "Comfort Fit - Sorry".to_string(),
            artwork_uri: "https://example.com/art.jpg".to_string(),
        }
    }

    #[test]
    fn derives_timestamp_and_fraction_when_bound() {
        let snapshot = TransportSnapshot::derive(&loaded_state(), Some(track()));
        assert_eq!(snapshot.timestamp, "01:05 / 02:05");
        assert!(snapshot.seek_fraction > 0.5 && snapshot.seek_fraction < 0.53);
        assert_eq!(snapshot.position_ms, Some(65_000));
    }

    #[test]
    fn unbound_snapshot_has_no_display_values() {
        let snapshot = TransportSnapshot::derive(&loaded_state(), None);
        assert!(snapshot.track.is_none());
        assert_eq!(snapshot.timestamp, "");
        assert_eq!(snapshot.seek_fraction, 0.0);
    }

    #[test]
    fn seek_state_predicate() {
        assert!(!SeekState::Idle.is_dragging());
        assert!(SeekState::Dragging { resume: true }.is_dragging());
    }

    #[test]
    fn snapshot_serializes() {
        let snapshot = TransportSnapshot::derive(&loaded_state(), Some(track()));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"timestamp\":\"01:05 / 02:05\""));
        let back: TransportSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
