//! Audio engine bridge traits and supporting types.
//!
//! These abstractions let the transport core drive a platform-specific audio
//! engine while staying agnostic of how the engine decodes or outputs sound.
//! Host applications provide concrete implementations that satisfy their
//! platform constraints (desktop, mobile, web); tests and demos use the
//! simulated engine from `bridge-sim`.

use crate::{
    error::{BridgeError, Result},
    platform::{PlatformSend, PlatformSendSync},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// High-level media source descriptor handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackSource {
    /// Local file accessible to the host runtime.
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) stream to be fetched by the host.
    RemoteStream {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl TrackSource {
    /// Build a source from a URI string: anything with an http(s) scheme is a
    /// remote stream, everything else is treated as a local path.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            TrackSource::RemoteStream {
                url: uri.to_string(),
                headers: HashMap::new(),
            }
        } else {
            TrackSource::LocalFile {
                path: PathBuf::from(uri),
            }
        }
    }

    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, TrackSource::RemoteStream { .. })
    }

    /// Human-readable description used in logs.
    pub fn describe(&self) -> String {
        match self {
            TrackSource::LocalFile { path } => path.display().to_string(),
            TrackSource::RemoteStream { url, .. } => url.clone(),
        }
    }
}

/// Initial status requested for a new playback session.
///
/// Mirrors the fields the engine echoes back through status updates: whether
/// the session should begin playing as soon as it is ready, and the volume it
/// should start at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Begin playback as soon as the session is ready.
    pub should_play: bool,
    /// Initial volume (0.0 = muted, 1.0 = unity gain).
    pub volume: f32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            should_play: false,
            volume: 1.0,
        }
    }
}

impl SessionOptions {
    /// Validate option ranges.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidVolume`] when the volume lies outside
    /// `0.0..=1.0`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) || !self.volume.is_finite() {
            return Err(BridgeError::InvalidVolume(self.volume));
        }
        Ok(())
    }
}

/// Request describing the playback session an engine should provision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Source to feed into the engine.
    pub source: TrackSource,
    /// Initial status for the session.
    pub options: SessionOptions,
}

impl SessionRequest {
    /// Construct a new request for the provided source with default options.
    pub fn new(source: TrackSource) -> Self {
        Self {
            source,
            options: SessionOptions::default(),
        }
    }

    /// Attach session options to the request.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Unique identifier for playback sessions managed by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackSessionId(Uuid);

impl PlaybackSessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlaybackSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of a loaded session's state as reported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedStatus {
    /// Current playback position, when known.
    pub position: Option<Duration>,
    /// Total stream duration, when known.
    pub duration: Option<Duration>,
    /// Whether the session is set to play (may differ from `is_playing`
    /// while buffering).
    pub should_play: bool,
    /// Whether audio is actually being produced right now.
    pub is_playing: bool,
    /// Whether the engine is stalled waiting for data.
    pub is_buffering: bool,
    /// Current volume as applied by the engine.
    pub volume: f32,
    /// Set exactly once, on the update that observes the natural end of the
    /// stream.
    pub did_just_finish: bool,
}

impl Default for LoadedStatus {
    fn default() -> Self {
        Self {
            position: None,
            duration: None,
            should_play: false,
            is_playing: false,
            is_buffering: false,
            volume: 1.0,
            did_just_finish: false,
        }
    }
}

/// Status report delivered by the engine for one session.
///
/// Engines deliver these periodically while a session is live, and once more
/// with [`PlaybackStatus::Unloaded`] carrying an error message when the
/// session fails irrecoverably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// The session is loaded; the payload mirrors the engine's state.
    Loaded(LoadedStatus),
    /// The session is not (or no longer) loaded.
    Unloaded {
        /// Fatal engine error, when one caused the unload.
        error: Option<String>,
    },
}

impl PlaybackStatus {
    /// Returns `true` when the status describes a loaded session.
    pub fn is_loaded(&self) -> bool {
        matches!(self, PlaybackStatus::Loaded(_))
    }

    /// Returns the engine error message, if the status carries one.
    pub fn error(&self) -> Option<&str> {
        match self {
            PlaybackStatus::Unloaded { error } => error.as_deref(),
            PlaybackStatus::Loaded(_) => None,
        }
    }
}

/// Sending half of a session's status channel, held by the engine.
pub type StatusSender = mpsc::UnboundedSender<PlaybackStatus>;

/// Single-consumer stream of status updates for one session.
///
/// Dropping the receiver detaches the consumer; the engine side observes the
/// closed channel and stops producing.
pub type StatusUpdates = mpsc::UnboundedReceiver<PlaybackStatus>;

/// Create a status channel pair for a new session.
pub fn status_channel() -> (StatusSender, StatusUpdates) {
    mpsc::unbounded_channel()
}

/// Result of a successful [`AudioEngine::create`] call.
pub struct CreatedSession {
    /// Exclusive handle to the engine session.
    pub session: Box<dyn PlaybackSession>,
    /// The engine's state at the moment the session became ready.
    pub initial_status: PlaybackStatus,
    /// Stream of subsequent status updates for this session.
    pub updates: StatusUpdates,
}

impl std::fmt::Debug for CreatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedSession")
            .field("session_id", &self.session.id())
            .field("initial_status", &self.initial_status)
            .finish()
    }
}

/// Trait for platform audio engines capable of provisioning playback sessions.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AudioEngine: PlatformSendSync {
    /// Provision a playback session for the requested source.
    ///
    /// Implementations may allocate native resources, open the source, and
    /// begin buffering. The session starts in the state described by
    /// `request.options` and reports all further changes through the returned
    /// status channel.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be opened or the engine cannot
    /// allocate a session. A failed `create` leaves no session behind.
    async fn create(&self, request: SessionRequest) -> Result<CreatedSession>;
}

/// Exclusive control surface for one live engine session.
///
/// Every operation is fire-and-forget from the caller's perspective: the
/// returned `Result` only reports command delivery, and the actual effect is
/// observed through the session's next status update.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait PlaybackSession: PlatformSend {
    /// Identifier assigned by the engine at creation time.
    fn id(&self) -> PlaybackSessionId;

    /// Release all engine resources held by this session and close its
    /// status channel. The session must not deliver further updates once
    /// `unload` has been issued.
    async fn unload(&mut self) -> Result<()>;

    /// Begin or resume playback from the current position.
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the current position.
    async fn pause(&mut self) -> Result<()>;

    /// Stop playback and rewind to the start of the stream.
    async fn stop(&mut self) -> Result<()>;

    /// Adjust playback volume, normalized to `0.0..=1.0`.
    async fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Move the playback position without changing the play/pause state.
    async fn set_position(&mut self, position: Duration) -> Result<()>;

    /// Move the playback position and begin playing from there.
    async fn play_from_position(&mut self, position: Duration) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_values() {
        let opts = SessionOptions::default();
        assert!(!opts.should_play);
        assert_eq!(opts.volume, 1.0);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn session_options_rejects_out_of_range_volume() {
        let opts = SessionOptions {
            should_play: false,
            volume: 1.5,
        };
        assert!(matches!(
            opts.validate(),
            Err(BridgeError::InvalidVolume(_))
        ));

        let opts = SessionOptions {
            should_play: false,
            volume: -0.1,
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn session_id_is_unique() {
        let a = PlaybackSessionId::new();
        let b = PlaybackSessionId::new();
        assert_ne!(a, b);
        assert_eq!(a, PlaybackSessionId::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn track_source_from_uri_classification() {
        let remote = TrackSource::from_uri("https://example.com/song.mp3");
        assert!(remote.is_remote());

        let local = TrackSource::from_uri("/music/song.mp3");
        assert!(!local.is_remote());
        assert_eq!(local.describe(), "/music/song.mp3");
    }

    #[test]
    fn playback_status_helpers() {
        let loaded = PlaybackStatus::Loaded(LoadedStatus::default());
        assert!(loaded.is_loaded());
        assert!(loaded.error().is_none());

        let failed = PlaybackStatus::Unloaded {
            error: Some("decoder crashed".to_string()),
        };
        assert!(!failed.is_loaded());
        assert_eq!(failed.error(), Some("decoder crashed"));
    }

    #[test]
    fn status_channel_detaches_on_drop() {
        let (tx, rx) = status_channel();
        drop(rx);
        assert!(tx
            .send(PlaybackStatus::Unloaded { error: None })
            .is_err());
    }

    #[test]
    fn status_serialization_round_trip() {
        let status = PlaybackStatus::Loaded(LoadedStatus {
            position: Some(Duration::from_millis(65_000)),
            duration: Some(Duration::from_millis(125_000)),
            should_play: true,
            is_playing: true,
            is_buffering: false,
            volume: 0.8,
            did_just_finish: false,
        });

        let json = serde_json::to_string(&status).unwrap();
        let back: PlaybackStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
