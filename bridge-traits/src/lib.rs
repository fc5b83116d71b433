//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the transport core and the
//! platform-specific audio engine. The core never decodes or mixes audio
//! itself; it issues commands to an [`AudioEngine`](audio::AudioEngine)
//! implementation and observes the results through the status updates the
//! engine delivers for each playback session.
//!
//! ## Traits
//!
//! - [`AudioEngine`](audio::AudioEngine) - Asynchronous session creation
//! - [`PlaybackSession`](audio::PlaybackSession) - Per-session transport
//!   commands (play/pause/stop/seek/volume/unload)
//!
//! ## Status delivery
//!
//! Each created session hands back a single-consumer
//! [`StatusUpdates`](audio::StatusUpdates) channel. The engine pushes a
//! [`PlaybackStatus`](audio::PlaybackStatus) whenever its state changes and
//! periodically while playing, potentially several times per second. Dropping
//! the receiver detaches the consumer; unloading the session closes the
//! channel from the engine side. Exactly one consumer may be attached to a
//! session at any time.
//!
//! ## Fail-Fast Strategy
//!
//! Engine implementations should fail `create` with a descriptive
//! [`BridgeError`](error::BridgeError) rather than returning a session that
//! can never become ready. The core treats a failed `create` as fatal for
//! that track and does not retry.
//!
//! ## Thread Safety
//!
//! On native targets all bridge traits require `Send + Sync` bounds so that
//! implementations can be shared across async tasks. The bounds are applied
//! through the marker traits in [`platform`] so they can be relaxed for
//! single-threaded targets.

pub mod audio;
pub mod error;
pub mod platform;

pub use audio::{
    status_channel, AudioEngine, CreatedSession, LoadedStatus, PlaybackSession, PlaybackSessionId,
    PlaybackStatus, SessionOptions, SessionRequest, StatusSender, StatusUpdates, TrackSource,
};
pub use error::{BridgeError, Result};
