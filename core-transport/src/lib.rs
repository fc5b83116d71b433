//! # Core Transport Module
//!
//! The playback transport for a fixed playlist: one controller drives one
//! audio engine, keeping exactly zero or one playback session alive at a
//! time.
//!
//! ## Overview
//!
//! - [`Playlist`] / [`PlaylistEntry`]: the fixed, ordered track list with
//!   wrap-around navigation
//! - [`TransportController`]: session lifecycle, status mirroring,
//!   auto-advance, seek gestures, volume
//! - [`TransportSnapshot`]: the serializable view published through a watch
//!   channel
//! - [`timecode`]: `mm:ss` timestamp and seek-fraction arithmetic
//!
//! The engine behind the controller is any [`bridge_traits::AudioEngine`]
//! implementation; `bridge-sim` provides a simulated one for tests and
//! demos.
//!
//! ## Usage
//!
//! ```ignore
//! use core_transport::{Playlist, PlaylistEntry, TransportConfig, TransportController};
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<dyn bridge_traits::AudioEngine>) -> anyhow::Result<()> {
//! let playlist = Playlist::new(vec![PlaylistEntry::new(
//!     "Comfort Fit - Sorry",
//!     "https://example.com/sorry.mp3",
//!     "https://example.com/sorry.jpg",
//! )])?;
//!
//! let mut controller = TransportController::new(engine, playlist, TransportConfig::default())?;
//! let snapshots = controller.watch_snapshot();
//! controller.start().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod playlist;
pub mod state;
pub mod timecode;

pub use config::TransportConfig;
pub use controller::{command_channel, CommandSender, TransportCommand, TransportController};
pub use error::{Result, TransportError};
pub use playlist::{Playlist, PlaylistEntry};
pub use state::{SeekState, TrackInfo, TransportSnapshot, TransportState};
