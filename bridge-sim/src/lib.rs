//! # Simulated Audio Engine
//!
//! A deterministic [`AudioEngine`](bridge_traits::AudioEngine) implementation
//! that produces no sound. Playback position advances on a timer, volume and
//! transport commands are echoed back through status updates immediately, and
//! sources can be scripted to fail so load-error paths are reachable.
//!
//! Built for tests and demos: under `tokio::test(start_paused = true)` the
//! clock is virtual, so a "30 second" track finishes instantly and
//! deterministically.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_sim::{SimAudioEngine, SimEngineConfig};
//! use std::time::Duration;
//!
//! let engine = SimAudioEngine::new(
//!     SimEngineConfig::default()
//!         .with_default_duration(Duration::from_secs(30))
//!         .with_failing_source("https://example.com/broken.mp3"),
//! );
//! ```

mod config;
mod engine;

pub use config::SimEngineConfig;
pub use engine::SimAudioEngine;
