//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the audio player core:
//! - Logging and tracing infrastructure
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other crates depend on. It
//! establishes the logging conventions and the event broadcasting mechanism
//! the presentation layer subscribes to.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
