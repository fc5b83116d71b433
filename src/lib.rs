//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-transport`, `bridge-sim`). Host applications
//! can depend on `apc-workspace` and enable the documented features without
//! needing to wire each crate individually.

#[cfg(feature = "sim-engine")]
pub use bridge_sim;
#[cfg(feature = "transport")]
pub use core_transport;
