//! Transport controller configuration.

use crate::error::{Result, TransportError};
use serde::{Deserialize, Serialize};

/// Configuration for a [`TransportController`](crate::TransportController).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Volume applied to every new playback session (0.0 = muted, 1.0 = unity
    /// gain).
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Whether the first entry starts playing as soon as it is loaded.
    #[serde(default)]
    pub autoplay_on_start: bool,

    /// Buffer size of the event bus channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_initial_volume() -> f32 {
    1.0
}

fn default_event_buffer() -> usize {
    core_runtime::events::DEFAULT_EVENT_BUFFER_SIZE
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            initial_volume: default_initial_volume(),
            autoplay_on_start: false,
            event_buffer: default_event_buffer(),
        }
    }
}

impl TransportConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Config`] when a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_volume.is_finite() || !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(TransportError::Config(format!(
                "initial_volume must be within 0.0..=1.0, got {}",
                self.initial_volume
            )));
        }
        if self.event_buffer == 0 {
            return Err(TransportError::Config(
                "event_buffer must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TransportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_volume, 1.0);
        assert!(!config.autoplay_on_start);
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let config = TransportConfig {
            initial_volume: 1.2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TransportError::Config(_))));

        let config = TransportConfig {
            initial_volume: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_event_buffer() {
        let config = TransportConfig {
            event_buffer: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: TransportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(
            config.event_buffer,
            core_runtime::events::DEFAULT_EVENT_BUFFER_SIZE
        );
    }
}
