//! Simulated engine configuration.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Configuration for [`SimAudioEngine`](crate::SimAudioEngine).
#[derive(Debug, Clone)]
pub struct SimEngineConfig {
    /// Interval between position updates while playing.
    pub tick_interval: Duration,
    /// Duration of sources without an explicit override.
    pub default_duration: Duration,
    /// Simulated preparation time before `create` completes.
    pub prepare_delay: Duration,
    /// Per-source duration overrides, keyed by the source description
    /// (path or URL).
    pub duration_overrides: HashMap<String, Duration>,
    /// Sources whose `create` fails.
    pub failing_sources: HashSet<String>,
}

impl Default for SimEngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(500),
            default_duration: Duration::from_secs(30),
            prepare_delay: Duration::ZERO,
            duration_overrides: HashMap::new(),
            failing_sources: HashSet::new(),
        }
    }
}

impl SimEngineConfig {
    /// Set the interval between position updates.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the duration of sources without an override.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Set the simulated preparation time.
    pub fn with_prepare_delay(mut self, delay: Duration) -> Self {
        self.prepare_delay = delay;
        self
    }

    /// Override the duration of one source.
    pub fn with_duration_override(mut self, source: impl Into<String>, duration: Duration) -> Self {
        self.duration_overrides.insert(source.into(), duration);
        self
    }

    /// Make `create` fail for one source.
    pub fn with_failing_source(mut self, source: impl Into<String>) -> Self {
        self.failing_sources.insert(source.into());
        self
    }

    /// Resolve the duration for a source description.
    pub(crate) fn duration_for(&self, source: &str) -> Duration {
        self.duration_overrides
            .get(source)
            .copied()
            .unwrap_or(self.default_duration)
    }
}
