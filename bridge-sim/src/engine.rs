//! The simulated engine and its sessions.

use crate::config::SimEngineConfig;
use bridge_traits::{
    status_channel, AudioEngine, BridgeError, CreatedSession, LoadedStatus, PlaybackSession,
    PlaybackSessionId, PlaybackStatus, Result, SessionRequest, StatusSender,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Simulated audio engine.
///
/// Cheap to clone; every clone provisions sessions against the same
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct SimAudioEngine {
    config: Arc<SimEngineConfig>,
}

impl SimAudioEngine {
    /// Construct an engine with the given configuration.
    pub fn new(config: SimEngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait::async_trait]
impl AudioEngine for SimAudioEngine {
    async fn create(&self, request: SessionRequest) -> Result<CreatedSession> {
        request.options.validate()?;

        let source = request.source.describe();
        if self.config.failing_sources.contains(&source) {
            return Err(BridgeError::OperationFailed(format!(
                "cannot open source: {}",
                source
            )));
        }

        if !self.config.prepare_delay.is_zero() {
            tokio::time::sleep(self.config.prepare_delay).await;
        }

        let duration = self.config.duration_for(&source);
        let shared = Arc::new(Mutex::new(Shared {
            position: Duration::ZERO,
            duration,
            should_play: request.options.should_play,
            is_playing: request.options.should_play,
            volume: request.options.volume,
            finished: false,
        }));

        let (sender, updates) = status_channel();
        let id = PlaybackSessionId::new();
        debug!(session_id = %id, %source, ?duration, "Provisioning simulated session");

        let ticker = spawn_ticker(
            Arc::clone(&shared),
            sender.clone(),
            self.config.tick_interval,
        );

        let initial_status = loaded_status(&shared.lock(), false);
        let session = SimSession {
            id,
            shared,
            sender: Some(sender),
            ticker: Some(ticker),
        };

        Ok(CreatedSession {
            session: Box::new(session),
            initial_status,
            updates,
        })
    }
}

/// Mutable state shared between a session handle and its ticker task.
struct Shared {
    position: Duration,
    duration: Duration,
    should_play: bool,
    is_playing: bool,
    volume: f32,
    finished: bool,
}

fn loaded_status(shared: &Shared, did_just_finish: bool) -> PlaybackStatus {
    PlaybackStatus::Loaded(LoadedStatus {
        position: Some(shared.position),
        duration: Some(shared.duration),
        should_play: shared.should_play,
        is_playing: shared.is_playing,
        is_buffering: false,
        volume: shared.volume,
        did_just_finish,
    })
}

/// Advance the position while playing, reporting `did_just_finish` exactly
/// once and parking the session paused at the end of the stream.
fn spawn_ticker(
    shared: Arc<Mutex<Shared>>,
    sender: StatusSender,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        // The first tick of an interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let status = {
                let mut s = shared.lock();
                if !s.is_playing {
                    None
                } else if s.position + tick >= s.duration {
                    s.position = s.duration;
                    s.should_play = false;
                    s.is_playing = false;
                    s.finished = true;
                    Some(loaded_status(&s, true))
                } else {
                    s.position += tick;
                    Some(loaded_status(&s, false))
                }
            };
            if let Some(status) = status {
                if sender.send(status).is_err() {
                    break;
                }
            }
        }
    })
}

/// One simulated playback session.
struct SimSession {
    id: PlaybackSessionId,
    shared: Arc<Mutex<Shared>>,
    sender: Option<StatusSender>,
    ticker: Option<JoinHandle<()>>,
}

impl SimSession {
    /// Mutate the shared state and echo the result through the status
    /// channel, as a real engine would on its next report.
    fn mutate_and_echo(&mut self, apply: impl FnOnce(&mut Shared)) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| BridgeError::NotAvailable("session unloaded".to_string()))?;
        let status = {
            let mut s = self.shared.lock();
            apply(&mut s);
            loaded_status(&s, false)
        };
        trace!(session_id = %self.id, ?status, "Echoing status");
        sender.send(status).ok();
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaybackSession for SimSession {
    fn id(&self) -> PlaybackSessionId {
        self.id
    }

    async fn unload(&mut self) -> Result<()> {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            // Wait for the aborted task so its sender clone is dropped.
            let _ = ticker.await;
        }
        // Dropping the sender closes the status channel.
        self.sender.take();
        debug!(session_id = %self.id, "Simulated session unloaded");
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        self.mutate_and_echo(|s| {
            if s.finished {
                // Replaying a finished track restarts it.
                s.position = Duration::ZERO;
                s.finished = false;
            }
            s.should_play = true;
            s.is_playing = true;
        })
    }

    async fn pause(&mut self) -> Result<()> {
        self.mutate_and_echo(|s| {
            s.should_play = false;
            s.is_playing = false;
        })
    }

    async fn stop(&mut self) -> Result<()> {
        self.mutate_and_echo(|s| {
            s.should_play = false;
            s.is_playing = false;
            s.position = Duration::ZERO;
            s.finished = false;
        })
    }

    async fn set_volume(&mut self, volume: f32) -> Result<()> {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::InvalidVolume(volume));
        }
        self.mutate_and_echo(|s| s.volume = volume)
    }

    async fn set_position(&mut self, position: Duration) -> Result<()> {
        self.mutate_and_echo(|s| {
            s.position = position.min(s.duration);
            s.finished = s.position >= s.duration;
        })
    }

    async fn play_from_position(&mut self, position: Duration) -> Result<()> {
        self.mutate_and_echo(|s| {
            s.position = position.min(s.duration);
            s.finished = false;
            s.should_play = true;
            s.is_playing = true;
        })
    }
}

impl Drop for SimSession {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{SessionOptions, TrackSource};

    fn request(uri: &str, should_play: bool) -> SessionRequest {
        SessionRequest::new(TrackSource::from_uri(uri)).with_options(SessionOptions {
            should_play,
            volume: 1.0,
        })
    }

    fn engine(config: SimEngineConfig) -> SimAudioEngine {
        SimAudioEngine::new(config)
    }

    fn expect_loaded(status: &PlaybackStatus) -> &LoadedStatus {
        match status {
            PlaybackStatus::Loaded(loaded) => loaded,
            other => panic!("expected loaded status, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn create_reports_initial_status() {
        let engine = engine(SimEngineConfig::default());
        let created = engine
            .create(request("https://example.com/a.mp3", true))
            .await
            .unwrap();

        let loaded = expect_loaded(&created.initial_status);
        assert_eq!(loaded.position, Some(Duration::ZERO));
        assert_eq!(loaded.duration, Some(Duration::from_secs(30)));
        assert!(loaded.should_play);
        assert!(loaded.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_source_rejects_create() {
        let engine = engine(
            SimEngineConfig::default().with_failing_source("https://example.com/broken.mp3"),
        );
        let result = engine
            .create(request("https://example.com/broken.mp3", false))
            .await;
        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn position_advances_while_playing() {
        let engine = engine(
            SimEngineConfig::default().with_tick_interval(Duration::from_millis(100)),
        );
        let mut created = engine
            .create(request("https://example.com/a.mp3", true))
            .await
            .unwrap();

        let status = created.updates.recv().await.unwrap();
        let loaded = expect_loaded(&status);
        assert_eq!(loaded.position, Some(Duration::from_millis(100)));
        assert!(!loaded.did_just_finish);
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_once_then_parks_paused() {
        let engine = engine(
            SimEngineConfig::default()
                .with_tick_interval(Duration::from_millis(100))
                .with_default_duration(Duration::from_millis(250)),
        );
        let mut created = engine
            .create(request("https://example.com/a.mp3", true))
            .await
            .unwrap();

        // 100ms, 200ms, then the finishing report.
        let mut last = created.updates.recv().await.unwrap();
        while !expect_loaded(&last).did_just_finish {
            last = created.updates.recv().await.unwrap();
        }
        let finished = expect_loaded(&last);
        assert_eq!(finished.position, Some(Duration::from_millis(250)));
        assert!(!finished.should_play);
        assert!(!finished.is_playing);

        // Parked: no further reports arrive.
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(created.updates.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_position_updates() {
        let engine = engine(
            SimEngineConfig::default().with_tick_interval(Duration::from_millis(100)),
        );
        let mut created = engine
            .create(request("https://example.com/a.mp3", true))
            .await
            .unwrap();

        created.session.pause().await.unwrap();
        let echoed = created.updates.recv().await.unwrap();
        assert!(!expect_loaded(&echoed).is_playing);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(created.updates.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn commands_echo_immediately() {
        let engine = engine(SimEngineConfig::default());
        let mut created = engine
            .create(request("https://example.com/a.mp3", false))
            .await
            .unwrap();

        created.session.set_volume(0.5).await.unwrap();
        let echoed = created.updates.recv().await.unwrap();
        assert_eq!(expect_loaded(&echoed).volume, 0.5);

        created
            .session
            .play_from_position(Duration::from_secs(10))
            .await
            .unwrap();
        let echoed = created.updates.recv().await.unwrap();
        let loaded = expect_loaded(&echoed);
        assert_eq!(loaded.position, Some(Duration::from_secs(10)));
        assert!(loaded.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn set_volume_rejects_out_of_range() {
        let engine = engine(SimEngineConfig::default());
        let mut created = engine
            .create(request("https://example.com/a.mp3", false))
            .await
            .unwrap();
        assert!(matches!(
            created.session.set_volume(1.5).await,
            Err(BridgeError::InvalidVolume(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn unload_closes_channel_and_rejects_commands() {
        let engine = engine(SimEngineConfig::default());
        let mut created = engine
            .create(request("https://example.com/a.mp3", false))
            .await
            .unwrap();

        created.session.unload().await.unwrap();
        assert!(matches!(
            created.updates.try_recv(),
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
        ));
        assert!(matches!(
            created.session.play().await,
            Err(BridgeError::NotAvailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn duration_override_applies() {
        let engine = engine(
            SimEngineConfig::default()
                .with_duration_override("https://example.com/short.mp3", Duration::from_secs(5)),
        );
        let created = engine
            .create(request("https://example.com/short.mp3", false))
            .await
            .unwrap();
        assert_eq!(
            expect_loaded(&created.initial_status).duration,
            Some(Duration::from_secs(5))
        );
    }
}
