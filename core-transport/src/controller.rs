//! Transport controller.
//!
//! [`TransportController`] owns the relationship between a fixed playlist and
//! a platform [`AudioEngine`]: it provisions one playback session at a time,
//! mirrors the engine's status reports into a [`TransportSnapshot`], advances
//! through the playlist when tracks finish, and translates user intents
//! (play/pause, skip, seek, volume) into session commands.
//!
//! ## Ownership and concurrency
//!
//! The controller is single-owner: one task drives it, either by calling its
//! methods directly or through [`TransportController::run`] with a command
//! channel. Engine completions and status updates arrive as internal signals
//! on an unbounded channel, so every state transition happens on the owning
//! task and no locks are needed.
//!
//! ## Stale loads
//!
//! Every load bumps a generation counter, and every signal carries the
//! generation it belongs to. A completion or status report whose generation
//! does not match the controller's current one is discarded; if a stale
//! completion delivered a live session, that orphan is unloaded immediately.

use crate::{
    config::TransportConfig,
    error::Result,
    playlist::Playlist,
    state::{SeekState, TrackInfo, TransportSnapshot, TransportState},
    timecode,
};
use bridge_traits::{
    AudioEngine, BridgeError, CreatedSession, PlaybackSession, PlaybackStatus, SessionOptions,
    SessionRequest, TrackSource,
};
use core_runtime::events::{EventBus, PlaybackEvent, PlayerEvent, TransportEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

// ============================================================================
// Commands and internal signals
// ============================================================================

/// User intents accepted by [`TransportController::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TransportCommand {
    /// Load the playlist entry at `index`.
    Load {
        /// Playlist index to load.
        index: usize,
        /// Whether playback starts as soon as the session is ready.
        autoplay: bool,
    },
    /// Toggle between playing and paused.
    PlayPause,
    /// Stop playback and rewind to the start.
    Stop,
    /// Skip to the next playlist entry.
    SkipForward,
    /// Skip to the previous playlist entry.
    SkipBackward,
    /// Set the session volume (clamped to `0.0..=1.0`).
    SetVolume {
        /// Requested volume.
        volume: f32,
    },
    /// The user started dragging the seek control.
    BeginSeek,
    /// The user released the seek control at `fraction` of the track.
    EndSeek {
        /// Target position as a fraction of the duration.
        fraction: f64,
    },
    /// Release the session and exit the command loop.
    Shutdown,
}

/// Sending half of a controller command channel.
pub type CommandSender = mpsc::UnboundedSender<TransportCommand>;

/// Create a command channel pair for [`TransportController::run`].
pub fn command_channel() -> (CommandSender, mpsc::UnboundedReceiver<TransportCommand>) {
    mpsc::unbounded_channel()
}

/// Internal signals funneled onto the controller's task.
#[derive(Debug)]
enum EngineSignal {
    /// An in-flight `create` finished.
    LoadComplete {
        generation: u64,
        result: std::result::Result<CreatedSession, BridgeError>,
    },
    /// The bound session reported a status update.
    Status {
        generation: u64,
        status: PlaybackStatus,
    },
}

/// What the controller currently holds against the engine.
enum SessionSlot {
    /// No session and no load in flight.
    Unbound,
    /// A `create` call is in flight for this generation.
    Loading { generation: u64 },
    /// A live session for the entry at `index`.
    Bound {
        generation: u64,
        index: usize,
        session: Box<dyn PlaybackSession>,
    },
}

impl SessionSlot {
    fn bound_index(&self) -> Option<usize> {
        match self {
            SessionSlot::Bound { index, .. } => Some(*index),
            _ => None,
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Drives one playlist against one audio engine.
///
/// See the [module documentation](self) for the ownership model.
pub struct TransportController {
    engine: Arc<dyn AudioEngine>,
    playlist: Playlist,
    config: TransportConfig,
    state: TransportState,
    slot: SessionSlot,
    generation: u64,
    signal_tx: mpsc::UnboundedSender<EngineSignal>,
    signal_rx: mpsc::UnboundedReceiver<EngineSignal>,
    pump: Option<JoinHandle<()>>,
    snapshot_tx: watch::Sender<TransportSnapshot>,
    events: EventBus,
}

impl TransportController {
    /// Construct a controller over `playlist`, driving `engine`.
    ///
    /// No session is provisioned until [`start`](Self::start) or
    /// [`load_entry`](Self::load_entry) is called.
    ///
    /// # Errors
    ///
    /// Returns an error when `config` fails validation.
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        playlist: Playlist,
        config: TransportConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(TransportSnapshot::unbound(config.initial_volume));
        let events = EventBus::new(config.event_buffer);
        let state = TransportState::new(config.initial_volume);
        Ok(Self {
            engine,
            playlist,
            config,
            state,
            slot: SessionSlot::Unbound,
            generation: 0,
            signal_tx,
            signal_rx,
            pump: None,
            snapshot_tx,
            events,
        })
    }

    /// The playlist this controller drives.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// The controller's working state.
    pub fn state(&self) -> &TransportState {
        &self.state
    }

    /// Subscribe to snapshot updates.
    ///
    /// The receiver always holds the latest [`TransportSnapshot`]; new
    /// subscribers see the current value immediately.
    pub fn watch_snapshot(&self) -> watch::Receiver<TransportSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The event bus carrying discrete transport and playback notifications.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Load the first playlist entry, honoring `autoplay_on_start`.
    pub async fn start(&mut self) {
        let autoplay = self.config.autoplay_on_start;
        self.load_entry(0, autoplay).await;
    }

    // ------------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------------

    /// Begin loading the playlist entry at `index`, releasing any current
    /// session first.
    ///
    /// The load completes asynchronously; until then the controller is in a
    /// loading state with no bound track. An out-of-range `index` is a no-op.
    pub async fn load_entry(&mut self, index: usize, autoplay: bool) {
        let Some(entry) = self.playlist.get(index) else {
            warn!(index, len = self.playlist.len(), "Ignoring load of out-of-range index");
            return;
        };
        let entry = entry.clone();

        self.release_session();
        self.generation += 1;
        let generation = self.generation;
        self.slot = SessionSlot::Loading { generation };

        self.state.current_index = index;
        self.state.is_loading = true;
        self.state.load_error = None;
        self.state.seek = SeekState::Idle;
        self.state.should_play = autoplay;
        self.state.is_playing = false;
        self.state.is_buffering = false;
        self.state.position = None;
        self.state.duration = None;

        info!(index, name = %entry.display_name, autoplay, "Loading playlist entry");
        self.events
            .emit(PlayerEvent::Transport(TransportEvent::LoadStarted {
                index,
                name: entry.display_name.clone(),
            }))
            .ok();
        self.publish();

        let request = SessionRequest::new(TrackSource::from_uri(&entry.media_uri)).with_options(
            SessionOptions {
                should_play: autoplay,
                volume: self.state.volume,
            },
        );
        let engine = Arc::clone(&self.engine);
        let signal_tx = self.signal_tx.clone();
        tokio::spawn(async move {
            let result = engine.create(request).await;
            signal_tx
                .send(EngineSignal::LoadComplete { generation, result })
                .ok();
        });
    }

    /// Abort the status pump and hand the bound session (if any) off for
    /// unloading.
    fn release_session(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        match std::mem::replace(&mut self.slot, SessionSlot::Unbound) {
            SessionSlot::Bound { mut session, .. } => {
                debug!(session_id = %session.id(), "Unloading previous session");
                tokio::spawn(async move {
                    if let Err(e) = session.unload().await {
                        warn!(error = %e, "Failed to unload previous session");
                    }
                });
            }
            SessionSlot::Loading { generation } => {
                // The in-flight completion will arrive with a stale
                // generation and be discarded.
                trace!(generation, "Abandoning in-flight load");
            }
            SessionSlot::Unbound => {}
        }
    }

    /// Process one internal signal.
    async fn handle_signal(&mut self, signal: EngineSignal) {
        match signal {
            EngineSignal::LoadComplete { generation, result } => {
                if generation != self.generation {
                    self.discard_stale_load(generation, result);
                    return;
                }
                match result {
                    Ok(created) => self.bind_session(generation, created).await,
                    Err(e) => self.fail_load(e),
                }
            }
            EngineSignal::Status { generation, status } => {
                if generation != self.generation {
                    trace!(generation, current = self.generation, "Discarding stale status");
                    return;
                }
                self.apply_status(status).await;
                self.publish();
            }
        }
    }

    fn discard_stale_load(
        &self,
        generation: u64,
        result: std::result::Result<CreatedSession, BridgeError>,
    ) {
        debug!(generation, current = self.generation, "Discarding stale load completion");
        if let Ok(created) = result {
            // The orphan session was never bound; release its resources.
            let mut session = created.session;
            tokio::spawn(async move {
                if let Err(e) = session.unload().await {
                    warn!(error = %e, "Failed to unload orphaned session");
                }
            });
        }
    }

    async fn bind_session(&mut self, generation: u64, created: CreatedSession) {
        let index = self.state.current_index;
        let CreatedSession {
            session,
            initial_status,
            mut updates,
        } = created;

        info!(index, session_id = %session.id(), "Playback session bound");

        let signal_tx = self.signal_tx.clone();
        self.pump = Some(tokio::spawn(async move {
            while let Some(status) = updates.recv().await {
                if signal_tx
                    .send(EngineSignal::Status { generation, status })
                    .is_err()
                {
                    break;
                }
            }
        }));

        self.slot = SessionSlot::Bound {
            generation,
            index,
            session,
        };
        self.state.is_loading = false;
        self.apply_status(initial_status).await;

        let name = self
            .playlist
            .get(index)
            .map(|e| e.display_name.clone())
            .unwrap_or_default();
        self.events
            .emit(PlayerEvent::Transport(TransportEvent::TrackChanged {
                index,
                name,
            }))
            .ok();
        self.publish();
    }

    fn fail_load(&mut self, error: BridgeError) {
        let index = self.state.current_index;
        error!(index, error = %error, "Failed to load playlist entry");
        self.slot = SessionSlot::Unbound;
        self.state.is_loading = false;
        self.state.load_error = Some(error.to_string());
        self.events
            .emit(PlayerEvent::Transport(TransportEvent::LoadFailed {
                index,
                message: error.to_string(),
            }))
            .ok();
        self.publish();
    }

    /// Mirror one engine status report into the working state.
    async fn apply_status(&mut self, status: PlaybackStatus) {
        match status {
            PlaybackStatus::Loaded(loaded) => {
                self.state.should_play = loaded.should_play;
                self.state.is_playing = loaded.is_playing;
                self.state.is_buffering = loaded.is_buffering;
                self.state.volume = loaded.volume;
                self.state.duration = loaded.duration;
                // The position stays frozen while the user drags the seek
                // control; the engine is paused then anyway.
                if !self.state.seek.is_dragging() {
                    self.state.position = loaded.position;
                }

                if loaded.did_just_finish && !self.state.seek.is_dragging() {
                    let finished = self.state.current_index;
                    info!(index = finished, "Track completed; advancing");
                    self.events
                        .emit(PlayerEvent::Playback(PlaybackEvent::Completed {
                            index: finished,
                        }))
                        .ok();
                    self.advance(true);
                    let next = self.state.current_index;
                    self.load_entry(next, true).await;
                }
            }
            PlaybackStatus::Unloaded { error: Some(message) } => {
                // Report-only: the session is left as the engine left it.
                error!(message = %message, "Fatal playback error reported by engine");
                self.events
                    .emit(PlayerEvent::Playback(PlaybackEvent::Error { message }))
                    .ok();
            }
            PlaybackStatus::Unloaded { error: None } => {
                debug!("Engine reported session unloaded");
            }
        }
    }

    // ------------------------------------------------------------------------
    // User intents
    // ------------------------------------------------------------------------

    /// Move `current_index` one step through the playlist, wrapping at both
    /// ends. Does not load the new entry.
    pub fn advance(&mut self, forward: bool) {
        self.state.current_index = self.playlist.step(self.state.current_index, forward);
        self.publish();
    }

    /// Toggle between playing and paused. No-op without a bound session.
    pub async fn toggle_play_pause(&mut self) {
        let is_playing = self.state.is_playing;
        let Some(session) = self.bound_session() else {
            return;
        };
        let result = if is_playing {
            session.pause().await
        } else {
            session.play().await
        };
        if let Err(e) = result {
            warn!(error = %e, "Play/pause command failed");
        }
    }

    /// Stop playback and rewind to the start. No-op without a bound session.
    pub async fn stop(&mut self) {
        let Some(session) = self.bound_session() else {
            return;
        };
        if let Err(e) = session.stop().await {
            warn!(error = %e, "Stop command failed");
        }
    }

    /// Skip one entry forward or backward, loading the new entry with the
    /// current play intent preserved. No-op without a bound session.
    pub async fn skip(&mut self, forward: bool) {
        if self.slot.bound_index().is_none() {
            return;
        }
        let autoplay = self.state.should_play;
        self.advance(forward);
        let index = self.state.current_index;
        self.load_entry(index, autoplay).await;
    }

    /// Set the session volume, clamped to `0.0..=1.0`. The mirrored volume
    /// updates when the engine echoes it back. No-op without a bound session.
    pub async fn set_volume(&mut self, volume: f32) {
        let clamped = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            warn!(volume, "Ignoring non-finite volume");
            return;
        };
        let Some(session) = self.bound_session() else {
            return;
        };
        if let Err(e) = session.set_volume(clamped).await {
            warn!(error = %e, "Set-volume command failed");
        }
    }

    /// Begin a seek gesture: pause playback and remember whether to resume
    /// when the gesture ends. No-op without a bound session or while a
    /// gesture is already running.
    pub async fn begin_seek(&mut self) {
        if self.state.seek.is_dragging() {
            return;
        }
        let resume = self.state.should_play;
        let Some(session) = self.bound_session() else {
            return;
        };
        if let Err(e) = session.pause().await {
            warn!(error = %e, "Pause-for-seek command failed");
        }
        self.state.seek = SeekState::Dragging { resume };
        self.publish();
    }

    /// End a seek gesture at `fraction` of the track, resuming playback when
    /// it was playing before the gesture started. No-op unless a gesture is
    /// in progress.
    pub async fn end_seek(&mut self, fraction: f64) {
        let SeekState::Dragging { resume } = self.state.seek else {
            return;
        };
        self.state.seek = SeekState::Idle;

        let Some(duration) = self.state.duration else {
            // Cannot resolve a fraction without a duration; the gesture
            // still ends.
            self.publish();
            return;
        };
        let target = duration.mul_f64(fraction.clamp(0.0, 1.0));

        if let Some(session) = self.bound_session() {
            let result = if resume {
                session.play_from_position(target).await
            } else {
                session.set_position(target).await
            };
            if let Err(e) = result {
                warn!(error = %e, "Seek command failed");
            }
        }
        // Show the target until the engine's next report confirms it.
        self.state.position = Some(target);
        self.publish();
    }

    // ------------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------------

    /// Elapsed fraction of the bound track in `0.0..=1.0`, or `0.0` when no
    /// session is bound or the values are unknown.
    pub fn current_seek_fraction(&self) -> f64 {
        if self.slot.bound_index().is_none() {
            return 0.0;
        }
        timecode::seek_fraction(self.state.position, self.state.duration)
    }

    /// Rendered `"mm:ss / mm:ss"` timestamp, or an empty string when no
    /// session is bound or the values are unknown.
    pub fn timestamp(&self) -> String {
        if self.slot.bound_index().is_none() {
            return String::new();
        }
        timecode::format_timestamp(self.state.position, self.state.duration)
    }

    /// Current derived snapshot.
    pub fn snapshot(&self) -> TransportSnapshot {
        let track = self.slot.bound_index().and_then(|index| {
            self.playlist.get(index).map(|entry| TrackInfo {
                index,
                name: entry.display_name.clone(),
                artwork_uri: entry.artwork_uri.clone(),
            })
        });
        TransportSnapshot::derive(&self.state, track)
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    fn bound_session(&mut self) -> Option<&mut Box<dyn PlaybackSession>> {
        match &mut self.slot {
            SessionSlot::Bound { session, .. } => Some(session),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------------

    /// Process one queued internal signal, waiting for one to arrive.
    ///
    /// This is how an embedding that calls controller methods directly (for
    /// example a test harness) lets engine completions and status updates
    /// through. [`run`](Self::run) does this automatically.
    pub async fn handle_next_signal(&mut self) -> bool {
        match self.signal_rx.recv().await {
            Some(signal) => {
                self.handle_signal(signal).await;
                true
            }
            None => false,
        }
    }

    /// Dispatch one user command.
    pub async fn handle_command(&mut self, command: TransportCommand) {
        trace!(?command, "Handling command");
        match command {
            TransportCommand::Load { index, autoplay } => self.load_entry(index, autoplay).await,
            TransportCommand::PlayPause => self.toggle_play_pause().await,
            TransportCommand::Stop => self.stop().await,
            TransportCommand::SkipForward => self.skip(true).await,
            TransportCommand::SkipBackward => self.skip(false).await,
            TransportCommand::SetVolume { volume } => self.set_volume(volume).await,
            TransportCommand::BeginSeek => self.begin_seek().await,
            TransportCommand::EndSeek { fraction } => self.end_seek(fraction).await,
            TransportCommand::Shutdown => {}
        }
    }

    /// Drive the controller until `commands` closes or delivers
    /// [`TransportCommand::Shutdown`], interleaving user commands with engine
    /// signals. Releases the session on exit.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<TransportCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(TransportCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                Some(signal) = self.signal_rx.recv() => {
                    self.handle_signal(signal).await;
                }
            }
        }
        info!("Transport controller shutting down");
        self.release_session();
    }
}

impl Drop for TransportController {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
