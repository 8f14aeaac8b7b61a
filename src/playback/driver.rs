//! Drives a [`PlaybackEngine`] from a fixed-interval timer.
//!
//! The engine lives inside a single task. Ticks and control commands are
//! handled one at a time from the same `select!` loop, so the engine never
//! sees two ticks at once and needs no locking. Positions and state changes
//! go out on an event channel for whoever renders them.

use crate::error::PlaybackError;
use crate::playback::engine::TickOutcome;
use crate::playback::{PlaybackConfig, PlaybackEngine, PlaybackEvent, PlaybackStatus, MIN_TICK_INTERVAL};
use crate::trip::TripPath;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Queue depth for control commands
const COMMAND_BUFFER: usize = 32;

enum Command {
    Load(TripPath, oneshot::Sender<bool>),
    Pause,
    Resume,
    Stop,
}

/// Control side of a running playback task
pub struct PlaybackHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<PlaybackStatus>,
    task: JoinHandle<()>,
}

impl PlaybackHandle {
    /// Start a new session. Resolves to `false` when the path is empty and
    /// nothing was started.
    pub async fn load(&self, path: TripPath) -> Result<bool, PlaybackError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Load(path, reply_tx)).await?;
        reply_rx.await.map_err(|_| PlaybackError::DriverGone)
    }

    pub async fn pause(&self) -> Result<(), PlaybackError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), PlaybackError> {
        self.send(Command::Resume).await
    }

    pub async fn stop(&self) -> Result<(), PlaybackError> {
        self.send(Command::Stop).await
    }

    /// Latest published status
    pub fn status(&self) -> PlaybackStatus {
        *self.status.borrow()
    }

    /// Subscribe to status changes
    pub fn watch_status(&self) -> watch::Receiver<PlaybackStatus> {
        self.status.clone()
    }

    /// Wait until playback is stopped or complete.
    ///
    /// Never resolves for a handle that was never loaded.
    pub async fn wait_finished(&self) -> Result<PlaybackStatus, PlaybackError> {
        let mut status = self.status.clone();
        let finished = status
            .wait_for(|s| s.state.is_terminal())
            .await
            .map_err(|_| PlaybackError::DriverGone)?;
        Ok(*finished)
    }

    /// Close the command channel and wait for the task to exit
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }

    async fn send(&self, command: Command) -> Result<(), PlaybackError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::DriverGone)
    }
}

/// Spawn the playback task. It idles until [`PlaybackHandle::load`] is called.
pub fn spawn_playback(
    config: PlaybackConfig,
    events: mpsc::UnboundedSender<PlaybackEvent>,
) -> PlaybackHandle {
    let engine = PlaybackEngine::new(config);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (status_tx, status_rx) = watch::channel(engine.status());

    let task = tokio::spawn(run(engine, command_rx, events, status_tx));

    PlaybackHandle {
        commands: command_tx,
        status: status_rx,
        task,
    }
}

/// First tick lands one full period after (re)start, like a plain timer
fn new_ticker(period: Duration) -> Interval {
    // tokio panics on a zero period
    let period = period.max(MIN_TICK_INTERVAL);
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run(
    mut engine: PlaybackEngine,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
    status: watch::Sender<PlaybackStatus>,
) {
    let period = engine.config().tick_interval;
    let mut ticker: Option<Interval> = None;

    let emit = |event: PlaybackEvent| {
        // Nobody listening is fine; playback still runs to completion
        let _ = events.send(event);
    };

    loop {
        tokio::select! {
            _ = next_tick(&mut ticker) => {
                match engine.tick() {
                    TickOutcome::Advanced(update) => {
                        trace!(index = update.index, lat = update.coordinate.lat, lng = update.coordinate.lng, "Tick");
                        emit(PlaybackEvent::Position(update));
                    }
                    TickOutcome::Skipped { cursor } => trace!(cursor, "Tick skipped"),
                    TickOutcome::Ignored => {}
                }
                if engine.is_complete() {
                    ticker = None;
                    emit(PlaybackEvent::Completed { path_len: engine.path_len() });
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Playback handle dropped, stopping driver");
                    break;
                };
                match command {
                    Command::Load(path, reply) => {
                        let started = engine.load(path);
                        if started {
                            ticker = Some(new_ticker(period));
                            emit(PlaybackEvent::Started { path_len: engine.path_len() });
                        }
                        let _ = reply.send(started);
                    }
                    Command::Pause => {
                        if engine.pause() {
                            ticker = None;
                            emit(PlaybackEvent::Paused { cursor: engine.cursor() });
                        }
                    }
                    Command::Resume => {
                        if engine.resume() {
                            ticker = Some(new_ticker(period));
                            emit(PlaybackEvent::Resumed { cursor: engine.cursor() });
                        }
                    }
                    Command::Stop => {
                        if engine.stop() {
                            ticker = None;
                            emit(PlaybackEvent::Stopped { cursor: engine.cursor() });
                        }
                    }
                }
            }
        }

        status.send_replace(engine.status());
    }
}
