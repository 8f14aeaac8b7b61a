pub mod driver;
pub mod engine;
pub mod session;

pub use driver::{spawn_playback, PlaybackHandle};
pub use engine::PlaybackEngine;
pub use session::PlaybackSession;

use crate::core::{Bounds, Coordinate};
use std::time::Duration;

/// Default delay between two ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2000);

/// Shortest period the ticker accepts; shorter intervals are raised to it
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Zoom cap applied when fitting the map to the traveled route
pub const DEFAULT_HISTORY_MAX_ZOOM: u8 = 17;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No session loaded
    Idle,
    Running,
    Paused,
    /// Stopped by the user; terminal until the next load
    Stopped,
    /// Every position consumed; terminal until the next load
    Complete,
}

impl PlaybackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackState::Stopped | PlaybackState::Complete)
    }
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub tick_interval: Duration,
    pub history_max_zoom: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            history_max_zoom: DEFAULT_HISTORY_MAX_ZOOM,
        }
    }
}

/// Emitted once per successful tick
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    /// Index of the consumed waypoint
    pub index: usize,
    pub coordinate: Coordinate,
    /// Heading to draw the vehicle with, degrees [0, 360)
    pub heading: f64,
    /// Box enclosing everything traveled so far
    pub bounds: Bounds,
    pub max_zoom: u8,
    pub history_len: usize,
}

/// Everything a renderer or UI may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started { path_len: usize },
    Position(PositionUpdate),
    Paused { cursor: usize },
    Resumed { cursor: usize },
    Stopped { cursor: usize },
    Completed { path_len: usize },
}

/// Snapshot of the engine published after every change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub cursor: usize,
    pub path_len: usize,
    pub history_len: usize,
}

impl PlaybackStatus {
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == PlaybackState::Complete
    }
}
