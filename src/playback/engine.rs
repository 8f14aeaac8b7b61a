use crate::core::Coordinate;
use crate::playback::{PlaybackConfig, PlaybackSession, PlaybackState, PlaybackStatus, PositionUpdate};
use crate::trip::TripPath;
use tracing::{debug, info, warn};

/// What happened on one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Engine was not running; nothing changed
    Ignored,
    /// A waypoint was consumed
    Advanced(PositionUpdate),
    /// Cursor had no waypoint under it; nothing was drawn.
    ///
    /// A guard only: `tick` marks the engine Complete as soon as the last
    /// waypoint is consumed, so a running engine always has one under the cursor.
    Skipped { cursor: usize },
}

impl TickOutcome {
    pub fn update(&self) -> Option<&PositionUpdate> {
        match self {
            TickOutcome::Advanced(update) => Some(update),
            _ => None,
        }
    }
}

/// Playback engine for a recorded trip
///
/// Purely synchronous: something else decides when a tick happens and what
/// to do with the resulting position.
pub struct PlaybackEngine {
    config: PlaybackConfig,
    state: PlaybackState,
    session: Option<PlaybackSession>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl PlaybackEngine {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            session: None,
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.state == PlaybackState::Complete
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    /// Get current playback position (index into the path)
    pub fn cursor(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.cursor())
    }

    /// Positions visited so far in this session
    pub fn history(&self) -> &[Coordinate] {
        self.session.as_ref().map(|s| s.history()).unwrap_or(&[])
    }

    pub fn path_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.path().len())
    }

    /// Fraction of the path consumed, 0.0 - 1.0
    pub fn progress(&self) -> f64 {
        match self.path_len() {
            0 => 0.0,
            len => self.cursor() as f64 / len as f64,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            cursor: self.cursor(),
            path_len: self.path_len(),
            history_len: self.history().len(),
        }
    }

    /// Start a new session on `path`.
    ///
    /// An empty path is rejected and leaves the engine untouched. Otherwise
    /// any previous session is discarded and playback starts from the first
    /// waypoint. Returns whether a session was started.
    pub fn load(&mut self, path: TripPath) -> bool {
        if path.is_empty() {
            warn!("Ignoring load of an empty trip path");
            return false;
        }

        info!(positions = path.len(), "Starting trip playback");
        self.session = Some(PlaybackSession::new(path));
        self.state = PlaybackState::Running;
        true
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.state = PlaybackState::Paused;
        debug!(cursor = self.cursor(), "Playback paused");
        true
    }

    /// Resume a paused playback from where it left off
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            return false;
        }
        self.state = PlaybackState::Running;
        debug!(cursor = self.cursor(), "Playback resumed");
        true
    }

    /// Stop playback for good. Cursor and history stay readable.
    pub fn stop(&mut self) -> bool {
        if !matches!(self.state, PlaybackState::Running | PlaybackState::Paused) {
            return false;
        }
        self.state = PlaybackState::Stopped;
        info!(cursor = self.cursor(), "Playback stopped");
        true
    }

    /// Advance playback by one waypoint (call once per tick)
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != PlaybackState::Running {
            return TickOutcome::Ignored;
        }
        let max_zoom = self.config.history_max_zoom;
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };

        let index = session.cursor();
        let outcome = match session.current().map(|w| w.coordinate) {
            Some(coordinate) => {
                let heading = session.heading_at(index);
                let bounds = session.visit(coordinate);
                TickOutcome::Advanced(PositionUpdate {
                    index,
                    coordinate,
                    heading,
                    bounds,
                    max_zoom,
                    history_len: session.history().len(),
                })
            }
            // Unreachable while Running; see TickOutcome::Skipped
            None => {
                warn!(cursor = index, "No waypoint under cursor, skipping update");
                TickOutcome::Skipped { cursor: index }
            }
        };

        session.advance();

        // Reached only after the last waypoint was consumed above
        if session.is_exhausted() {
            self.state = PlaybackState::Complete;
            info!(positions = session.path().len(), "Trip playback complete");
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(f64, f64)]) -> TripPath {
        TripPath::from_coordinates(points.iter().copied())
    }

    fn coords(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_three_point_scenario() {
        let mut engine = PlaybackEngine::default();
        assert!(engine.load(path(&[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)])));

        engine.tick();
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.history(), coords(&[(10.0, 10.0)]).as_slice());
        assert_eq!(engine.state(), PlaybackState::Running);

        engine.tick();
        engine.tick();
        assert_eq!(engine.cursor(), 3);
        assert_eq!(
            engine.history(),
            coords(&[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)]).as_slice()
        );
        assert_eq!(engine.state(), PlaybackState::Complete);
        assert!(!engine.is_running());
        assert!(engine.is_complete());
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn test_exhausted_session_skips_and_completes() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0), (2.0, 2.0)]));
        // Push the cursor past the end behind the engine's back
        let session = engine.session.as_mut().unwrap();
        session.advance();
        session.advance();

        assert_eq!(engine.tick(), TickOutcome::Skipped { cursor: 2 });
        assert!(engine.history().is_empty());
        assert_eq!(engine.cursor(), 2);
        assert_eq!(engine.state(), PlaybackState::Complete);
        assert_eq!(engine.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_empty_load_stays_idle() {
        let mut engine = PlaybackEngine::default();
        assert!(!engine.load(TripPath::default()));
        assert_eq!(engine.state(), PlaybackState::Idle);
        assert!(engine.session().is_none());
        assert_eq!(engine.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_exactly_n_ticks_visit_each_index_once() {
        let points: Vec<(f64, f64)> = (0..7).map(|i| (i as f64, -(i as f64))).collect();
        let mut engine = PlaybackEngine::default();
        engine.load(path(&points));

        let mut indices = Vec::new();
        let mut ticks = 0;
        while engine.is_running() {
            if let Some(update) = engine.tick().update() {
                indices.push(update.index);
            }
            ticks += 1;
        }
        assert_eq!(ticks, points.len());
        assert_eq!(indices, (0..points.len()).collect::<Vec<_>>());
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.cursor(), points.len());
    }

    #[test]
    fn test_pause_resume_does_not_skip_or_repeat() {
        let points = [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)];
        let mut engine = PlaybackEngine::default();
        engine.load(path(&points));

        engine.tick();
        engine.tick();
        assert!(engine.pause());
        // ticks while paused are dropped
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.cursor(), 2);

        assert!(engine.resume());
        let update = engine.tick();
        assert_eq!(update.update().unwrap().coordinate, Coordinate::new(3.0, 3.0));
        assert_eq!(engine.history().len(), 3);
    }

    #[test]
    fn test_pause_then_stop_scenario() {
        let points = [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)];
        let mut engine = PlaybackEngine::default();
        engine.load(path(&points));
        engine.tick();
        engine.tick();
        engine.pause();
        assert!(engine.stop());

        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert_eq!(engine.cursor(), 2);
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.cursor(), 2);
    }

    #[test]
    fn test_stop_is_idempotent_and_terminal() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]));
        engine.tick();
        assert!(engine.stop());
        assert!(!engine.stop());
        assert!(!engine.pause());
        assert!(!engine.resume());
        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.history(), coords(&[(1.0, 1.0)]).as_slice());
    }

    #[test]
    fn test_controls_after_complete_are_noops() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0)]));
        engine.tick();
        assert!(engine.is_complete());
        assert!(!engine.pause());
        assert!(!engine.stop());
        assert!(engine.is_complete());
    }

    #[test]
    fn test_reload_resets_session() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0), (2.0, 2.0)]));
        engine.tick();
        engine.stop();

        assert!(engine.load(path(&[(9.0, 9.0)])));
        assert_eq!(engine.state(), PlaybackState::Running);
        assert_eq!(engine.cursor(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.path_len(), 1);
    }

    #[test]
    fn test_empty_load_keeps_existing_session() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0), (2.0, 2.0)]));
        engine.tick();
        assert!(!engine.load(TripPath::default()));
        assert_eq!(engine.state(), PlaybackState::Running);
        assert_eq!(engine.cursor(), 1);
    }

    #[test]
    fn test_update_carries_bounds_and_zoom_cap() {
        let config = PlaybackConfig {
            history_max_zoom: 12,
            ..Default::default()
        };
        let mut engine = PlaybackEngine::new(config);
        engine.load(path(&[(10.0, 30.0), (20.0, 10.0)]));
        engine.tick();
        let update = engine.tick();
        let update = update.update().unwrap();
        assert_eq!(update.max_zoom, 12);
        assert_eq!(update.history_len, 2);
        assert_eq!(update.bounds.south_west, Coordinate::new(10.0, 10.0));
        assert_eq!(update.bounds.north_east, Coordinate::new(20.0, 30.0));
    }

    #[test]
    fn test_status_snapshot() {
        let mut engine = PlaybackEngine::default();
        engine.load(path(&[(1.0, 1.0), (2.0, 2.0)]));
        engine.tick();
        let status = engine.status();
        assert!(status.is_running());
        assert_eq!(status.cursor, 1);
        assert_eq!(status.path_len, 2);
        assert_eq!(status.history_len, 1);
    }
}
