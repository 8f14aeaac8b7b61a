use crate::core::{Bounds, Coordinate};
use crate::trip::{TripPath, Waypoint};

/// State of one replay: the route, how far along it we are, and where we've been
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    path: TripPath,
    history: Vec<Coordinate>,
    cursor: usize,
    /// Running box over `history`, kept in step with it
    traveled: Option<Bounds>,
}

impl PlaybackSession {
    pub fn new(path: TripPath) -> Self {
        Self {
            history: Vec::with_capacity(path.len()),
            path,
            cursor: 0,
            traveled: None,
        }
    }

    pub fn path(&self) -> &TripPath {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[Coordinate] {
        &self.history
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.path.len()
    }

    /// Waypoint under the cursor, if any
    pub fn current(&self) -> Option<&Waypoint> {
        self.path.get(self.cursor)
    }

    /// Record the waypoint under the cursor as visited. Returns the updated
    /// bounds of the traveled route.
    pub(crate) fn visit(&mut self, coordinate: Coordinate) -> Bounds {
        self.history.push(coordinate);
        let bounds = match self.traveled.as_mut() {
            Some(bounds) => {
                bounds.extend(coordinate);
                *bounds
            }
            None => Bounds::from_point(coordinate),
        };
        self.traveled = Some(bounds);
        bounds
    }

    /// Move the cursor forward by exactly one, never past the end
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.path.len() {
            self.cursor += 1;
        }
    }

    /// Heading to draw at the cursor.
    ///
    /// Uses the recorded heading when present, otherwise the bearing of the
    /// segment leading into this point (or out of it, for the first point).
    pub fn heading_at(&self, index: usize) -> f64 {
        let waypoints = self.path.waypoints();
        let Some(here) = waypoints.get(index) else {
            return 0.0;
        };
        if let Some(heading) = here.heading {
            return crate::core::geo::normalize_heading(heading);
        }
        if index > 0 {
            return waypoints[index - 1].coordinate.bearing_to(&here.coordinate);
        }
        match waypoints.get(1) {
            Some(next) => here.coordinate.bearing_to(&next.coordinate),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_tracks_bounds() {
        let mut session = PlaybackSession::new(TripPath::from_coordinates([(10.0, 10.0), (20.0, 5.0)]));
        let first = session.visit(Coordinate::new(10.0, 10.0));
        assert_eq!(first, Bounds::from_point(Coordinate::new(10.0, 10.0)));

        let bounds = session.visit(Coordinate::new(20.0, 5.0));
        assert_eq!(bounds, Bounds::from_points(session.history()).unwrap());
    }

    #[test]
    fn test_advance_never_passes_end() {
        let mut session = PlaybackSession::new(TripPath::from_coordinates([(1.0, 1.0)]));
        session.advance();
        session.advance();
        assert_eq!(session.cursor(), 1);
        assert!(session.is_exhausted());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_heading_recorded_wins_over_bearing() {
        let path = TripPath::new(vec![
            Waypoint::new(Coordinate::new(0.0, 0.0)),
            Waypoint::new(Coordinate::new(0.0, 1.0)).with_heading(-45.0),
            Waypoint::new(Coordinate::new(-1.0, 1.0)),
        ]);
        let session = PlaybackSession::new(path);
        // first point looks ahead to the next one: due east
        assert!((session.heading_at(0) - 90.0).abs() < 1e-9);
        assert_eq!(session.heading_at(1), 315.0);
        // last point uses the segment coming in: due south
        assert!((session.heading_at(2) - 180.0).abs() < 1e-9);
        assert_eq!(session.heading_at(3), 0.0);
    }

    #[test]
    fn test_single_point_heading() {
        let session = PlaybackSession::new(TripPath::from_coordinates([(5.0, 5.0)]));
        assert_eq!(session.heading_at(0), 0.0);
    }
}
