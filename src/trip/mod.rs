//! Turns raw trip events into a replayable path.
//!
//! Only measurement events carrying both a latitude and a longitude survive;
//! everything else (ignition changes, status pings, partial fixes) is dropped.
//! Source order is kept, which is what makes the result a valid route.

use crate::core::{Bounds, Coordinate, PositionRecord};
use chrono::{DateTime, Utc};
use tracing::debug;

/// One retained fix on the route
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub coordinate: Coordinate,
    /// Heading recorded by the vehicle, degrees
    pub heading: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Waypoint {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            heading: None,
            recorded_at: None,
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }
}

/// Ordered, immutable route of one trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPath {
    waypoints: Vec<Waypoint>,
}

impl TripPath {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    /// Build a path from bare coordinates (no headings)
    pub fn from_coordinates<I, C>(coordinates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coordinate>,
    {
        Self {
            waypoints: coordinates
                .into_iter()
                .map(|c| Waypoint::new(c.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.waypoints.iter().map(|w| w.coordinate).collect()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.waypoints.first().map(|w| w.coordinate)
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.waypoints.last().map(|w| w.coordinate)
    }

    /// Bounds of the whole route
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.waypoints.iter().map(|w| &w.coordinate))
    }

    /// Time span covered by the recorded fixes, if timestamps are present
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.waypoints.iter().filter_map(|w| w.recorded_at);
        let first = times.next()?;
        let last = times.last().unwrap_or(first);
        Some((first, last))
    }
}

/// Result of turning records into a path
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// At least one valid position
    Ready(TripPath),
    /// No record passed the filter; playback must not start
    Empty { records_seen: usize },
}

impl LoadOutcome {
    pub fn path(&self) -> Option<&TripPath> {
        match self {
            LoadOutcome::Ready(path) => Some(path),
            LoadOutcome::Empty { .. } => None,
        }
    }
}

/// A record is a position fix iff it is a measurement event with both
/// coordinate fields present as finite numbers.
///
/// Stricter than a plain presence check: a field that is present but `null`,
/// non-numeric text or NaN counts as missing, so every waypoint on the path
/// has a drawable coordinate.
pub fn is_position_measurement(record: &PositionRecord) -> bool {
    record.is_measurement_event() && record.latitude().is_some() && record.longitude().is_some()
}

fn to_waypoint(record: &PositionRecord) -> Option<Waypoint> {
    if !record.is_measurement_event() {
        return None;
    }
    let coordinate = Coordinate::new(record.latitude()?, record.longitude()?);
    Some(Waypoint {
        coordinate,
        heading: record.heading(),
        recorded_at: record.timestamp,
    })
}

/// Filter and project records into a path, keeping source order
pub fn build_path(records: &[PositionRecord]) -> TripPath {
    TripPath::new(records.iter().filter_map(to_waypoint).collect())
}

/// Build a path and report explicitly when nothing usable was found
pub fn load_trip(records: &[PositionRecord]) -> LoadOutcome {
    let path = build_path(records);
    debug!(
        records = records.len(),
        positions = path.len(),
        dropped = records.len() - path.len(),
        "Filtered trip records"
    );

    if path.is_empty() {
        LoadOutcome::Empty {
            records_seen: records.len(),
        }
    } else {
        LoadOutcome::Ready(path)
    }
}
