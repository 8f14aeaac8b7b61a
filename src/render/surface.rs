use crate::core::geo::fit_zoom;
use crate::core::{Bounds, Coordinate};
use crate::render::{LayerId, MapSurface, Marker, MarkerId, PolylineStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One call made on a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    SetView { center: Coordinate, zoom: u8 },
    AddMarker { id: MarkerId, marker: Marker },
    RemoveMarker { id: MarkerId },
    DrawPolyline { id: LayerId, points: usize, style: PolylineStyle },
    FitBounds { bounds: Bounds, max_zoom: Option<u8> },
}

/// In-memory surface that remembers every call
///
/// Used in tests and for dry runs where nothing is drawn.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    markers: BTreeMap<u64, Marker>,
    polylines: BTreeMap<u64, Vec<Coordinate>>,
    next_id: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Markers currently on the map, oldest first
    pub fn live_markers(&self) -> Vec<&Marker> {
        self.markers.values().collect()
    }

    pub fn polylines(&self) -> Vec<&[Coordinate]> {
        self.polylines.values().map(|p| p.as_slice()).collect()
    }

    /// Last viewport fit requested
    pub fn last_fit(&self) -> Option<(Bounds, Option<u8>)> {
        self.ops.iter().rev().find_map(|op| match op {
            SurfaceOp::FitBounds { bounds, max_zoom } => Some((*bounds, *max_zoom)),
            _ => None,
        })
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.ops.push(SurfaceOp::SetView { center, zoom });
    }

    fn add_marker(&mut self, marker: &Marker) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.markers.insert(id.0, marker.clone());
        self.ops.push(SurfaceOp::AddMarker {
            id,
            marker: marker.clone(),
        });
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id.0).is_some() {
            self.ops.push(SurfaceOp::RemoveMarker { id });
        }
    }

    fn draw_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> LayerId {
        let id = LayerId(self.next_id());
        self.polylines.insert(id.0, points.to_vec());
        self.ops.push(SurfaceOp::DrawPolyline {
            id,
            points: points.len(),
            style: style.clone(),
        });
        id
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: Option<u8>) {
        self.ops.push(SurfaceOp::FitBounds { bounds, max_zoom });
    }
}

/// Highest zoom the trace surface will report
const TRACE_MAX_ZOOM: u8 = 19;

/// Surface that draws nothing and logs every call
///
/// Tracks a notional viewport so fits can report the zoom a real map of
/// that size would end up at.
pub struct TraceSurface {
    viewport: [u32; 2],
    center: Option<Coordinate>,
    zoom: u8,
    live_markers: usize,
    next_id: u64,
}

impl TraceSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: [width, height],
            center: None,
            zoom: 0,
            live_markers: 0,
            next_id: 0,
        }
    }

    pub fn center(&self) -> Option<Coordinate> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for TraceSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
        info!(lat = center.lat, lng = center.lng, zoom, "Map view set");
    }

    fn add_marker(&mut self, marker: &Marker) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.live_markers += 1;
        debug!(
            id = id.0,
            lat = format!("{:.6}", marker.position.lat),
            lng = format!("{:.6}", marker.position.lng),
            icon = %marker.icon.url,
            heading = marker.rotation.as_ref().map(|r| r.angle),
            "Marker added"
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.live_markers = self.live_markers.saturating_sub(1);
        debug!(id = id.0, "Marker removed");
    }

    fn draw_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> LayerId {
        let id = LayerId(self.next_id());
        info!(id = id.0, points = points.len(), color = %style.color, weight = style.weight, "Route drawn");
        id
    }

    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: Option<u8>) {
        let cap = max_zoom.unwrap_or(TRACE_MAX_ZOOM);
        self.center = Some(bounds.center());
        self.zoom = fit_zoom(&bounds, self.viewport[0], self.viewport[1], cap);
        info!(
            lat = format!("{:.6}", bounds.center().lat),
            lng = format!("{:.6}", bounds.center().lng),
            zoom = self.zoom,
            markers = self.live_markers,
            "Viewport fitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Icon;

    #[test]
    fn test_recording_surface_tracks_live_markers() {
        let mut surface = RecordingSurface::new();
        let icon = Icon::new("m.png", 24, 36);
        let a = surface.add_marker(&Marker::new(Coordinate::new(1.0, 1.0), icon.clone()));
        let b = surface.add_marker(&Marker::new(Coordinate::new(2.0, 2.0), icon));
        assert_ne!(a, b);
        assert_eq!(surface.live_markers().len(), 2);

        surface.remove_marker(a);
        surface.remove_marker(a);
        assert_eq!(surface.live_markers().len(), 1);
        assert_eq!(surface.live_markers()[0].position, Coordinate::new(2.0, 2.0));
        // second removal of the same id is not recorded
        assert_eq!(
            surface.ops().iter().filter(|op| matches!(op, SurfaceOp::RemoveMarker { .. })).count(),
            1
        );
    }

    #[test]
    fn test_recording_surface_last_fit() {
        let mut surface = RecordingSurface::new();
        assert!(surface.last_fit().is_none());
        let first = Bounds::from_point(Coordinate::new(1.0, 1.0));
        let second = Bounds::from_point(Coordinate::new(2.0, 2.0));
        surface.fit_bounds(first, None);
        surface.draw_polyline(&[Coordinate::new(0.0, 0.0)], &PolylineStyle::default());
        surface.fit_bounds(second, Some(17));
        assert_eq!(surface.last_fit(), Some((second, Some(17))));
        assert_eq!(surface.polylines().len(), 1);
    }

    #[test]
    fn test_ops_serialize_tagged() {
        let mut surface = RecordingSurface::new();
        surface.set_view(Coordinate::new(20.5937, 78.9629), 5);
        let json = serde_json::to_value(surface.ops()).unwrap();
        assert_eq!(json[0]["op"], "set_view");
        assert_eq!(json[0]["zoom"], 5);
    }

    #[test]
    fn test_trace_surface_fit_caps_zoom() {
        let mut surface = TraceSurface::new(1024, 768);
        surface.fit_bounds(Bounds::from_point(Coordinate::new(10.0, 10.0)), Some(17));
        assert_eq!(surface.zoom(), 17);
        assert_eq!(surface.center(), Some(Coordinate::new(10.0, 10.0)));
    }
}
