pub mod marker;
pub mod surface;
pub mod vehicle;

pub use marker::RotatedMarker;
pub use surface::{RecordingSurface, SurfaceOp, TraceSurface};
pub use vehicle::VehicleRenderer;

use crate::core::{Bounds, Coordinate};
use serde::{Deserialize, Serialize};

/// Handle to a marker placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(pub u64);

/// Handle to a line layer placed on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub u64);

/// Marker image and how it sits on its coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub url: String,
    /// Width, height in pixels
    pub size: [u32; 2],
    /// Pixel of the image placed on the coordinate
    #[serde(default)]
    pub anchor: Option<[i32; 2]>,
    /// Where popups open, relative to the anchor
    #[serde(default)]
    pub popup_anchor: Option<[i32; 2]>,
}

impl Icon {
    pub fn new(url: &str, width: u32, height: u32) -> Self {
        Self {
            url: url.to_string(),
            size: [width, height],
            anchor: None,
            popup_anchor: None,
        }
    }

    pub fn with_anchor(mut self, x: i32, y: i32) -> Self {
        self.anchor = Some([x, y]);
        self
    }

    pub fn with_popup_anchor(mut self, x: i32, y: i32) -> Self {
        self.popup_anchor = Some([x, y]);
        self
    }
}

/// Rotation applied to a marker image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    /// Clockwise degrees
    pub angle: f64,
    /// CSS `transform-origin` style pivot, e.g. "20px 25px" or "center bottom"
    pub origin: String,
}

/// A point marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinate,
    pub icon: Icon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
}

impl Marker {
    pub fn new(position: Coordinate, icon: Icon) -> Self {
        Self {
            position,
            icon,
            rotation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineStyle {
    /// CSS color
    pub color: String,
    /// Stroke width in pixels
    pub weight: u32,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: "#800080".to_string(),
            weight: 10,
        }
    }
}

/// Operations the replay needs from whatever draws the map
///
/// Implementations own tile rendering, projection and the actual drawing;
/// the replay only places and removes things and asks for a viewport.
pub trait MapSurface: Send {
    /// Center the map on a point at a zoom level
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    fn add_marker(&mut self, marker: &Marker) -> MarkerId;

    /// Remove a marker. Unknown ids are ignored.
    fn remove_marker(&mut self, id: MarkerId);

    fn draw_polyline(&mut self, points: &[Coordinate], style: &PolylineStyle) -> LayerId;

    /// Move the viewport so `bounds` is fully visible, zooming in no further
    /// than `max_zoom` when given
    fn fit_bounds(&mut self, bounds: Bounds, max_zoom: Option<u8>);
}
