use crate::core::geo::normalize_heading;
use crate::core::Coordinate;
use crate::render::{Marker, Rotation};

/// Pivot used when the icon has no anchor
pub const DEFAULT_ROTATION_ORIGIN: &str = "center bottom";

/// A marker drawn rotated to a heading
///
/// Wraps a plain [`Marker`] instead of changing how every marker behaves.
/// Any change that would make a renderer redraw the icon (new angle, new
/// pivot, a move or a drag) goes through [`RotatedMarker::redraw`], so the
/// rotation is never lost.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedMarker {
    inner: Marker,
    angle: f64,
    origin: String,
}

impl RotatedMarker {
    pub fn new(marker: Marker, heading: f64) -> Self {
        let origin = marker
            .icon
            .anchor
            .map(|[x, y]| format!("{}px {}px", x, y))
            .unwrap_or_else(|| DEFAULT_ROTATION_ORIGIN.to_string());

        let mut rotated = Self {
            inner: marker,
            angle: normalize_heading(heading),
            origin,
        };
        rotated.redraw();
        rotated
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn position(&self) -> Coordinate {
        self.inner.position
    }

    /// The marker as it should be drawn, rotation included
    pub fn marker(&self) -> &Marker {
        &self.inner
    }

    pub fn into_marker(self) -> Marker {
        self.inner
    }

    pub fn set_rotation_angle(&mut self, angle: f64) -> &mut Self {
        self.angle = normalize_heading(angle);
        self.redraw();
        self
    }

    pub fn set_rotation_origin(&mut self, origin: &str) -> &mut Self {
        self.origin = origin.to_string();
        self.redraw();
        self
    }

    pub fn set_position(&mut self, position: Coordinate) -> &mut Self {
        self.inner.position = position;
        self.redraw();
        self
    }

    /// Drag handler: the icon follows the pointer and keeps its rotation
    pub fn on_drag(&mut self, position: Coordinate) {
        self.set_position(position);
    }

    /// Reapply the rotation to the wrapped marker.
    ///
    /// A zero angle draws the icon as-is.
    pub fn redraw(&mut self) {
        self.inner.rotation = (self.angle != 0.0).then(|| Rotation {
            angle: self.angle,
            origin: self.origin.clone(),
        });
    }

    /// CSS transform for DOM based renderers
    pub fn css_transform(&self) -> Option<String> {
        self.inner
            .rotation
            .as_ref()
            .map(|r| format!("rotateZ({}deg)", r.angle))
    }
}
