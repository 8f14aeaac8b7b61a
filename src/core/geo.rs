use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Initial great-circle bearing from `self` to `other`, in degrees [0, 360)
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let y = dlng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
        normalize_heading(y.atan2(x).to_degrees())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Wrap any angle in degrees into [0, 360)
pub fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Axis-aligned lat/lng box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Degenerate box around a single point
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest box enclosing all points, or `None` for an empty slice
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(*iter.next()?);
        for point in iter {
            bounds.extend(*point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Web Mercator tile edge in pixels
const TILE_SIZE: f64 = 256.0;

fn mercator_y(lat: f64) -> f64 {
    // Clamp to the Web Mercator limit so the poles stay finite
    let lat = lat.clamp(-85.051_128_78, 85.051_128_78).to_radians();
    (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln()
}

/// Highest integer zoom at which `bounds` fits in a `width` x `height` pixel
/// viewport, never above `max_zoom`.
///
/// A degenerate box (single point) has nothing to fit, so it gets `max_zoom`.
pub fn fit_zoom(bounds: &Bounds, width: u32, height: u32, max_zoom: u8) -> u8 {
    let lng_fraction = (bounds.north_east.lng - bounds.south_west.lng) / 360.0;
    let lat_fraction = (mercator_y(bounds.north_east.lat) - mercator_y(bounds.south_west.lat))
        / (2.0 * std::f64::consts::PI);

    let zoom_for = |pixels: u32, fraction: f64| -> f64 {
        if fraction <= 0.0 {
            f64::INFINITY
        } else {
            (pixels as f64 / TILE_SIZE / fraction).log2()
        }
    };

    let zoom = zoom_for(width, lng_fraction).min(zoom_for(height, lat_fraction));
    if !zoom.is_finite() {
        return max_zoom;
    }
    zoom.floor().clamp(0.0, max_zoom as f64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_zoom() {
        let point = Bounds::from_point(Coordinate::new(18.5, 73.8));
        assert_eq!(fit_zoom(&point, 1024, 768, 17), 17);

        // The whole world fits at zoom 0 in a 256px viewport
        let world = Bounds {
            south_west: Coordinate::new(-85.0, -180.0),
            north_east: Coordinate::new(85.0, 180.0),
        };
        assert_eq!(fit_zoom(&world, 256, 256, 17), 0);

        // A few hundred meters wants a street-level zoom, capped by max_zoom
        let street = Bounds {
            south_west: Coordinate::new(18.520, 73.850),
            north_east: Coordinate::new(18.522, 73.852),
        };
        assert_eq!(fit_zoom(&street, 1024, 768, 17), 17);
        assert_eq!(fit_zoom(&street, 1024, 768, 12), 12);

        // 10 degrees of longitude across 1024px: 1024 / 256 / (10/360) = 144 -> 2^7.17
        let wide = Bounds {
            south_west: Coordinate::new(0.0, 0.0),
            north_east: Coordinate::new(0.001, 10.0),
        };
        assert_eq!(fit_zoom(&wide, 1024, 768, 17), 7);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((origin.bearing_to(&Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(725.0), 5.0);
        assert!(normalize_heading(-1e-15) < 360.0);
    }

    #[test]
    fn test_bounds_enclose_all_points() {
        let points = vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(-5.0, 30.0),
            Coordinate::new(15.0, 25.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.south_west, Coordinate::new(-5.0, 20.0));
        assert_eq!(bounds.north_east, Coordinate::new(15.0, 30.0));
        assert!(points.iter().all(|p| {
            (bounds.south_west.lat..=bounds.north_east.lat).contains(&p.lat)
                && (bounds.south_west.lng..=bounds.north_east.lng).contains(&p.lng)
        }));
        assert_eq!(bounds.center(), Coordinate::new(5.0, 25.0));
    }

    #[test]
    fn test_bounds_empty_and_single() {
        assert!(Bounds::from_points(&Vec::<Coordinate>::new()).is_none());
        let single = Bounds::from_points(&[Coordinate::new(1.0, 2.0)]).unwrap();
        assert_eq!(single.south_west, single.north_east);
        assert_eq!(single.center(), Coordinate::new(1.0, 2.0));
    }
}
