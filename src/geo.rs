//! Geographic and projected coordinates.
//!
//! Annotations are located by [`GeoPoint`] (degrees). Clustering works on the
//! Web-Mercator plane instead, where a viewport is an axis-aligned rectangle and
//! a screen cell maps to a constant-size [`MapRect`]:
//!
//! ```text
//! (0, 0) ───────────────────────► x        x = (lng + 180) / 360 · W
//!   │   north-west                         y grows southward
//!   │
//!   ▼ y                       (W, W)       W = 2^28 map units
//! ```
//!
//! Latitudes beyond ±[`MAX_MERCATOR_LATITUDE`] are clamped before projection,
//! since the poles sit at infinity in this projection.

use crate::error::{Error, Result};
use std::f64::consts::PI;

/// Width (and height) of the whole world in map units.
pub const WORLD_SIZE: f64 = 268_435_456.0;

/// Largest latitude representable on the square Mercator plane.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// Equatorial radius of WGS84, used for map-points-per-metre scaling.
const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Mean Earth radius, used for great-circle distances.
const MEAN_RADIUS_M: f64 = 6_371_008.8;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting non-finite or out-of-range degrees.
    ///
    /// Latitude must lie in `[-90, 90]` and longitude in `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let d_phi = phi2 - phi1;
        let d_lambda = (other.longitude - self.longitude).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * MEAN_RADIUS_M * a.sqrt().min(1.0).asin()
    }

    /// Arithmetic mean of a set of points.
    ///
    /// Returns `None` for an empty set. The mean of valid points is always valid.
    pub fn centroid<'a, I>(points: I) -> Option<GeoPoint>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let (mut lat, mut lng, mut n) = (0.0, 0.0, 0usize);
        for p in points {
            lat += p.latitude;
            lng += p.longitude;
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(GeoPoint {
            latitude: lat / n as f64,
            longitude: lng / n as f64,
        })
    }
}

/// A point on the Web-Mercator plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    /// Horizontal position, `0` at longitude -180.
    pub x: f64,
    /// Vertical position, `0` at the northern edge.
    pub y: f64,
}

impl MapPoint {
    /// Construct a map point from raw map units.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Project a geographic point.
    pub fn from_geo(point: &GeoPoint) -> Self {
        let x = (point.longitude + 180.0) / 360.0 * WORLD_SIZE;

        let lat = point
            .latitude
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        let s = lat.sin();
        let y = (0.5 - ((1.0 + s) / (1.0 - s)).ln() / (4.0 * PI)) * WORLD_SIZE;

        Self { x, y }
    }

    /// Inverse projection. Points outside the world are clamped onto it.
    pub fn to_geo(&self) -> GeoPoint {
        let x = self.x.clamp(0.0, WORLD_SIZE);
        let y = self.y.clamp(0.0, WORLD_SIZE);

        let longitude = x / WORLD_SIZE * 360.0 - 180.0;
        let n = PI - 2.0 * PI * y / WORLD_SIZE;
        let latitude = n.sinh().atan().to_degrees();

        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Coordinate along `axis` (0 = x, 1 = y).
    #[inline]
    pub(crate) fn axis(&self, axis: usize) -> f64 {
        if axis == 0 {
            self.x
        } else {
            self.y
        }
    }
}

/// Map points per metre along a parallel at `latitude` degrees.
pub fn map_points_per_meter(latitude: f64) -> f64 {
    let lat = latitude
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    WORLD_SIZE / (2.0 * PI * EQUATORIAL_RADIUS_M * lat.cos())
}

/// A width/height pair in map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSize {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl MapSize {
    /// Construct a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle on the Web-Mercator plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRect {
    /// North-west corner.
    pub origin: MapPoint,
    /// Extent towards south-east.
    pub size: MapSize,
}

impl MapRect {
    /// Construct from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: MapPoint::new(x, y),
            size: MapSize::new(width, height),
        }
    }

    /// A rect of `size` centred on `center`.
    pub fn centered(center: MapPoint, size: MapSize) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// The whole world.
    pub fn world() -> Self {
        Self::new(0.0, 0.0, WORLD_SIZE, WORLD_SIZE)
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> MapPoint {
        MapPoint::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Half-open containment: `min <= p < max` on both axes.
    pub fn contains(&self, p: &MapPoint) -> bool {
        self.min_x() <= p.x && p.x < self.max_x() && self.min_y() <= p.y && p.y < self.max_y()
    }

    /// True if the interiors of the two rects overlap.
    pub fn intersects(&self, other: &MapRect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// Grow the rect outward so both corners sit on multiples of `cell`.
    ///
    /// The result always covers `self` and divides evenly into cells.
    pub fn normalized_to_cells(&self, cell: MapSize) -> MapRect {
        let x0 = (self.min_x() / cell.width).floor() * cell.width;
        let y0 = (self.min_y() / cell.height).floor() * cell.height;
        let mut x1 = (self.max_x() / cell.width).ceil() * cell.width;
        let mut y1 = (self.max_y() / cell.height).ceil() * cell.height;

        // A degenerate rect still gets one cell.
        if x1 <= x0 {
            x1 = x0 + cell.width;
        }
        if y1 <= y0 {
            y1 = y0 + cell.height;
        }

        MapRect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A geographic region: a centre and north-south / east-west spans in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Centre of the region.
    pub center: GeoPoint,
    /// North-south extent in metres.
    pub latitudinal_meters: f64,
    /// East-west extent in metres.
    pub longitudinal_meters: f64,
}

impl Region {
    /// Construct a region from its centre and spans.
    pub fn new(center: GeoPoint, latitudinal_meters: f64, longitudinal_meters: f64) -> Self {
        Self {
            center,
            latitudinal_meters,
            longitudinal_meters,
        }
    }

    /// The map rect covering this region, scaled at the centre latitude.
    pub fn to_map_rect(&self) -> MapRect {
        let ppm = map_points_per_meter(self.center.latitude);
        MapRect::centered(
            MapPoint::from_geo(&self.center),
            MapSize::new(
                self.longitudinal_meters * ppm,
                self.latitudinal_meters * ppm,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn projection_round_trips_within_mercator_band() {
        let p = GeoPoint::new(40.77, -73.98).unwrap();
        let back = MapPoint::from_geo(&p).to_geo();
        assert!((back.latitude() - p.latitude()).abs() < 1e-9);
        assert!((back.longitude() - p.longitude()).abs() < 1e-9);
    }

    #[test]
    fn origin_projects_to_world_center() {
        let p = MapPoint::from_geo(&GeoPoint::new(0.0, 0.0).unwrap());
        assert!((p.x - WORLD_SIZE / 2.0).abs() < 1e-6);
        assert!((p.y - WORLD_SIZE / 2.0).abs() < 1e-6);
    }

    #[test]
    fn north_is_up() {
        let north = MapPoint::from_geo(&GeoPoint::new(60.0, 0.0).unwrap());
        let south = MapPoint::from_geo(&GeoPoint::new(-60.0, 0.0).unwrap());
        assert!(north.y < south.y);
    }

    #[test]
    fn distance_between_new_york_and_san_francisco() {
        let nyc = GeoPoint::new(40.77, -73.98).unwrap();
        let sf = GeoPoint::new(37.85, -122.68).unwrap();
        let d = nyc.distance_to(&sf);
        // Roughly 4100 km.
        assert!(d > 4_000_000.0 && d < 4_200_000.0, "got {d}");
        assert_eq!(nyc.distance_to(&nyc), 0.0);
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(GeoPoint::centroid(&[] as &[GeoPoint]).is_none());
        let pts = [
            GeoPoint::new(0.0, 0.0).unwrap(),
            GeoPoint::new(2.0, 4.0).unwrap(),
        ];
        let c = GeoPoint::centroid(&pts).unwrap();
        assert_eq!((c.latitude(), c.longitude()), (1.0, 2.0));
    }

    #[test]
    fn normalized_rect_covers_and_aligns() {
        let rect = MapRect::new(105.0, 33.0, 250.0, 90.0);
        let cell = MapSize::new(100.0, 50.0);
        let n = rect.normalized_to_cells(cell);

        assert_eq!(n, MapRect::new(100.0, 0.0, 300.0, 150.0));
        assert!(n.min_x() <= rect.min_x() && n.max_x() >= rect.max_x());
        assert!(n.min_y() <= rect.min_y() && n.max_y() >= rect.max_y());
    }

    #[test]
    fn half_open_containment() {
        let rect = MapRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(&MapPoint::new(0.0, 0.0)));
        assert!(!rect.contains(&MapPoint::new(10.0, 5.0)));
        assert!(!rect.contains(&MapPoint::new(5.0, 10.0)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = MapRect::new(0.0, 0.0, 10.0, 10.0);
        let b = MapRect::new(10.0, 0.0, 10.0, 10.0);
        let c = MapRect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn region_rect_scales_with_latitude() {
        let equator = Region::new(GeoPoint::new(0.0, 0.0).unwrap(), 1000.0, 1000.0);
        let north = Region::new(GeoPoint::new(60.0, 0.0).unwrap(), 1000.0, 1000.0);
        let we = equator.to_map_rect().size.width;
        let wn = north.to_map_rect().size.width;
        // cos(60°) = 0.5, so twice the map units per metre.
        assert!((wn / we - 2.0).abs() < 1e-9);
    }
}
