use crate::geo::{GeoPoint, MapPoint};
use std::fmt;

/// Opaque identity of an annotation.
///
/// Identities only need to be unique within one dataset; they let callers tell
/// individual markers apart after clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single point of interest on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    id: AnnotationId,
    coordinate: GeoPoint,
}

impl Annotation {
    /// Create an annotation.
    pub fn new(id: AnnotationId, coordinate: GeoPoint) -> Self {
        Self { id, coordinate }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn coordinate(&self) -> GeoPoint {
        self.coordinate
    }

    /// Position on the Web-Mercator plane.
    pub fn map_point(&self) -> MapPoint {
        MapPoint::from_geo(&self.coordinate)
    }
}
