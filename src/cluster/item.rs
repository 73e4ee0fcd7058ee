use crate::annotation::Annotation;
use crate::geo::GeoPoint;

/// An aggregate of nearby annotations, shown as one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    coordinate: GeoPoint,
    radius: f64,
    members: Vec<Annotation>,
}

impl Cluster {
    /// Build a cluster from its members. Returns `None` when `members` is empty.
    ///
    /// The coordinate is the centroid of the member coordinates; the radius is the
    /// largest great-circle distance from it to any member, in metres.
    pub fn new(members: Vec<Annotation>) -> Option<Self> {
        let coords: Vec<GeoPoint> = members.iter().map(Annotation::coordinate).collect();
        let coordinate = GeoPoint::centroid(&coords)?;
        let radius = coords
            .iter()
            .map(|c| coordinate.distance_to(c))
            .fold(0.0, f64::max);
        Some(Self {
            coordinate,
            radius,
            members,
        })
    }

    /// Representative coordinate.
    pub fn coordinate(&self) -> GeoPoint {
        self.coordinate
    }

    /// Number of member annotations.
    pub fn count(&self) -> u32 {
        u32::try_from(self.members.len()).unwrap_or(u32::MAX)
    }

    /// Aggregate radius in metres.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn members(&self) -> &[Annotation] {
        &self.members
    }
}

/// What a map should draw: a single annotation or a cluster of them.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// A lone annotation.
    Individual(Annotation),
    /// Two or more annotations drawn as one.
    Cluster(Cluster),
}

impl DisplayItem {
    /// `Individual` for one member, `Cluster` for several, `None` for none.
    pub fn from_members(mut members: Vec<Annotation>) -> Option<Self> {
        match members.len() {
            0 => None,
            1 => members.pop().map(DisplayItem::Individual),
            _ => Cluster::new(members).map(DisplayItem::Cluster),
        }
    }

    /// Where the marker goes.
    pub fn coordinate(&self) -> GeoPoint {
        match self {
            DisplayItem::Individual(a) => a.coordinate(),
            DisplayItem::Cluster(c) => c.coordinate(),
        }
    }

    /// Number of annotations represented.
    pub fn count(&self) -> u32 {
        match self {
            DisplayItem::Individual(_) => 1,
            DisplayItem::Cluster(c) => c.count(),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, DisplayItem::Cluster(_))
    }

    /// The annotations represented by this item.
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            DisplayItem::Individual(a) => std::slice::from_ref(a),
            DisplayItem::Cluster(c) => c.members(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationId;

    fn at(id: u64, lat: f64, lng: f64) -> Annotation {
        Annotation::new(AnnotationId(id), GeoPoint::new(lat, lng).unwrap())
    }

    #[test]
    fn test_from_members() {
        assert!(DisplayItem::from_members(Vec::new()).is_none());

        let single = DisplayItem::from_members(vec![at(0, 1.0, 1.0)]).unwrap();
        assert!(!single.is_cluster());
        assert_eq!(single.count(), 1);
        assert_eq!(single.annotations().len(), 1);

        let pair = DisplayItem::from_members(vec![at(0, 0.0, 0.0), at(1, 0.0, 2.0)]).unwrap();
        assert!(pair.is_cluster());
        assert_eq!(pair.count(), 2);
        assert_eq!(pair.coordinate(), GeoPoint::new(0.0, 1.0).unwrap());
    }

    #[test]
    fn test_cluster_radius() {
        let cluster = Cluster::new(vec![at(0, 0.0, 0.0), at(1, 0.0, 2.0)]).unwrap();
        let expected = cluster
            .coordinate()
            .distance_to(&GeoPoint::new(0.0, 0.0).unwrap());
        assert!((cluster.radius() - expected).abs() < 1e-6);
        // One degree of longitude at the equator is about 111 km.
        assert!(cluster.radius() > 110_000.0 && cluster.radius() < 112_000.0);
    }

    #[test]
    fn test_coincident_cluster_has_zero_radius() {
        let members = (0..4).map(|i| at(i, 5.0, 5.0)).collect();
        let cluster = Cluster::new(members).unwrap();
        assert_eq!(cluster.radius(), 0.0);
        assert_eq!(cluster.count(), 4);
    }
}
