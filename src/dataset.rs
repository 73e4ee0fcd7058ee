//! Synthetic annotation datasets.
//!
//! The main entry point is [`DatasetGenerator::generate`], which scatters markers
//! around two centres to give a clustering pass realistic bimodal density:
//!
//! ```rust
//! use pinclump::{DatasetGenerator, GeoPoint};
//!
//! let nyc = GeoPoint::new(40.77, -73.98).unwrap();
//! let sf = GeoPoint::new(37.85, -122.68).unwrap();
//!
//! let mut generator = DatasetGenerator::seeded(7);
//! let annotations = generator.generate(1000, [nyc, sf]).unwrap();
//! assert_eq!(annotations.len(), 1000);
//! ```
//!
//! Each generator owns its random source, so two generators never influence
//! each other and a seeded generator always yields the same sequence.

use crate::annotation::{Annotation, AnnotationId};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use log::debug;
use rand::prelude::*;
use serde::Deserialize;

/// Upper bound (exclusive) of the per-axis offset, in degrees.
pub const MAX_OFFSET_DEGREES: f64 = 1.0;

/// Produces annotations with freshly numbered identities.
#[derive(Debug, Clone)]
pub struct DatasetGenerator<R = StdRng> {
    rng: R,
    next_id: u64,
}

impl DatasetGenerator<StdRng> {
    /// A reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> DatasetGenerator<R> {
    /// Wrap a caller-supplied random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng, next_id: 0 }
    }

    /// Generate `count` annotations split evenly between two centres.
    ///
    /// Every iteration draws one latitude and one longitude offset, each uniform in
    /// `[0, 1)` degrees, and places one annotation at `centers[0] + offset` followed
    /// by one at `centers[1] + offset`. The output is therefore interleaved
    /// (A, B, A, B, ...).
    ///
    /// An odd `count` is floored to the even value below it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if either centre lies within one degree of the
    /// northern latitude bound or the eastern longitude bound, where the offset
    /// could leave the valid coordinate range.
    pub fn generate(&mut self, count: usize, centers: [GeoPoint; 2]) -> Result<Vec<Annotation>> {
        for center in &centers {
            if center.latitude() > 90.0 - MAX_OFFSET_DEGREES
                || center.longitude() > 180.0 - MAX_OFFSET_DEGREES
            {
                return Err(Error::InvalidParameter {
                    name: "centers",
                    message: "must lie at least one degree south of 90 and west of 180",
                });
            }
        }

        let pairs = count / 2;
        if count % 2 == 1 {
            debug!("odd annotation count {count} floored to {}", pairs * 2);
        }

        let mut out = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let lat_adj: f64 = self.rng.random();
            let lng_adj: f64 = self.rng.random();

            for center in &centers {
                let coordinate =
                    GeoPoint::new(center.latitude() + lat_adj, center.longitude() + lng_adj)?;
                let id = self.next_id();
                out.push(Annotation::new(id, coordinate));
            }
        }

        debug!("generated {} annotations around two centres", out.len());
        Ok(out)
    }

    /// Generate `count` annotations that all sit on the same point.
    pub fn coincident(&mut self, count: usize, point: GeoPoint) -> Vec<Annotation> {
        (0..count)
            .map(|_| Annotation::new(self.next_id(), point))
            .collect()
    }

    fn next_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[derive(Deserialize)]
struct Pin {
    lat: f64,
    #[serde(rename = "long")]
    lng: f64,
}

/// Parse a JSON pin list of the form `[{"lat": 40.7, "long": -73.9}, ...]`.
///
/// Annotations are numbered by their position in the list.
pub fn from_json(json: &str) -> Result<Vec<Annotation>> {
    let pins: Vec<Pin> = serde_json::from_str(json)?;
    pins.into_iter()
        .enumerate()
        .map(|(i, pin)| {
            let coordinate = GeoPoint::new(pin.lat, pin.lng)?;
            Ok(Annotation::new(AnnotationId(i as u64), coordinate))
        })
        .collect()
}
