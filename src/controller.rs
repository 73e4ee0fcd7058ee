//! Keeps the displayable items of a map in sync with its viewport.
//!
//! The embedding application owns a [`ClusteringController`], hands it the full
//! annotation set once, and calls [`ClusteringController::refresh`] whenever the
//! visible region changes. Rendering the returned items is up to the caller.
//!
//! A refresh whose viewport differs from the last clustered one by less than
//! [`ClusteringConfig::minimal_zoom_change`] returns the previous items unchanged;
//! [`ClusteringController::refresh_forced`] always recomputes.
//!
//! ```rust
//! use pinclump::{
//!     ClusteringConfig, ClusteringController, DatasetGenerator, GeoPoint, Region, ScreenSize,
//!     Strategy, Viewport,
//! };
//!
//! let nyc = GeoPoint::new(40.77, -73.98).unwrap();
//! let sf = GeoPoint::new(37.85, -122.68).unwrap();
//! let annotations = DatasetGenerator::seeded(1).generate(100, [nyc, sf]).unwrap();
//!
//! let config = ClusteringConfig::default().with_strategy(Strategy::TwoPhase);
//! let mut controller = ClusteringController::new(config);
//! controller.set_annotations(annotations);
//!
//! let region = Region::new(nyc, 300_000.0, 300_000.0);
//! let viewport = Viewport::from_region(&region, ScreenSize::new(320.0, 480.0)).unwrap();
//! let items = controller.refresh(&viewport).unwrap();
//! assert!(!items.is_empty());
//! ```

use crate::annotation::Annotation;
use crate::cluster::{AnnotationTree, ClusteringAlgorithm, DisplayItem, GridClustering};
use crate::config::ClusteringConfig;
use crate::error::{Error, Result};
use crate::geo::Region;
use crate::viewport::Viewport;
use log::{debug, trace};
use std::fmt;

/// Selecting a cluster zooms to this multiple of its radius.
pub const ZOOM_RADIUS_FACTOR: f64 = 2.5;

/// Smallest span, in metres, of a zoom region.
pub const MIN_ZOOM_SPAN_METERS: f64 = 50.0;

/// Decides, on every refresh, whether clustering applies at all.
pub trait ClusteringPolicy {
    /// `false` shows every visible annotation individually.
    fn should_cluster(&self) -> bool;
}

impl<F> ClusteringPolicy for F
where
    F: Fn() -> bool,
{
    fn should_cluster(&self) -> bool {
        self()
    }
}

/// Owns the annotation index, the clustering algorithm and the current items.
pub struct ClusteringController<A = GridClustering> {
    algorithm: A,
    clustering_enabled: bool,
    minimal_zoom_change: f64,
    tree: AnnotationTree,
    policy: Option<Box<dyn ClusteringPolicy + Send + Sync>>,
    items: Vec<DisplayItem>,
    /// Viewport of the last recomputation; `None` forces the next refresh.
    last_viewport: Option<Viewport>,
}

impl<A: fmt::Debug> fmt::Debug for ClusteringController<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteringController")
            .field("algorithm", &self.algorithm)
            .field("clustering_enabled", &self.clustering_enabled)
            .field("minimal_zoom_change", &self.minimal_zoom_change)
            .field("annotations", &self.tree.len())
            .field("has_policy", &self.policy.is_some())
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl ClusteringController<GridClustering> {
    /// A controller running [`GridClustering`] with `config`.
    ///
    /// `clustering_enabled` and `minimal_zoom_change` are taken from `config`.
    pub fn new(config: ClusteringConfig) -> Self {
        let (clustering_enabled, minimal_zoom_change) =
            (config.clustering_enabled, config.minimal_zoom_change);
        Self {
            clustering_enabled,
            minimal_zoom_change,
            ..Self::with_algorithm(GridClustering::new(config))
        }
    }
}

impl<A: ClusteringAlgorithm> ClusteringController<A> {
    /// A controller running a custom algorithm.
    ///
    /// Clustering starts enabled with the default refresh threshold. Only the
    /// controller's own switch counts: a `clustering_enabled` stored in the
    /// algorithm's configuration is never read. Use
    /// [`set_clustering_enabled`](Self::set_clustering_enabled) and
    /// [`set_minimal_zoom_change`](Self::set_minimal_zoom_change) to change them.
    pub fn with_algorithm(algorithm: A) -> Self {
        let defaults = ClusteringConfig::default();
        Self {
            algorithm,
            clustering_enabled: defaults.clustering_enabled,
            minimal_zoom_change: defaults.minimal_zoom_change,
            tree: AnnotationTree::default(),
            policy: None,
            items: Vec::new(),
            last_viewport: None,
        }
    }

    /// Replace the annotation set. Current items are cleared until the next refresh.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        debug!("indexing {} annotations", annotations.len());
        self.tree = AnnotationTree::new(annotations);
        self.items.clear();
        self.last_viewport = None;
    }

    /// Install the policy consulted on every refresh.
    pub fn set_policy<P>(&mut self, policy: P)
    where
        P: ClusteringPolicy + Send + Sync + 'static,
    {
        self.policy = Some(Box::new(policy));
        self.last_viewport = None;
    }

    /// Turn clustering on or off regardless of the policy.
    pub fn set_clustering_enabled(&mut self, enabled: bool) {
        self.clustering_enabled = enabled;
        self.last_viewport = None;
    }

    /// Set the relative viewport change below which [`refresh`](Self::refresh)
    /// keeps the current items.
    pub fn set_minimal_zoom_change(&mut self, change: f64) {
        self.minimal_zoom_change = change;
    }

    /// Display items for `viewport`.
    ///
    /// The items are recomputed only when nothing has been clustered since the
    /// annotations, policy or switch last changed, or when `viewport` differs from
    /// the last clustered one by more than the minimal zoom change in scale or in
    /// position (relative to the previous extent). Otherwise the current items are
    /// returned and the policy is not consulted.
    pub fn refresh(&mut self, viewport: &Viewport) -> Result<&[DisplayItem]> {
        if !self.minimal_zoom_change.is_finite() || self.minimal_zoom_change < 0.0 {
            return Err(Error::InvalidParameter {
                name: "minimal_zoom_change",
                message: "must be finite and non-negative",
            });
        }
        let unchanged = self
            .last_viewport
            .as_ref()
            .is_some_and(|last| !viewport_changed(last, viewport, self.minimal_zoom_change));
        if unchanged {
            trace!("refresh skipped: viewport change below threshold");
            return Ok(&self.items);
        }
        self.refresh_forced(viewport)
    }

    /// Recompute the display items for `viewport`, whatever the last viewport was.
    pub fn refresh_forced(&mut self, viewport: &Viewport) -> Result<&[DisplayItem]> {
        let cluster = self.clustering_enabled
            && self.policy.as_ref().map_or(true, |p| p.should_cluster());

        self.items = if cluster {
            self.algorithm.cluster(viewport, &self.tree)?
        } else {
            self.tree
                .search(viewport.rect())
                .into_iter()
                .map(|a| DisplayItem::Individual(*a))
                .collect()
        };

        debug!(
            "refresh: {} items (clustering {})",
            self.items.len(),
            if cluster { "on" } else { "off" }
        );
        self.last_viewport = Some(*viewport);
        Ok(&self.items)
    }

    /// Items produced by the last refresh.
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.tree.annotations()
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Region to show after the user selects `item`.
    ///
    /// A cluster with more than one member zooms to a region centred on it with both
    /// spans equal to [`ZOOM_RADIUS_FACTOR`] times its radius (at least
    /// [`MIN_ZOOM_SPAN_METERS`]). Individual annotations return `None`.
    pub fn zoom_region_for(&self, item: &DisplayItem) -> Option<Region> {
        match item {
            DisplayItem::Cluster(c) if c.count() > 1 => {
                let span = (c.radius() * ZOOM_RADIUS_FACTOR).max(MIN_ZOOM_SPAN_METERS);
                Some(Region::new(c.coordinate(), span, span))
            }
            _ => None,
        }
    }
}

/// Whether `next` moved or zoomed away from `last` by more than `threshold`,
/// measured relative to `last`'s extent.
fn viewport_changed(last: &Viewport, next: &Viewport, threshold: f64) -> bool {
    if last.size() != next.size() {
        return true;
    }
    let (a, b) = (last.rect(), next.rect());
    let zoom = (a.size.width / b.size.width - 1.0).abs();
    let (ca, cb) = (a.center(), b.center());
    let shift_x = (cb.x - ca.x).abs() / a.size.width;
    let shift_y = (cb.y - ca.y).abs() / a.size.height;
    zoom > threshold || shift_x > threshold || shift_y > threshold
}
