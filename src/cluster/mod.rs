//! Clustering of map annotations for display.
//!
//! A map with thousands of markers is unreadable; clustering replaces groups of
//! nearby markers with a single aggregate marker. "Nearby" is measured on screen,
//! not on the ground: two annotations 10 km apart should merge when the whole
//! continent is visible and separate again once the user zooms in.
//!
//! ## Pieces
//!
//! - [`AnnotationTree`]: a static 2-d tree over projected annotation positions,
//!   answering "which annotations are inside this rect" without a linear scan.
//! - [`ClusteringAlgorithm`]: the interface of anything that maps a viewport and a
//!   tree to [`DisplayItem`]s.
//! - [`GridClustering`]: buckets visible annotations into screen-sized cells, then
//!   (with [`Strategy::TwoPhase`](crate::Strategy::TwoPhase)) merges neighbouring
//!   cells whose markers would overlap.
//!
//! ## Display items
//!
//! Every result is a [`DisplayItem`], either a lone annotation or a [`Cluster`]
//! with a centroid, a member count and a radius in metres. Callers match on the
//! variant instead of probing the item's type at render time.
//!
//! ## Usage
//!
//! ```rust
//! use pinclump::cluster::{AnnotationTree, ClusteringAlgorithm, DisplayItem, GridClustering};
//! use pinclump::{ClusteringConfig, DatasetGenerator, GeoPoint, MapRect, ScreenSize, Viewport};
//!
//! let p = GeoPoint::new(0.0, 0.0).unwrap();
//! let tree = AnnotationTree::new(DatasetGenerator::seeded(0).coincident(10, p));
//!
//! let viewport = Viewport::new(MapRect::world(), ScreenSize::new(320.0, 480.0)).unwrap();
//! let items = GridClustering::new(ClusteringConfig::default())
//!     .cluster(&viewport, &tree)
//!     .unwrap();
//!
//! assert_eq!(items.len(), 1);
//! assert!(matches!(&items[0], DisplayItem::Cluster(c) if c.count() == 10));
//! ```

mod grid;
mod item;
mod traits;
mod tree;

pub use grid::{GridClustering, MAX_GRID_CELLS};
pub use item::{Cluster, DisplayItem};
pub use traits::ClusteringAlgorithm;
pub use tree::AnnotationTree;
