//! Map annotation clustering.
//!
//! `pinclump` turns a large set of map markers into a readable set of display
//! items for the current viewport, and generates synthetic marker datasets to
//! exercise it.
//!
//! The public API is organised as:
//! - [`dataset`]: seeded synthetic datasets ([`DatasetGenerator`])
//! - [`cluster`]: the annotation tree, grid clustering and display items
//! - [`controller`]: viewport-driven refreshes, the clustering policy and
//!   cluster zoom regions
//! - [`geo`]: geographic points and the Web-Mercator plane

#![forbid(unsafe_code)]

pub mod annotation;
pub mod cluster;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod viewport;

pub use annotation::{Annotation, AnnotationId};
pub use cluster::{AnnotationTree, Cluster, ClusteringAlgorithm, DisplayItem, GridClustering};
pub use config::{ClusteringConfig, ScreenSize, Strategy};
pub use controller::{ClusteringController, ClusteringPolicy};
pub use dataset::DatasetGenerator;
pub use error::{Error, Result};
pub use geo::{GeoPoint, MapPoint, MapRect, MapSize, Region};
pub use viewport::Viewport;
