use crate::error::Result;
use serde::Deserialize;

/// A size measured in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenSize {
    /// Horizontal extent in points.
    pub width: f64,
    /// Vertical extent in points.
    pub height: f64,
}

impl ScreenSize {
    /// Construct a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both extents are finite and greater than zero.
    pub(crate) fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// How the grid algorithm turns cells into clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One cluster per non-empty grid cell.
    #[default]
    Basic,
    /// Cell clusters, followed by merging of neighbours whose markers overlap.
    TwoPhase,
}

/// Grid clustering configuration.
///
/// Sizes are in screen points and are converted to map units per viewport, so
/// the same configuration clusters consistently at every zoom level.
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration:
///
/// ```rust
/// use pinclump::{ClusteringConfig, Strategy};
///
/// let config = ClusteringConfig::from_json(r#"{ "strategy": "two_phase" }"#).unwrap();
/// assert_eq!(config.strategy, Strategy::TwoPhase);
/// assert!(config.clustering_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Size of one grid cell.
    pub grid_size: ScreenSize,

    /// Footprint of a rendered marker, used by the two-phase overlap test.
    pub annotation_size: ScreenSize,

    /// Offset of the marker footprint's centre from its coordinate, `(x, y)`
    /// with `y` growing downward.
    pub annotation_center_offset: (f64, f64),

    /// Clustering strategy.
    pub strategy: Strategy,

    /// Master switch; when off every visible annotation is shown individually.
    ///
    /// Read by [`ClusteringController::new`](crate::ClusteringController::new);
    /// [`GridClustering`](crate::GridClustering) ignores it.
    pub clustering_enabled: bool,

    /// Smallest relative change of zoom or position that makes
    /// [`ClusteringController::refresh`](crate::ClusteringController::refresh)
    /// recompute its items. `0.1` means 10% of the previous viewport's extent.
    pub minimal_zoom_change: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            grid_size: ScreenSize::new(60.0, 60.0),
            annotation_size: ScreenSize::new(60.0, 60.0),
            annotation_center_offset: (0.0, 0.0),
            strategy: Strategy::Basic,
            clustering_enabled: true,
            minimal_zoom_change: 0.1,
        }
    }
}

impl ClusteringConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the grid cell size.
    pub fn with_grid_size(mut self, grid_size: ScreenSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the marker footprint.
    pub fn with_annotation_size(mut self, annotation_size: ScreenSize) -> Self {
        self.annotation_size = annotation_size;
        self
    }

    /// Set the marker footprint offset.
    pub fn with_annotation_center_offset(mut self, dx: f64, dy: f64) -> Self {
        self.annotation_center_offset = (dx, dy);
        self
    }

    /// Set the clustering strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable clustering.
    pub fn with_clustering_enabled(mut self, enabled: bool) -> Self {
        self.clustering_enabled = enabled;
        self
    }

    /// Set the refresh threshold.
    pub fn with_minimal_zoom_change(mut self, change: f64) -> Self {
        self.minimal_zoom_change = change;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ClusteringConfig::from_json(r#"{"grid_size": {"width": 40, "height": 30}}"#).unwrap();
        assert_eq!(config.grid_size, ScreenSize::new(40.0, 30.0));
        assert_eq!(config.annotation_size, ScreenSize::new(60.0, 60.0));
        assert_eq!(config.strategy, Strategy::Basic);
        assert_eq!(config.minimal_zoom_change, 0.1);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ClusteringConfig::from_json("{}").unwrap(), ClusteringConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = ClusteringConfig::from_json(r#"{"strategy": "three_phase"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn builder_sets_fields() {
        let config = ClusteringConfig::new()
            .with_annotation_size(ScreenSize::new(25.0, 50.0))
            .with_annotation_center_offset(0.0, -25.0)
            .with_strategy(Strategy::TwoPhase)
            .with_clustering_enabled(false)
            .with_minimal_zoom_change(0.25);
        assert_eq!(config.annotation_size, ScreenSize::new(25.0, 50.0));
        assert_eq!(config.annotation_center_offset, (0.0, -25.0));
        assert_eq!(config.strategy, Strategy::TwoPhase);
        assert!(!config.clustering_enabled);
        assert_eq!(config.minimal_zoom_change, 0.25);
    }

    #[test]
    fn infinite_sizes_are_not_positive() {
        assert!(ScreenSize::new(60.0, 60.0).is_positive());
        assert!(!ScreenSize::new(f64::INFINITY, 60.0).is_positive());
        assert!(!ScreenSize::new(60.0, f64::NAN).is_positive());
        assert!(!ScreenSize::new(-1.0, 60.0).is_positive());
    }
}
