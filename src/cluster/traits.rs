use super::item::DisplayItem;
use super::tree::AnnotationTree;
use crate::error::Result;
use crate::viewport::Viewport;

/// Common interface for algorithms that turn visible annotations into display items.
pub trait ClusteringAlgorithm {
    /// Cluster the annotations of `tree` that fall inside `viewport`.
    ///
    /// An annotation never appears in more than one returned item. Implementations
    /// may widen the viewport (e.g. to whole grid cells) when deciding what is visible.
    fn cluster(&self, viewport: &Viewport, tree: &AnnotationTree) -> Result<Vec<DisplayItem>>;
}
