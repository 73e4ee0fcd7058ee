//! Static 2-d tree over annotation map points.
//!
//! Split axes alternate x, y, x, ... by depth. At each node the split coordinate is
//! the median along the current axis, moved back past any equal coordinates so that
//! the left subtree holds points strictly below the split and the right subtree
//! holds points at or above it. That convention is what lets [`AnnotationTree::search`]
//! prune a half-open query rect without double-visiting ties.
//!
//! Both construction and search run on an explicit stack; many coincident points
//! produce a degenerate (chain-shaped) tree, and recursion depth would follow it.

use crate::annotation::Annotation;
use crate::geo::{MapPoint, MapRect};

#[derive(Debug, Clone)]
struct Node {
    item: usize,
    split: f64,
    left: Option<usize>,
    right: Option<usize>,
}

/// Spatial index of a fixed set of annotations.
#[derive(Debug, Clone, Default)]
pub struct AnnotationTree {
    annotations: Vec<Annotation>,
    points: Vec<MapPoint>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl AnnotationTree {
    /// Build a tree. Map points are projected once, up front.
    pub fn new(annotations: Vec<Annotation>) -> Self {
        let points: Vec<MapPoint> = annotations.iter().map(Annotation::map_point).collect();
        let n = points.len();

        let mut order: Vec<usize> = (0..n).collect();
        let mut nodes: Vec<Node> = Vec::with_capacity(n);
        let mut root = None;

        // (start, end, depth, parent node and whether we are its left child)
        let mut stack: Vec<(usize, usize, usize, Option<(usize, bool)>)> = Vec::new();
        if n > 0 {
            stack.push((0, n, 0, None));
        }

        while let Some((start, end, depth, parent)) = stack.pop() {
            let axis = depth & 1;
            let slice = &mut order[start..end];
            slice.sort_by(|&a, &b| points[a].axis(axis).total_cmp(&points[b].axis(axis)));

            let mut median = slice.len() / 2;
            let split = points[slice[median]].axis(axis);
            while median > 0 && points[slice[median - 1]].axis(axis) == split {
                median -= 1;
            }
            let item = slice[median];

            let id = nodes.len();
            nodes.push(Node {
                item,
                split,
                left: None,
                right: None,
            });
            match parent {
                Some((p, true)) => nodes[p].left = Some(id),
                Some((p, false)) => nodes[p].right = Some(id),
                None => root = Some(id),
            }

            let mid = start + median;
            if mid + 1 < end {
                stack.push((mid + 1, end, depth + 1, Some((id, false))));
            }
            if mid > start {
                stack.push((start, mid, depth + 1, Some((id, true))));
            }
        }

        Self {
            annotations,
            points,
            nodes,
            root,
        }
    }

    /// Number of indexed annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// All indexed annotations, in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations whose map point lies in `rect` (half-open, `min <= p < max`).
    ///
    /// Results are in tree order, not insertion order.
    pub fn search(&self, rect: &MapRect) -> Vec<&Annotation> {
        self.search_indices(rect)
            .into_iter()
            .map(|i| &self.annotations[i])
            .collect()
    }

    /// Like [`search`](Self::search), returning insertion indices.
    pub(crate) fn search_indices(&self, rect: &MapRect) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, usize)> = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 0));
        }

        let min = [rect.min_x(), rect.min_y()];
        let max = [rect.max_x(), rect.max_y()];

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            if rect.contains(&self.points[node.item]) {
                out.push(node.item);
            }

            let axis = depth & 1;
            // Left holds coordinates < split, right holds coordinates >= split.
            if let Some(left) = node.left {
                if min[axis] < node.split {
                    stack.push((left, depth + 1));
                }
            }
            if let Some(right) = node.right {
                if max[axis] > node.split {
                    stack.push((right, depth + 1));
                }
            }
        }

        out
    }

    /// Map point of the annotation at insertion index `i`.
    #[inline]
    pub(crate) fn point(&self, i: usize) -> MapPoint {
        self.points[i]
    }

    /// Annotation at insertion index `i`.
    #[inline]
    pub(crate) fn annotation(&self, i: usize) -> &Annotation {
        &self.annotations[i]
    }
}
