//! Grid-based clustering.
//!
//! # The Algorithm
//!
//! The viewport is cut into cells of a fixed *screen* size (say 60×60 points), so
//! the clustering granularity follows the zoom level.
//!
//! 1. Convert the cell size to map units at the viewport's scale and grow the
//!    visible rect outward to whole cells.
//! 2. Query the annotation tree for the grown rect and bucket the hits by cell.
//! 3. Each non-empty cell becomes a cluster placed at the centroid of its members.
//!
//! That is the whole of [`Strategy::Basic`]. Its weakness is that two markers a few
//! pixels apart but on opposite sides of a cell border stay separate and overlap on
//! screen. [`Strategy::TwoPhase`] adds a merge pass:
//!
//! 4. Record which quadrant of its cell each cluster's centroid falls in:
//!
//! ```text
//!  ┌─────────┐
//!  │ NW   NE │
//!  │ SW   SE │
//!  └─────────┘
//! ```
//!
//! 5. Visit clusters in row-major cell order. A cluster in the NE quadrant can only
//!    collide with the neighbours to its east, north-east and north; everything
//!    else is at least half a cell away. Of those neighbours, only clusters sitting
//!    in the quadrant facing back (e.g. the eastern neighbour's NW or SW) are
//!    candidates:
//!
//! ```text
//!  ┌────┬────┬────┐
//!  │ 3  │ 2  │ 1  │
//!  ├────┼────┼────┤
//!  │ 4  │ ** │ 0  │   neighbour positions around the current cell
//!  ├────┼────┼────┤
//!  │ 5  │ 6  │ 7  │
//!  └────┴────┴────┘
//! ```
//!
//! 6. If the marker footprints of the two clusters intersect, the current cluster
//!    absorbs the neighbour; its centroid and quadrant are recomputed.
//!
//! ## Complexity
//!
//! - **Time**: O(k log n + m) per pass for k visible annotations, n indexed, m cells.
//! - **Space**: O(m + k).

use super::item::DisplayItem;
use super::traits::ClusteringAlgorithm;
use super::tree::AnnotationTree;
use crate::config::{ClusteringConfig, Strategy};
use crate::error::{Error, Result};
use crate::geo::{GeoPoint, MapPoint, MapRect, MapSize};
use crate::viewport::Viewport;
use log::{debug, trace};

/// Largest number of cells a single pass may allocate.
pub const MAX_GRID_CELLS: usize = 1 << 16;

/// `(dx, dy)` to reach neighbour position `i`; `y` grows southward.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Quadrants of a neighbour at position `i` that face the current cell.
const FACING_QUADRANTS: [u8; 8] = [
    Quadrant::NorthWest.bit() | Quadrant::SouthWest.bit(),
    Quadrant::SouthWest.bit(),
    Quadrant::SouthWest.bit() | Quadrant::SouthEast.bit(),
    Quadrant::SouthEast.bit(),
    Quadrant::NorthEast.bit() | Quadrant::SouthEast.bit(),
    Quadrant::NorthEast.bit(),
    Quadrant::NorthEast.bit() | Quadrant::NorthWest.bit(),
    Quadrant::NorthWest.bit(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    fn of(cell: &MapRect, point: &MapPoint) -> Self {
        let c = cell.center();
        match (point.x >= c.x, point.y >= c.y) {
            (true, false) => Quadrant::NorthEast,
            (false, false) => Quadrant::NorthWest,
            (false, true) => Quadrant::SouthWest,
            (true, true) => Quadrant::SouthEast,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Quadrant::NorthEast => 1,
            Quadrant::NorthWest => 1 << 1,
            Quadrant::SouthWest => 1 << 2,
            Quadrant::SouthEast => 1 << 3,
        }
    }

    /// Neighbour positions this quadrant faces.
    fn neighbours(self) -> [usize; 3] {
        match self {
            Quadrant::NorthEast => [0, 1, 2],
            Quadrant::NorthWest => [2, 3, 4],
            Quadrant::SouthWest => [4, 5, 6],
            Quadrant::SouthEast => [6, 7, 0],
        }
    }
}

#[derive(Debug)]
struct CellCluster {
    col: usize,
    row: usize,
    /// Indices into the annotation tree.
    members: Vec<usize>,
    point: MapPoint,
    quadrant: Quadrant,
    merged: bool,
}

/// Cell geometry plus the cluster (if any) occupying each cell.
struct Grid {
    origin: MapPoint,
    cell: MapSize,
    columns: usize,
    rows: usize,
    slots: Vec<Option<usize>>,
}

impl Grid {
    fn cell_rect(&self, col: usize, row: usize) -> MapRect {
        MapRect::new(
            self.origin.x + col as f64 * self.cell.width,
            self.origin.y + row as f64 * self.cell.height,
            self.cell.width,
            self.cell.height,
        )
    }

    fn cell_of(&self, p: &MapPoint) -> (usize, usize) {
        let col = ((p.x - self.origin.x) / self.cell.width).floor().max(0.0) as usize;
        let row = ((p.y - self.origin.y) / self.cell.height).floor().max(0.0) as usize;
        (col.min(self.columns - 1), row.min(self.rows - 1))
    }

    fn slot(&self, col: isize, row: isize) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.columns || row as usize >= self.rows {
            return None;
        }
        self.slots[row as usize * self.columns + col as usize]
    }
}

/// Grid clustering algorithm.
#[derive(Debug, Clone, Default)]
pub struct GridClustering {
    config: ClusteringConfig,
}

impl GridClustering {
    /// Create a grid clusterer.
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Set the clustering strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    fn validate(&self) -> Result<()> {
        if !self.config.grid_size.is_positive() {
            return Err(Error::InvalidParameter {
                name: "grid_size",
                message: "must be positive and finite",
            });
        }
        let (dx, dy) = self.config.annotation_center_offset;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(Error::InvalidParameter {
                name: "annotation_center_offset",
                message: "must be finite",
            });
        }
        if self.config.strategy == Strategy::TwoPhase && !self.config.annotation_size.is_positive()
        {
            return Err(Error::InvalidParameter {
                name: "annotation_size",
                message: "must be positive and finite for the two-phase strategy",
            });
        }
        Ok(())
    }

    fn build_grid(&self, viewport: &Viewport) -> Result<Grid> {
        let cell = viewport.to_map_size(self.config.grid_size);
        let rect = viewport.rect().normalized_to_cells(cell);

        let columns_f = (rect.size.width / cell.width).round().max(1.0);
        let rows_f = (rect.size.height / cell.height).round().max(1.0);
        if columns_f * rows_f > MAX_GRID_CELLS as f64 {
            return Err(Error::GridTooLarge {
                columns: columns_f as usize,
                rows: rows_f as usize,
            });
        }
        let (columns, rows) = (columns_f as usize, rows_f as usize);

        Ok(Grid {
            origin: rect.origin,
            cell,
            columns,
            rows,
            slots: vec![None; columns * rows],
        })
    }

    /// Footprint of a marker drawn at `point`, in map units.
    fn footprint(&self, viewport: &Viewport, point: &MapPoint) -> MapRect {
        let scale = viewport.map_units_per_point();
        let (dx, dy) = self.config.annotation_center_offset;
        let center = MapPoint::new(point.x + dx * scale.width, point.y + dy * scale.height);
        MapRect::centered(center, viewport.to_map_size(self.config.annotation_size))
    }

    fn merge_overlapping(
        &self,
        viewport: &Viewport,
        tree: &AnnotationTree,
        grid: &Grid,
        clusters: &mut [CellCluster],
    ) -> usize {
        let mut merges = 0;

        for current in 0..clusters.len() {
            if clusters[current].merged {
                continue;
            }

            for position in clusters[current].quadrant.neighbours() {
                let (dx, dy) = NEIGHBOUR_OFFSETS[position];
                let col = clusters[current].col as isize + dx;
                let row = clusters[current].row as isize + dy;

                let Some(other) = grid.slot(col, row) else {
                    continue;
                };
                if other == current || clusters[other].merged {
                    continue;
                }
                if FACING_QUADRANTS[position] & clusters[other].quadrant.bit() == 0 {
                    continue;
                }

                let mine = self.footprint(viewport, &clusters[current].point);
                let theirs = self.footprint(viewport, &clusters[other].point);
                if !mine.intersects(&theirs) {
                    continue;
                }

                let absorbed = std::mem::take(&mut clusters[other].members);
                clusters[other].merged = true;
                trace!(
                    "merging cell ({}, {}) into ({}, {}): +{} annotations",
                    col,
                    row,
                    clusters[current].col,
                    clusters[current].row,
                    absorbed.len()
                );

                let cluster = &mut clusters[current];
                cluster.members.extend(absorbed);
                cluster.point = centroid_point(tree, &cluster.members);
                cluster.quadrant =
                    Quadrant::of(&grid.cell_rect(cluster.col, cluster.row), &cluster.point);
                merges += 1;
            }
        }

        merges
    }
}

fn centroid_point(tree: &AnnotationTree, members: &[usize]) -> MapPoint {
    let coords: Vec<GeoPoint> = members
        .iter()
        .map(|&i| tree.annotation(i).coordinate())
        .collect();
    match GeoPoint::centroid(&coords) {
        Some(c) => MapPoint::from_geo(&c),
        // Only reachable for an empty member list, which cells never hold.
        None => members
            .first()
            .map(|&i| tree.point(i))
            .unwrap_or(MapPoint::new(0.0, 0.0)),
    }
}

impl ClusteringAlgorithm for GridClustering {
    fn cluster(&self, viewport: &Viewport, tree: &AnnotationTree) -> Result<Vec<DisplayItem>> {
        self.validate()?;
        let mut grid = self.build_grid(viewport)?;

        let covered = MapRect::new(
            grid.origin.x,
            grid.origin.y,
            grid.columns as f64 * grid.cell.width,
            grid.rows as f64 * grid.cell.height,
        );
        let visible = tree.search_indices(&covered);

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); grid.columns * grid.rows];
        for &i in &visible {
            let (col, row) = grid.cell_of(&tree.point(i));
            buckets[row * grid.columns + col].push(i);
        }

        let mut clusters: Vec<CellCluster> = Vec::new();
        for (slot, members) in buckets.into_iter().enumerate() {
            if members.is_empty() {
                continue;
            }
            let (col, row) = (slot % grid.columns, slot / grid.columns);
            let point = centroid_point(tree, &members);
            let quadrant = Quadrant::of(&grid.cell_rect(col, row), &point);

            grid.slots[slot] = Some(clusters.len());
            clusters.push(CellCluster {
                col,
                row,
                members,
                point,
                quadrant,
                merged: false,
            });
        }

        let merges = match self.config.strategy {
            Strategy::Basic => 0,
            Strategy::TwoPhase => self.merge_overlapping(viewport, tree, &grid, &mut clusters),
        };

        let items: Vec<DisplayItem> = clusters
            .into_iter()
            .filter(|c| !c.merged)
            .filter_map(|c| {
                let members = c.members.iter().map(|&i| *tree.annotation(i)).collect();
                DisplayItem::from_members(members)
            })
            .collect();

        debug!(
            "grid clustering: {}x{} cells, {} visible annotations, {} merges, {} items",
            grid.columns,
            grid.rows,
            visible.len(),
            merges,
            items.len()
        );

        Ok(items)
    }
}
