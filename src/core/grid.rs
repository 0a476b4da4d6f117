//! Grid coordinate system
//!
//! Square grids address cells by `(col, row)`. Hex grids use pointy-top
//! axial coordinates where `col` is `q` and `row` is `r`. The configured cell
//! size is the distance between the centers of two horizontally adjacent
//! cells in both topologies, and cell `(0, 0)` always touches the world origin.

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_UNITS_PER_CELL, HEX_PACKING_FACTOR};
use crate::core::geo::{Point, Size};
use crate::{MapError, Result};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    #[default]
    Square,
    Hex,
}

/// Grid description carried by map metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSpec {
    pub kind: GridKind,
    pub size: f64,
    pub units_per_cell: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            kind: GridKind::Square,
            size: 70.0,
            units_per_cell: DEFAULT_UNITS_PER_CELL,
        }
    }
}

/// A discrete cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Footprint of an entity measured in cells
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub width: f64,
    pub height: f64,
}

impl GridSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// Immutable coordinate space for one render cycle. Replaced wholesale when
/// the map metadata changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    spec: GridSpec,
}

impl Grid {
    /// Fails fast on a cell size that cannot produce a coordinate space.
    pub fn new(kind: GridKind, size: f64) -> Result<Self> {
        Self::from_spec(GridSpec {
            kind,
            size,
            ..GridSpec::default()
        })
    }

    pub fn from_spec(spec: GridSpec) -> Result<Self> {
        if !spec.size.is_finite() || spec.size <= 0.0 {
            return Err(MapError::InvalidGrid(format!(
                "cell size must be positive, got {}",
                spec.size
            )));
        }
        if !spec.units_per_cell.is_finite() || spec.units_per_cell <= 0.0 {
            return Err(MapError::InvalidGrid(format!(
                "units per cell must be positive, got {}",
                spec.units_per_cell
            )));
        }
        Ok(Self { spec })
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn kind(&self) -> GridKind {
        self.spec.kind
    }

    pub fn size(&self) -> f64 {
        self.spec.size
    }

    pub fn units_per_cell(&self) -> f64 {
        self.spec.units_per_cell
    }

    /// Circumradius of a hex cell
    fn hex_radius(&self) -> f64 {
        self.spec.size / SQRT_3
    }

    /// Geometric center of `cell` in world pixels.
    pub fn cell_to_pixel(&self, cell: Cell) -> Point {
        let s = self.spec.size;
        match self.spec.kind {
            GridKind::Square => Point::new(
                (cell.col as f64 + 0.5) * s,
                (cell.row as f64 + 0.5) * s,
            ),
            GridKind::Hex => {
                let radius = self.hex_radius();
                let q = cell.col as f64;
                let r = cell.row as f64;
                Point::new(s * (q + r / 2.0) + s / 2.0, 1.5 * radius * r + radius)
            }
        }
    }

    /// Cell containing `point`. Hex lookups round in cube space so points near
    /// an edge resolve to the closest center.
    pub fn pixel_to_cell(&self, point: Point) -> Cell {
        let s = self.spec.size;
        match self.spec.kind {
            GridKind::Square => Cell::new((point.x / s).floor() as i32, (point.y / s).floor() as i32),
            GridKind::Hex => {
                let radius = self.hex_radius();
                let r = (point.y - radius) / (1.5 * radius);
                let q = (point.x - s / 2.0) / s - r / 2.0;
                let (q, r) = axial_round(q, r);
                Cell::new(q, r)
            }
        }
    }

    /// Pixel footprint of an entity spanning `grid_size` cells.
    pub fn size_from_grid_size(&self, grid_size: GridSize) -> Size {
        let s = self.spec.size;
        match self.spec.kind {
            GridKind::Square => Size::new(grid_size.width * s, grid_size.height * s),
            GridKind::Hex => Size::new(
                grid_size.width * s,
                grid_size.height * s * HEX_PACKING_FACTOR,
            ),
        }
    }

    /// Pixel size of a single cell footprint.
    pub fn adjusted_size(&self) -> Size {
        self.size_from_grid_size(GridSize::new(1.0, 1.0))
    }

    /// Number of steps between two cells.
    pub fn distance(&self, a: Cell, b: Cell) -> u32 {
        let dq = b.col - a.col;
        let dr = b.row - a.row;
        match self.spec.kind {
            GridKind::Square => dq.unsigned_abs().max(dr.unsigned_abs()),
            GridKind::Hex => {
                (dq.unsigned_abs() + dr.unsigned_abs() + (dq + dr).unsigned_abs()) / 2
            }
        }
    }

    /// Distance in grid units (feet by convention).
    pub fn distance_in_units(&self, a: Cell, b: Cell) -> f64 {
        self.distance(a, b) as f64 * self.spec.units_per_cell
    }

    /// Converts a radius in grid units to pixels.
    pub fn units_to_pixels(&self, units: f64) -> f64 {
        units / self.spec.units_per_cell * self.spec.size
    }

    /// Corner points of a cell's outline, for drawing the grid itself.
    pub fn cell_outline(&self, cell: Cell) -> Vec<Point> {
        let center = self.cell_to_pixel(cell);
        match self.spec.kind {
            GridKind::Square => {
                let half = self.spec.size / 2.0;
                vec![
                    Point::new(center.x - half, center.y - half),
                    Point::new(center.x + half, center.y - half),
                    Point::new(center.x + half, center.y + half),
                    Point::new(center.x - half, center.y + half),
                ]
            }
            GridKind::Hex => {
                let radius = self.hex_radius();
                (0..6)
                    .map(|i| {
                        let angle = (60.0 * i as f64 - 30.0).to_radians();
                        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                    })
                    .collect()
            }
        }
    }
}

/// Rounds fractional axial coordinates to the nearest hex.
fn axial_round(q: f64, r: f64) -> (i32, i32) {
    let x = q;
    let z = r;
    let y = -x - z;

    let mut rx = x.round();
    let ry = y.round();
    let mut rz = z.round();

    let x_diff = (rx - x).abs();
    let y_diff = (ry - y).abs();
    let z_diff = (rz - z).abs();

    // reset the component with the largest rounding error
    if x_diff > y_diff && x_diff > z_diff {
        rx = -ry - rz;
    } else if y_diff <= z_diff {
        rz = -rx - ry;
    }

    (rx as i32, rz as i32)
}
