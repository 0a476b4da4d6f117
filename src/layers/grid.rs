use crate::core::constants::{GRID_LINE_ALPHA, GRID_LINE_COLOR};
use crate::core::geo::{Point, Rect};
use crate::core::grid::{Cell, Grid, GridKind};
use crate::layers::base::LayerKind;
use crate::rendering::visual::{Stroke, Visual};
use crate::views::ViewNode;

/// Cell outlines covering the map
#[derive(Debug)]
pub struct GridLayer {
    node: ViewNode,
    grid: Option<Grid>,
}

impl GridLayer {
    pub fn new() -> Self {
        let mut node = ViewNode::new();
        node.z_index = LayerKind::Grid.z_index();
        Self { node, grid: None }
    }

    pub fn update(&mut self, grid: &Grid) {
        if self.grid.as_ref() != Some(grid) {
            self.grid = Some(*grid);
            self.node.mark_dirty();
        }
    }

    /// Resizes the layer; a new extent needs new lines.
    pub fn set_size(&mut self, width: f64, height: f64) {
        if self.node.width != width || self.node.height != height {
            self.node.set_size(width, height);
            self.node.mark_dirty();
        }
    }

    pub fn draw(&mut self) -> usize {
        if !self.node.is_dirty() {
            return 0;
        }
        self.node.clear();
        let Some(grid) = self.grid else {
            return 0;
        };
        let (w, h) = (self.node.width, self.node.height);
        let stroke = Some(Stroke::new(1.0, GRID_LINE_COLOR, GRID_LINE_ALPHA));

        match grid.kind() {
            GridKind::Square => {
                let s = grid.size();
                let columns = (w / s).floor() as usize;
                let rows = (h / s).floor() as usize;
                for col in 0..=columns {
                    let x = col as f64 * s;
                    self.node.add_child(line(Point::new(x, 0.0), Point::new(x, h), stroke), 0);
                }
                for row in 0..=rows {
                    let y = row as f64 * s;
                    self.node.add_child(line(Point::new(0.0, y), Point::new(w, y), stroke), 0);
                }
            }
            GridKind::Hex => {
                let bounds = Rect::new(0.0, 0.0, w, h);
                for cell in cells_within(&grid, w, h) {
                    if !bounds.contains(&grid.cell_to_pixel(cell)) {
                        continue;
                    }
                    self.node.add_child(
                        Visual::Polyline {
                            points: grid.cell_outline(cell),
                            closed: true,
                            fill: None,
                            stroke,
                        },
                        0,
                    );
                }
            }
        }
        self.node.mark_clean();
        1
    }

    pub fn node(&self) -> &ViewNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}

impl Default for GridLayer {
    fn default() -> Self {
        Self::new()
    }
}

fn line(from: Point, to: Point, stroke: Option<Stroke>) -> Visual {
    Visual::Polyline {
        points: vec![from, to],
        closed: false,
        fill: None,
        stroke,
    }
}

/// Candidate hex cells for a `w` x `h` area, rows shifted back so the map
/// stays rectangular.
fn cells_within(grid: &Grid, w: f64, h: f64) -> Vec<Cell> {
    let last = grid.pixel_to_cell(Point::new(w, h));
    let rows = last.row.max(0);
    let columns = (w / grid.size()).ceil() as i32;
    let mut cells = Vec::new();
    for row in 0..=rows {
        let shift = row / 2;
        for col in (-shift - 1)..=(columns - shift) {
            cells.push(Cell::new(col, row));
        }
    }
    cells
}
