use async_trait::async_trait;

use super::{bounding_box, EntityView, ViewKind, ViewNode};
use crate::core::constants::{AREA_DEFAULT_COLOR, AREA_DEFAULT_OPACITY};
use crate::core::geo::Point;
use crate::core::grid::Grid;
use crate::data::entities::{parse_color, AreaEffect, AreaShape};
use crate::rendering::context::RenderContext;
use crate::rendering::visual::{Fill, Stroke, Visual};

/// Segments used to approximate a cone's arc
const CONE_SEGMENTS: usize = 8;

/// Spell template anchored at its origin point
#[derive(Debug)]
pub struct AreaEffectView {
    effect: AreaEffect,
    grid: Grid,
    node: ViewNode,
}

impl AreaEffectView {
    pub fn effect(&self) -> &AreaEffect {
        &self.effect
    }

    /// Outline of the template in world pixels. Circles are returned as their
    /// bounding square.
    pub fn outline(&self) -> Vec<Point> {
        let origin = Point::new(self.effect.x, self.effect.y);
        let length = self.grid.units_to_pixels(self.effect.size);
        let angle = self.effect.angle.to_radians();
        let along = Point::new(angle.cos(), angle.sin());
        let across = Point::new(-along.y, along.x);

        match self.effect.shape {
            AreaShape::Circle | AreaShape::Cube => {
                let half = match self.effect.shape {
                    AreaShape::Circle => length,
                    _ => length / 2.0,
                };
                vec![
                    Point::new(origin.x - half, origin.y - half),
                    Point::new(origin.x + half, origin.y - half),
                    Point::new(origin.x + half, origin.y + half),
                    Point::new(origin.x - half, origin.y + half),
                ]
            }
            AreaShape::Cone => {
                // as wide as it is long at its far end
                let spread = 0.5_f64.atan();
                let mut points = vec![origin];
                for step in 0..=CONE_SEGMENTS {
                    let t = step as f64 / CONE_SEGMENTS as f64;
                    let theta = angle - spread + 2.0 * spread * t;
                    points.push(Point::new(
                        origin.x + length * theta.cos(),
                        origin.y + length * theta.sin(),
                    ));
                }
                points
            }
            AreaShape::Line => {
                let half_width = across.multiply(self.grid.size() / 2.0);
                let end = origin.add(&along.multiply(length));
                vec![
                    origin.add(&half_width),
                    end.add(&half_width),
                    end.subtract(&half_width),
                    origin.subtract(&half_width),
                ]
            }
        }
    }

    fn layout(&mut self) {
        let bounds = bounding_box(&self.outline());
        self.node.position = bounds.origin;
        self.node.set_size(bounds.size.width, bounds.size.height);
        self.node.z_index = self.effect.layer.rank();
    }
}

#[async_trait]
impl EntityView for AreaEffectView {
    type Entity = AreaEffect;

    const KIND: ViewKind = ViewKind::AreaEffect;

    fn create(effect: &AreaEffect, grid: &Grid) -> Self {
        let mut view = Self {
            effect: effect.clone(),
            grid: *grid,
            node: ViewNode::new(),
        };
        view.layout();
        view
    }

    fn entity(&self) -> &AreaEffect {
        &self.effect
    }

    fn update(&mut self, effect: &AreaEffect, grid: &Grid) {
        self.effect = effect.clone();
        self.grid = *grid;
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, _ctx: &RenderContext) {
        self.node.clear();
        self.layout();

        let color = self
            .effect
            .color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(AREA_DEFAULT_COLOR);
        let fill = Some(Fill::new(color, self.effect.opacity.unwrap_or(AREA_DEFAULT_OPACITY)));
        let stroke = Some(Stroke::new(2.0, color, 1.0));
        let (w, h) = (self.node.width, self.node.height);

        let visual = match self.effect.shape {
            AreaShape::Circle => Visual::Circle {
                center: Point::new(w / 2.0, h / 2.0),
                radius: w / 2.0,
                fill,
                stroke,
            },
            _ => {
                let origin = self.node.position;
                Visual::Polyline {
                    points: self.outline().iter().map(|p| p.subtract(&origin)).collect(),
                    closed: true,
                    fill,
                    stroke,
                }
            }
        };
        self.node.add_child(visual, 0);
        self.node.mark_clean();
    }

    fn node(&self) -> &ViewNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}
