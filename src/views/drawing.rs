use async_trait::async_trait;

use super::{bounding_box, EntityView, ViewKind, ViewNode};
use crate::core::constants::DRAWING_DEFAULT_COLOR;
use crate::core::geo::{Point, Rect};
use crate::core::grid::Grid;
use crate::data::entities::{parse_color, Drawing, DrawingShape};
use crate::rendering::context::RenderContext;
use crate::rendering::visual::{Fill, Stroke, Visual};

/// Annotation drawn in world coordinates. The node sits at the bounding box
/// of the shape's points.
#[derive(Debug)]
pub struct DrawingView {
    drawing: Drawing,
    node: ViewNode,
}

impl DrawingView {
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    fn layout(&mut self) {
        let bounds = bounding_box(&self.drawing.points());
        self.node.position = bounds.origin;
        self.node.set_size(bounds.size.width, bounds.size.height);
        self.node.z_index = self.drawing.layer.rank();
        self.node.alpha = self.drawing.opacity.unwrap_or(1.0);
    }
}

#[async_trait]
impl EntityView for DrawingView {
    type Entity = Drawing;

    const KIND: ViewKind = ViewKind::Drawing;

    fn create(drawing: &Drawing, _grid: &Grid) -> Self {
        let mut view = Self {
            drawing: drawing.clone(),
            node: ViewNode::new(),
        };
        view.layout();
        view
    }

    fn entity(&self) -> &Drawing {
        &self.drawing
    }

    fn update(&mut self, drawing: &Drawing, _grid: &Grid) {
        self.drawing = drawing.clone();
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, _ctx: &RenderContext) {
        self.node.clear();
        self.layout();

        let origin = self.node.position;
        let points: Vec<Point> = self
            .drawing
            .points()
            .iter()
            .map(|p| p.subtract(&origin))
            .collect();
        let stroke_color = self
            .drawing
            .stroke_color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(DRAWING_DEFAULT_COLOR);
        let stroke = Some(Stroke::new(self.drawing.stroke_width.max(1.0), stroke_color, 1.0));
        let fill = self
            .drawing
            .fill_color
            .as_deref()
            .and_then(parse_color)
            .map(|color| Fill::new(color, 1.0));

        let visual = match (self.drawing.shape, points.as_slice()) {
            (DrawingShape::Line, [_, _, ..]) => Some(Visual::Polyline {
                points: points.clone(),
                closed: false,
                fill: None,
                stroke,
            }),
            (DrawingShape::Rectangle, [_, _, ..]) => Some(Visual::Rect {
                rect: Rect::new(0.0, 0.0, self.node.width, self.node.height),
                corner_radius: 0.0,
                fill,
                stroke,
            }),
            (DrawingShape::Circle, [center, rim, ..]) => Some(Visual::Circle {
                center: *center,
                radius: center.distance_to(rim),
                fill,
                stroke,
            }),
            _ => None,
        };
        match visual {
            Some(visual) => {
                self.node.add_child(visual, 0);
            }
            None => log::debug!("drawing {} has too few points", self.drawing.id),
        }
        self.node.mark_clean();
    }

    fn node(&self) -> &ViewNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}
