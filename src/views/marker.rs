use async_trait::async_trait;

use super::{EntityView, ViewKind, ViewNode};
use crate::core::constants::{MARKER_DEFAULT_COLOR, NORMAL_TINT};
use crate::core::geo::Point;
use crate::core::grid::Grid;
use crate::data::entities::{parse_color, Marker};
use crate::rendering::context::RenderContext;
use crate::rendering::visual::{Fill, Stroke, Visual};

/// Map pin, one cell wide and centered on its point
#[derive(Debug)]
pub struct MarkerView {
    marker: Marker,
    grid: Grid,
    node: ViewNode,
}

impl MarkerView {
    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    fn layout(&mut self) {
        let size = self.grid.adjusted_size();
        self.node.set_size(size.width, size.height);
        self.node.set_center(Point::new(self.marker.x, self.marker.y));
        self.node.z_index = self.marker.layer.rank();
        self.node.visible = !self.marker.hidden;
    }
}

#[async_trait]
impl EntityView for MarkerView {
    type Entity = Marker;

    const KIND: ViewKind = ViewKind::Marker;

    fn create(marker: &Marker, grid: &Grid) -> Self {
        let mut view = Self {
            marker: marker.clone(),
            grid: *grid,
            node: ViewNode::new(),
        };
        view.layout();
        view
    }

    fn entity(&self) -> &Marker {
        &self.marker
    }

    fn update(&mut self, marker: &Marker, grid: &Grid) {
        self.marker = marker.clone();
        self.grid = *grid;
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, ctx: &RenderContext) {
        self.node.clear();
        self.layout();

        let (w, h) = (self.node.width, self.node.height);
        let center = Point::new(w / 2.0, h / 2.0);
        let icon = match self.marker.icon.as_ref().and_then(|a| a.resource.as_deref()) {
            Some(resource) => ctx.textures.load(resource).await,
            None => None,
        };

        match icon {
            Some(texture) => {
                let scale = self.marker.icon.as_ref().map(|a| a.scale).unwrap_or(1.0);
                self.node.add_child(
                    Visual::Sprite {
                        texture,
                        position: center,
                        anchor: Point::new(0.5, 0.5),
                        width: w * scale,
                        height: h * scale,
                        rotation: 0.0,
                        tint: NORMAL_TINT,
                    },
                    0,
                );
            }
            None => {
                let color = self
                    .marker
                    .color
                    .as_deref()
                    .and_then(parse_color)
                    .unwrap_or(MARKER_DEFAULT_COLOR);
                self.node.add_child(
                    Visual::Circle {
                        center,
                        radius: w.min(h) / 4.0,
                        fill: Some(Fill::new(color, 0.9)),
                        stroke: Some(Stroke::new(2.0, 0xffffff, 1.0)),
                    },
                    0,
                );
            }
        }

        if let Some(label) = self.marker.label.clone() {
            self.node.add_child(
                Visual::Text {
                    text: label,
                    position: Point::new(w / 2.0, h),
                    font_size: self.grid.size() / 5.0,
                    color: 0xffffff,
                },
                1,
            );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::core::grid::GridKind;
    use crate::data::entities::MapLayer;
    use crate::textures::{MemoryFetcher, TextureCache};
    use std::sync::Arc;

    #[test]
    fn test_marker_centered_on_point() {
        let marker = Marker {
            id: "trap".to_string(),
            x: 105.0,
            y: 35.0,
            label: Some("Trap".to_string()),
            color: Some("#ff0000".to_string()),
            layer: MapLayer::Token,
            ..Marker::default()
        };
        let mut view = MarkerView::create(&marker, &Grid::new(GridKind::Square, 70.0).unwrap());
        assert_eq!(view.node().position, Point::new(70.0, 0.0));
        assert_eq!(view.node().z_index, 2);

        let config = EngineConfig::default();
        let ctx = RenderContext::new(
            TextureCache::with_fetcher(&config, Arc::new(MemoryFetcher::new())),
            config.assets,
        );
        futures::executor::block_on(view.draw(&ctx));

        let children = view.node().children();
        assert_eq!(children.len(), 2);
        assert!(matches!(
            children[0].visual,
            Visual::Circle { fill: Some(Fill { color: 0xff0000, .. }), .. }
        ));
    }
}
