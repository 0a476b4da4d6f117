use async_trait::async_trait;

use super::{EntityView, ViewKind, ViewNode};
use crate::core::constants::NORMAL_TINT;
use crate::core::geo::Point;
use crate::core::grid::Grid;
use crate::data::entities::Tile;
use crate::rendering::context::RenderContext;
use crate::rendering::visual::Visual;

/// Image placed on the map, drawn in one of the three tile bands
#[derive(Debug)]
pub struct TileView {
    tile: Tile,
    node: ViewNode,
}

impl TileView {
    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    fn layout(&mut self) {
        self.node.position = Point::new(self.tile.x, self.tile.y);
        self.node.set_size(self.tile.width, self.tile.height);
        self.node.z_index = self.tile.z_index;
        self.node.visible = !self.tile.hidden;
    }
}

#[async_trait]
impl EntityView for TileView {
    type Entity = Tile;

    const KIND: ViewKind = ViewKind::Tile;

    fn create(tile: &Tile, _grid: &Grid) -> Self {
        let mut view = Self {
            tile: tile.clone(),
            node: ViewNode::new(),
        };
        view.layout();
        view
    }

    fn entity(&self) -> &Tile {
        &self.tile
    }

    fn update(&mut self, tile: &Tile, _grid: &Grid) {
        self.tile = tile.clone();
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, ctx: &RenderContext) {
        self.node.clear();
        self.layout();

        let texture = match self.tile.asset.resource.as_deref() {
            Some(resource) => ctx.textures.load(resource).await,
            None => None,
        };
        if let Some(texture) = texture {
            let (w, h) = (self.node.width, self.node.height);
            let asset = &self.tile.asset;
            self.node.add_child(
                Visual::Sprite {
                    texture,
                    position: Point::new(w / 2.0, h / 2.0),
                    anchor: Point::new(0.5 + asset.offset_x / 100.0, 0.5 + asset.offset_y / 100.0),
                    width: w * asset.scale,
                    height: h * asset.scale,
                    rotation: self.tile.rotation.to_radians(),
                    tint: NORMAL_TINT,
                },
                0,
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
    use crate::core::grid::GridKind;
    use crate::data::entities::MapLayer;

    #[test]
    fn test_tile_layout() {
        let tile = Tile {
            id: "floor".to_string(),
            x: 70.0,
            y: 140.0,
            width: 210.0,
            height: 70.0,
            z_index: 4,
            layer: MapLayer::Map,
            hidden: true,
            ..Tile::default()
        };
        let view = TileView::create(&tile, &Grid::new(GridKind::Square, 70.0).unwrap());

        assert_eq!(view.node().position, Point::new(70.0, 140.0));
        assert_eq!(view.node().size().width, 210.0);
        assert_eq!(view.node().z_index, 4);
        assert!(!view.node().visible);
        assert_eq!(view.id(), "floor");
    }
}
