use crate::core::constants::{DEFAULT_MAP_CELLS, NORMAL_TINT};
use crate::core::geo::{Point, Size};
use crate::core::grid::Grid;
use crate::data::snapshot::MapInfo;
use crate::layers::base::LayerKind;
use crate::rendering::context::RenderContext;
use crate::rendering::visual::Visual;
use crate::views::ViewNode;

/// Map image. Its drawn size defines the extent of every other layer.
#[derive(Debug)]
pub struct BackgroundLayer {
    node: ViewNode,
    map: Option<MapInfo>,
    grid: Option<Grid>,
}

impl BackgroundLayer {
    pub fn new() -> Self {
        let mut node = ViewNode::new();
        node.z_index = LayerKind::Background.z_index();
        Self {
            node,
            map: None,
            grid: None,
        }
    }

    pub fn update(&mut self, map: &MapInfo, grid: &Grid) {
        if self.map.as_ref() != Some(map) || self.grid.as_ref() != Some(grid) {
            self.map = Some(map.clone());
            self.grid = Some(*grid);
            self.node.mark_dirty();
        }
    }

    /// Size used when neither the map nor its image says otherwise
    fn fallback_size(&self) -> Size {
        let cell = self.grid.map(|grid| grid.size()).unwrap_or_default();
        Size::new(cell * DEFAULT_MAP_CELLS, cell * DEFAULT_MAP_CELLS)
    }

    pub async fn draw(&mut self, ctx: &RenderContext) -> usize {
        if !self.node.is_dirty() {
            return 0;
        }
        let shown = self.node.texture_keys();
        self.node.clear();
        let Some(map) = self.map.clone() else {
            return 0;
        };

        let resource = map.background.as_ref().and_then(|a| a.resource.as_deref());
        let texture = match resource {
            Some(resource) => ctx.textures.load(resource).await,
            None => None,
        };

        let fallback = self.fallback_size();
        let size = match (map.width, map.height, &texture) {
            (Some(width), Some(height), _) => Size::new(width, height),
            (_, _, Some(texture)) => Size::new(texture.width() as f64, texture.height() as f64),
            _ => fallback,
        };
        self.node.set_size(size.width, size.height);

        if let Some(texture) = texture {
            self.node.add_child(
                Visual::Sprite {
                    texture,
                    position: Point::default(),
                    anchor: Point::default(),
                    width: size.width,
                    height: size.height,
                    rotation: 0.0,
                    tint: NORMAL_TINT,
                },
                0,
            );
        }
        let still_shown = self.node.texture_keys();
        for key in shown.iter().filter(|key| !still_shown.contains(key)) {
            ctx.textures.release(key);
        }
        self.node.mark_clean();
        1
    }

    pub fn size(&self) -> Size {
        self.node.size()
    }

    pub fn node(&self) -> &ViewNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}

impl Default for BackgroundLayer {
    fn default() -> Self {
        Self::new()
    }
}
