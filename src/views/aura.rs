use async_trait::async_trait;

use super::{EntityView, TokenView, ViewKind, ViewNode};
use crate::core::constants::{AURA_DEFAULT_COLOR, AURA_DEFAULT_OPACITY};
use crate::core::geo::Point;
use crate::core::grid::Grid;
use crate::data::entities::{parse_color, Aura, Entity};
use crate::rendering::context::RenderContext;
use crate::rendering::visual::{Fill, Stroke, Visual};

/// One enabled aura of one token. Auras are not part of the snapshot; they
/// are derived from the token views on every draw.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraSource {
    pub id: String,
    pub token_id: String,
    pub aura: Aura,
    /// Pixel footprint of the owning token
    pub token_width: f64,
    pub token_height: f64,
}

impl AuraSource {
    /// Enabled auras of a visible token
    pub fn from_token(view: &TokenView) -> Vec<AuraSource> {
        if !view.node().visible {
            return Vec::new();
        }
        let token = view.token();
        token
            .auras
            .iter()
            .enumerate()
            .filter(|(_, aura)| aura.enabled)
            .map(|(index, aura)| AuraSource {
                id: format!("{}/aura/{}", token.id, index),
                token_id: token.id.clone(),
                aura: aura.clone(),
                token_width: view.node().width,
                token_height: view.node().height,
            })
            .collect()
    }
}

impl Entity for AuraSource {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Translucent disc around a token. Its node is positioned relative to the
/// token's aura anchor, so it follows a drag without being rebuilt.
#[derive(Debug)]
pub struct AuraView {
    source: AuraSource,
    grid: Grid,
    node: ViewNode,
}

impl AuraView {
    pub fn token_id(&self) -> &str {
        &self.source.token_id
    }

    fn layout(&mut self) {
        let reach = self.grid.units_to_pixels(self.source.aura.radius) * 2.0;
        let width = reach + self.source.token_width;
        let height = reach + self.source.token_height;
        self.node.set_size(width, height);
        self.node.set_center(Point::default());
    }
}

#[async_trait]
impl EntityView for AuraView {
    type Entity = AuraSource;

    const KIND: ViewKind = ViewKind::Aura;

    fn create(source: &AuraSource, grid: &Grid) -> Self {
        let mut view = Self {
            source: source.clone(),
            grid: *grid,
            node: ViewNode::new(),
        };
        view.layout();
        view
    }

    fn entity(&self) -> &AuraSource {
        &self.source
    }

    fn update(&mut self, source: &AuraSource, grid: &Grid) {
        self.source = source.clone();
        self.grid = *grid;
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, _ctx: &RenderContext) {
        self.node.clear();
        self.layout();

        let aura = &self.source.aura;
        let color = aura
            .color
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(AURA_DEFAULT_COLOR);
        let opacity = aura.opacity.unwrap_or(AURA_DEFAULT_OPACITY);
        let (w, h) = (self.node.width, self.node.height);

        self.node.add_child(
            Visual::Circle {
                center: Point::new(w / 2.0, h / 2.0),
                radius: w.min(h) / 2.0,
                fill: Some(Fill::new(color, opacity)),
                stroke: Some(Stroke::new(2.0, color, (opacity * 2.0).min(1.0))),
            },
            0,
        );
        self.node.mark_clean();
    }

    fn node(&self) -> &ViewNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}
