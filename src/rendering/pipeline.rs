//! Composition of the drawn scene into a flat, backend-agnostic display list

use crate::core::geo::Point;
use crate::layers::base::{Layer, LayerKind};
use crate::rendering::visual::Visual;
use crate::views::{EntityView, ViewKind, ViewNode};

/// One primitive positioned in world space
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub layer: LayerKind,
    /// The view the primitive belongs to, `None` for layer-level visuals
    pub view: Option<(ViewKind, String)>,
    /// World position the visual's local coordinates are relative to
    pub origin: Point,
    pub alpha: f32,
    pub visual: Visual,
}

/// Everything a backend needs to paint one frame, bottom to top
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Appends the visible children of `node`, by z, placed at `offset`.
    pub fn push_node(
        &mut self,
        layer: LayerKind,
        view: Option<(ViewKind, &str)>,
        node: &ViewNode,
        offset: Point,
        alpha: f32,
    ) {
        if !node.visible {
            return;
        }
        let origin = offset.add(&node.position);
        let alpha = alpha * node.alpha;
        for child in node.sorted_children() {
            if !child.visible {
                continue;
            }
            self.commands.push(DrawCommand {
                layer,
                view: view.map(|(kind, id)| (kind, id.to_string())),
                origin,
                alpha,
                visual: child.visual.clone(),
            });
        }
    }

    /// Appends a view anchored somewhere other than its layer origin
    pub fn push_view<V: EntityView>(&mut self, layer: LayerKind, view: &V, offset: Point, alpha: f32) {
        self.push_node(layer, Some((V::KIND, view.id())), view.node(), offset, alpha);
    }

    /// Appends every visible view of a layer, stable-sorted by z
    pub fn push_layer<V: EntityView>(&mut self, layer: &Layer<V>) {
        let node = layer.node();
        if !node.visible {
            return;
        }
        for view in layer.ordered_views() {
            self.push_view(layer.kind(), view, node.position, node.alpha);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Layers in the order their first command appears
    pub fn layer_order(&self) -> Vec<LayerKind> {
        let mut order: Vec<LayerKind> = Vec::new();
        for command in &self.commands {
            if order.last() != Some(&command.layer) {
                order.push(command.layer);
            }
        }
        order
    }

    /// Commands belonging to one view
    pub fn commands_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.commands
            .iter()
            .filter(move |command| matches!(&command.view, Some((_, view_id)) if view_id == id))
    }
}
