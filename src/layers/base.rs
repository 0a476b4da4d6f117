//! Layer identities and the generic entity layer
//!
//! A `Layer<V>` keeps exactly one view per entity id. `update` reconciles the
//! views against a fresh entity sequence in O(|entities| + |views|): views of
//! surviving ids are updated in place, new ids get a fresh view and ids that
//! disappeared are destroyed.

use std::fmt;

use crate::core::grid::Grid;
use crate::data::entities::Entity;
use crate::prelude::{HashMap, HashSet};
use crate::rendering::context::RenderContext;
use crate::views::{EntityView, ViewNode};

/// Fixed layer identities, declared bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    BottomTiles,
    Grid,
    MiddleTiles,
    Lights,
    Auras,
    TopTiles,
    Drawings,
    AreaEffects,
    Markers,
    Monsters,
    Vision,
    Fog,
    Effects,
    Players,
}

impl LayerKind {
    /// Composite order, bottom to top
    pub const STACK: [LayerKind; 15] = [
        LayerKind::Background,
        LayerKind::BottomTiles,
        LayerKind::Grid,
        LayerKind::MiddleTiles,
        LayerKind::Lights,
        LayerKind::Auras,
        LayerKind::TopTiles,
        LayerKind::Drawings,
        LayerKind::AreaEffects,
        LayerKind::Markers,
        LayerKind::Monsters,
        LayerKind::Vision,
        LayerKind::Fog,
        LayerKind::Effects,
        LayerKind::Players,
    ];

    /// Order layers are drawn in after the background. Auras come after both
    /// token layers because they are derived from the token views.
    pub const DRAW_SEQUENCE: [LayerKind; 14] = [
        LayerKind::Vision,
        LayerKind::Fog,
        LayerKind::Grid,
        LayerKind::Lights,
        LayerKind::Monsters,
        LayerKind::Players,
        LayerKind::Auras,
        LayerKind::BottomTiles,
        LayerKind::MiddleTiles,
        LayerKind::TopTiles,
        LayerKind::AreaEffects,
        LayerKind::Markers,
        LayerKind::Drawings,
        LayerKind::Effects,
    ];

    /// Position in the composite stack
    pub fn z_index(self) -> i32 {
        Self::STACK
            .iter()
            .position(|kind| *kind == self)
            .map(|index| index as i32)
            .unwrap_or_default()
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Background => "background",
            LayerKind::BottomTiles => "bottom-tiles",
            LayerKind::Grid => "grid",
            LayerKind::MiddleTiles => "middle-tiles",
            LayerKind::Lights => "lights",
            LayerKind::Auras => "auras",
            LayerKind::TopTiles => "top-tiles",
            LayerKind::Drawings => "drawings",
            LayerKind::AreaEffects => "area-effects",
            LayerKind::Markers => "markers",
            LayerKind::Monsters => "monsters",
            LayerKind::Vision => "vision",
            LayerKind::Fog => "fog",
            LayerKind::Effects => "effects",
            LayerKind::Players => "players",
        };
        write!(f, "{}", name)
    }
}

/// What one reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Texture keys held by destroyed views
    pub released: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Keyed collection of views for one entity type
#[derive(Debug)]
pub struct Layer<V: EntityView> {
    kind: LayerKind,
    node: ViewNode,
    views: Vec<V>,
    index: HashMap<String, usize>,
    grid: Option<Grid>,
}

impl<V: EntityView> Layer<V> {
    pub fn new(kind: LayerKind) -> Self {
        let mut node = ViewNode::new();
        node.z_index = kind.z_index();
        Self {
            kind,
            node,
            views: Vec::new(),
            index: HashMap::default(),
            grid: None,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Brings the views in line with `entities`. A changed grid updates every
    /// surviving view; otherwise only views whose entity changed are touched.
    /// Duplicate ids keep their first occurrence.
    pub fn update(&mut self, entities: &[V::Entity], grid: &Grid) -> Reconciliation {
        let regrid = self.grid.as_ref() != Some(grid);
        self.grid = Some(*grid);

        let mut result = Reconciliation::default();
        let mut live: HashSet<&str> = HashSet::default();
        live.reserve(entities.len());

        for entity in entities {
            let id = entity.id();
            if !live.insert(id) {
                log::warn!("{} layer: duplicate id {}, keeping the first", self.kind, id);
                continue;
            }
            match self.index.get(id).copied() {
                Some(position) => {
                    let view = &mut self.views[position];
                    if regrid || view.entity() != entity {
                        view.update(entity, grid);
                        result.updated.push(id.to_string());
                    }
                }
                None => {
                    self.index.insert(id.to_string(), self.views.len());
                    self.views.push(V::create(entity, grid));
                    result.added.push(id.to_string());
                }
            }
        }

        if self.views.len() > live.len() {
            let views = std::mem::take(&mut self.views);
            for view in views {
                if live.contains(view.id()) {
                    self.views.push(view);
                } else {
                    result.removed.push(view.id().to_string());
                    result.released.extend(view.texture_keys());
                }
            }
            self.reindex();
        }

        if !result.is_empty() {
            log::debug!(
                "{} layer: {} added, {} updated, {} removed",
                self.kind,
                result.added.len(),
                result.updated.len(),
                result.removed.len()
            );
        }
        result
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, view) in self.views.iter().enumerate() {
            self.index.insert(view.id().to_string(), position);
        }
    }

    /// Draws every dirty view and returns how many were drawn. Textures a
    /// view stopped showing are handed back to the cache.
    pub async fn draw(&mut self, ctx: &RenderContext) -> usize {
        let mut drawn = 0;
        for view in self.views.iter_mut().filter(|view| view.node().is_dirty()) {
            let shown = view.texture_keys();
            view.draw(ctx).await;
            let still_shown = view.texture_keys();
            for key in shown.iter().filter(|key| !still_shown.contains(key)) {
                ctx.textures.release(key);
            }
            drawn += 1;
        }
        drawn
    }

    pub fn mark_all_dirty(&mut self) {
        for view in &mut self.views {
            view.node_mut().mark_dirty();
        }
    }

    /// Views by ascending z, ties in insertion order
    pub fn ordered_views(&self) -> Vec<&V> {
        let mut views: Vec<&V> = self.views.iter().collect();
        views.sort_by_key(|view| view.node().z_index);
        views
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.index.get(id).map(|&position| &self.views[position])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut V> {
        match self.index.get(id) {
            Some(&position) => self.views.get_mut(position),
            None => None,
        }
    }

    pub fn views(&self) -> &[V] {
        &self.views
    }

    pub fn views_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.views.iter_mut()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.views.iter().map(|view| view.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn node(&self) -> &ViewNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridKind;
    use crate::data::entities::{MapLayer, Marker, Role, Token};
    use crate::views::{MarkerView, TokenView};

    fn grid() -> Grid {
        Grid::new(GridKind::Square, 70.0).unwrap()
    }

    fn marker(id: &str, x: f64) -> Marker {
        Marker {
            id: id.to_string(),
            x,
            y: 35.0,
            layer: MapLayer::Object,
            ..Marker::default()
        }
    }

    #[test]
    fn test_layer_kind_display() {
        assert_eq!(LayerKind::BottomTiles.to_string(), "bottom-tiles");
        assert_eq!(LayerKind::Players.to_string(), "players");
    }

    #[test]
    fn test_stack_and_sequence_cover_every_layer() {
        let mut drawn: Vec<LayerKind> = LayerKind::DRAW_SEQUENCE.to_vec();
        drawn.push(LayerKind::Background);
        for kind in LayerKind::STACK {
            assert!(drawn.contains(&kind), "{} is never drawn", kind);
        }
        assert_eq!(LayerKind::Background.z_index(), 0);
        assert_eq!(LayerKind::Players.z_index(), 14);
        assert!(LayerKind::Monsters.z_index() < LayerKind::Fog.z_index());
    }

    #[test]
    fn test_reconcile_add_update_remove() {
        let mut layer: Layer<MarkerView> = Layer::new(LayerKind::Markers);
        let first = layer.update(&[marker("a", 35.0), marker("b", 105.0), marker("c", 175.0)], &grid());
        assert_eq!(first.added, vec!["a", "b", "c"]);

        let second = layer.update(&[marker("a", 35.0), marker("c", 245.0)], &grid());
        assert!(second.added.is_empty());
        assert_eq!(second.updated, vec!["c"]);
        assert_eq!(second.removed, vec!["b"]);
        assert_eq!(layer.ids(), vec!["a", "c"]);
        assert!(layer.get("b").is_none());
        assert_eq!(layer.get("c").map(|v| v.entity().x), Some(245.0));
    }

    #[test]
    fn test_unchanged_entities_are_not_touched() {
        let mut layer: Layer<MarkerView> = Layer::new(LayerKind::Markers);
        layer.update(&[marker("a", 35.0)], &grid());
        layer.get_mut("a").unwrap().node_mut().mark_clean();

        let result = layer.update(&[marker("a", 35.0)], &grid());
        assert!(result.is_empty());
        assert!(!layer.get("a").unwrap().node().is_dirty());

        // a new grid touches everyone
        let result = layer.update(&[marker("a", 35.0)], &Grid::new(GridKind::Hex, 70.0).unwrap());
        assert_eq!(result.updated, vec!["a"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut layer: Layer<MarkerView> = Layer::new(LayerKind::Markers);
        layer.update(&[marker("a", 35.0), marker("a", 500.0)], &grid());
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.get("a").unwrap().entity().x, 35.0);
    }

    #[test]
    fn test_ordered_views_stable_on_ties() {
        let mut layer: Layer<TokenView> = Layer::new(LayerKind::Monsters);
        let mut dead = Token::new("dead", Role::Hostile, 0.0, 0.0);
        dead.dead = true;
        let tokens = vec![
            Token::new("x", Role::Hostile, 0.0, 0.0),
            dead,
            Token::new("y", Role::Neutral, 0.0, 0.0),
        ];
        layer.update(&tokens, &grid());

        let order: Vec<_> = layer.ordered_views().iter().map(|v| v.id()).collect();
        assert_eq!(order, vec!["dead", "x", "y"]);
    }
}
