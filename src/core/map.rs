//! Root map container
//!
//! Owns the grid, the texture cache and every layer. `update` reconciles the
//! layers against a snapshot synchronously; `draw` rebuilds dirty visuals in
//! a fixed sequence; `display_list` flattens the scene for a backend.

use std::time::Duration;

use instant::Instant;

use crate::core::config::EngineConfig;
use crate::core::geo::{Point, Rect};
use crate::core::grid::{Grid, GridSpec};
use crate::data::entities::MapLayer;
use crate::data::snapshot::WorldSnapshot;
use crate::input::events::{InteractionContext, InteractionMode, PointerEvent};
use crate::input::messages::{ControlState, Outbox, ProtocolMessage, TokenMoved};
use crate::layers::{
    AreaEffectsLayer, AurasLayer, BackgroundLayer, DrawingsLayer, GridLayer, Layer, LayerKind,
    MarkersLayer, OverlayKind, OverlayLayer, TilesLayer, TokensLayer,
};
use crate::rendering::context::RenderContext;
use crate::rendering::pipeline::DisplayList;
use crate::textures::TextureCache;
use crate::views::{
    AreaEffectView, AuraSource, DrawingView, EntityView, MarkerView, TileView, TokenView,
    ViewNode, ViewRef,
};
use crate::Result;

/// Outcome of one draw pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawStats {
    /// Views and layer-level nodes rebuilt
    pub views_drawn: usize,
    pub elapsed: Duration,
}

pub struct MapContainer {
    config: EngineConfig,
    context: RenderContext,
    grid: Option<Grid>,
    node: ViewNode,

    background: BackgroundLayer,
    grid_layer: GridLayer,
    lights: OverlayLayer,
    vision: OverlayLayer,
    fog: OverlayLayer,
    effects: OverlayLayer,
    bottom_tiles: TilesLayer,
    middle_tiles: TilesLayer,
    top_tiles: TilesLayer,
    auras: AurasLayer,
    drawings: DrawingsLayer,
    area_effects: AreaEffectsLayer,
    markers: MarkersLayer,
    monsters: TokensLayer,
    players: TokensLayer,

    interaction: InteractionContext,
    turned: Option<String>,
    active_drag: Option<String>,
    outbox: Option<Outbox>,
}

impl MapContainer {
    /// Container loading assets over HTTP from the configured hosts
    pub fn new(config: EngineConfig) -> Self {
        let textures = TextureCache::from_config(&config);
        Self::with_textures(config, textures)
    }

    pub fn with_textures(config: EngineConfig, textures: TextureCache) -> Self {
        let context = RenderContext::new(textures, config.assets.clone());
        let interaction = InteractionContext::new(config.interaction);
        Self {
            config,
            context,
            grid: None,
            node: ViewNode::new(),
            background: BackgroundLayer::new(),
            grid_layer: GridLayer::new(),
            lights: OverlayLayer::new(OverlayKind::Lights),
            vision: OverlayLayer::new(OverlayKind::Vision),
            fog: OverlayLayer::new(OverlayKind::Fog),
            effects: OverlayLayer::new(OverlayKind::Effects),
            bottom_tiles: Layer::new(LayerKind::BottomTiles),
            middle_tiles: Layer::new(LayerKind::MiddleTiles),
            top_tiles: Layer::new(LayerKind::TopTiles),
            auras: Layer::new(LayerKind::Auras),
            drawings: Layer::new(LayerKind::Drawings),
            area_effects: Layer::new(LayerKind::AreaEffects),
            markers: Layer::new(LayerKind::Markers),
            monsters: Layer::new(LayerKind::Monsters),
            players: Layer::new(LayerKind::Players),
            interaction,
            turned: None,
            active_drag: None,
            outbox: None,
        }
    }

    /// Routes outgoing protocol messages to a transport.
    pub fn connect(&mut self, outbox: Outbox) {
        self.outbox = Some(outbox);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn textures(&self) -> &TextureCache {
        &self.context.textures
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn interaction(&self) -> &InteractionContext {
        &self.interaction
    }

    /// Pointer hit area of the whole map, `(0, 0, w, h)` after a draw
    pub fn hit_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.node.width, self.node.height)
    }

    pub fn players(&self) -> &TokensLayer {
        &self.players
    }

    pub fn monsters(&self) -> &TokensLayer {
        &self.monsters
    }

    pub fn auras(&self) -> &AurasLayer {
        &self.auras
    }

    /// Token currently being dragged by this client
    pub fn active_drag(&self) -> Option<&str> {
        self.active_drag.as_deref()
    }

    /// Reconciles every layer against `snapshot`. A snapshot without a map
    /// leaves the scene untouched. An invalid grid fails before any layer is
    /// modified.
    pub fn update(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        let Some(map) = snapshot.map.as_ref() else {
            log::debug!("snapshot has no map, nothing to update");
            return Ok(());
        };
        let grid = self.replace_grid(map.grid)?;

        self.background.update(map, &grid);
        self.grid_layer.update(&grid);
        for overlay in [&mut self.lights, &mut self.vision, &mut self.fog, &mut self.effects] {
            overlay.update(map, &snapshot.tokens, &grid);
        }

        let players = self.players.update(&snapshot.friendly_tokens(), &grid);
        let monsters = self.monsters.update(&snapshot.other_tokens(), &grid);
        self.interaction.started = snapshot.started;
        let ctx = self.interaction.clone();
        for id in players.added.iter().chain(&monsters.added) {
            if let Some(view) = self.token_by_id_mut(id) {
                view.update_interaction(&ctx);
            }
        }

        let mut released = players.released;
        released.extend(monsters.released);
        released.extend(self.bottom_tiles.update(&snapshot.tiles_in(MapLayer::Map), &grid).released);
        released.extend(self.middle_tiles.update(&snapshot.tiles_in(MapLayer::Object), &grid).released);
        released.extend(self.top_tiles.update(&snapshot.tiles_in(MapLayer::Token), &grid).released);
        released.extend(self.markers.update(&snapshot.markers, &grid).released);
        released.extend(self.drawings.update(&snapshot.drawings, &grid).released);
        released.extend(self.area_effects.update(&snapshot.area_effects, &grid).released);
        self.release_textures(&released);

        self.settle_active_drag();
        self.update_turned(snapshot.turned_id.as_deref());
        Ok(())
    }

    /// Ends the local drag when its token left the map or was put under
    /// outside control. No message is sent for a token that is controlled.
    fn settle_active_drag(&mut self) {
        let Some(id) = self.active_drag.clone() else {
            return;
        };
        let ended = match self.token_by_id_mut(&id) {
            None => {
                log::debug!("dragged token {} left the map", id);
                true
            }
            Some(view) if view.is_controlled() => {
                log::debug!("dragged token {} was taken over", id);
                view.abort();
                true
            }
            Some(_) => false,
        };
        if ended {
            self.active_drag = None;
        }
    }

    fn replace_grid(&mut self, spec: GridSpec) -> Result<Grid> {
        if let Some(grid) = self.grid.filter(|grid| grid.spec() == spec) {
            return Ok(grid);
        }
        let grid = Grid::from_spec(spec)?;
        log::info!("grid replaced: {:?} with {}px cells", spec.kind, spec.size);
        self.grid = Some(grid);
        Ok(grid)
    }

    fn release_textures(&self, keys: &[String]) {
        for key in keys {
            self.context.textures.release(key);
        }
    }

    /// Moves the turn to `id`. At most one token is turned at a time.
    pub fn update_turned(&mut self, id: Option<&str>) {
        self.interaction.turn_holder = id.map(str::to_string);
        let ctx = self.interaction.clone();

        if let Some(previous) = self.turned.take() {
            if let Some(view) = self.token_by_id_mut(&previous) {
                view.set_turned(false);
                view.update_interaction(&ctx);
            }
        }
        if let Some(id) = id {
            if let Some(view) = self.token_by_id_mut(id) {
                view.set_turned(true);
                view.update_interaction(&ctx);
                self.turned = Some(id.to_string());
            }
        }
    }

    /// Changes the global interaction mode. Takes effect on the next
    /// `update_interaction`.
    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.interaction.mode = mode;
    }

    /// Re-applies the interaction context to every token.
    pub fn update_interaction(&mut self) {
        let ctx = self.interaction.clone();
        for view in self.players.views_mut().chain(self.monsters.views_mut()) {
            view.update_interaction(&ctx);
        }
    }

    /// Labels every other token with its grid distance from `origin`, or
    /// clears the labels.
    pub fn update_distances(&mut self, origin: Option<&str>) {
        let Some(grid) = self.grid else {
            return;
        };
        let from = origin
            .and_then(|id| self.token_by_id(id))
            .map(|view| view.cell());

        for view in self.players.views_mut().chain(self.monsters.views_mut()) {
            let label = match from {
                Some(cell) if Some(view.id()) != origin => {
                    Some(format!("{} ft", grid.distance_in_units(cell, view.cell())))
                }
                _ => None,
            };
            view.set_distance(label);
        }
    }

    /// Rebuilds dirty visuals, background first so its size can be shared.
    pub async fn draw(&mut self) -> DrawStats {
        let started = Instant::now();
        let Some(grid) = self.grid else {
            log::debug!("no map yet, nothing to draw");
            return DrawStats::default();
        };

        let mut drawn = self.background.draw(&self.context).await;
        let size = self.background.size();
        self.propagate_size(size.width, size.height);

        for kind in LayerKind::DRAW_SEQUENCE {
            drawn += self.draw_layer(kind, &grid).await;
        }

        let stats = DrawStats {
            views_drawn: drawn,
            elapsed: started.elapsed(),
        };
        log::debug!("drew {} views in {:?}", stats.views_drawn, stats.elapsed);
        stats
    }

    fn propagate_size(&mut self, width: f64, height: f64) {
        self.node.set_size(width, height);
        self.grid_layer.set_size(width, height);
        for overlay in [&mut self.lights, &mut self.vision, &mut self.fog, &mut self.effects] {
            overlay.set_size(width, height);
        }
        for node in [
            self.bottom_tiles.node_mut(),
            self.middle_tiles.node_mut(),
            self.top_tiles.node_mut(),
            self.auras.node_mut(),
            self.drawings.node_mut(),
            self.area_effects.node_mut(),
            self.markers.node_mut(),
            self.monsters.node_mut(),
            self.players.node_mut(),
        ] {
            node.set_size(width, height);
        }
    }

    async fn draw_layer(&mut self, kind: LayerKind, grid: &Grid) -> usize {
        match kind {
            LayerKind::Background => 0,
            LayerKind::Grid => self.grid_layer.draw(),
            LayerKind::Lights => self.lights.draw(),
            LayerKind::Vision => self.vision.draw(),
            LayerKind::Fog => self.fog.draw(),
            LayerKind::Effects => self.effects.draw(),
            LayerKind::Monsters => self.monsters.draw(&self.context).await,
            LayerKind::Players => self.players.draw(&self.context).await,
            LayerKind::Auras => {
                self.rebuild_auras(grid);
                self.auras.draw(&self.context).await
            }
            LayerKind::BottomTiles => self.bottom_tiles.draw(&self.context).await,
            LayerKind::MiddleTiles => self.middle_tiles.draw(&self.context).await,
            LayerKind::TopTiles => self.top_tiles.draw(&self.context).await,
            LayerKind::AreaEffects => self.area_effects.draw(&self.context).await,
            LayerKind::Markers => self.markers.draw(&self.context).await,
            LayerKind::Drawings => self.drawings.draw(&self.context).await,
        }
    }

    fn rebuild_auras(&mut self, grid: &Grid) {
        let sources: Vec<AuraSource> = self
            .players
            .views()
            .iter()
            .chain(self.monsters.views())
            .flat_map(AuraSource::from_token)
            .collect();
        let result = self.auras.update(&sources, grid);
        self.release_textures(&result.released);
    }

    /// Flattens the drawn scene bottom to top.
    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new(self.node.width, self.node.height);
        for kind in LayerKind::STACK {
            match kind {
                LayerKind::Background => {
                    list.push_node(kind, None, self.background.node(), Point::default(), 1.0)
                }
                LayerKind::Grid => list.push_node(kind, None, self.grid_layer.node(), Point::default(), 1.0),
                LayerKind::Lights => list.push_node(kind, None, self.lights.node(), Point::default(), 1.0),
                LayerKind::Vision => list.push_node(kind, None, self.vision.node(), Point::default(), 1.0),
                LayerKind::Fog => list.push_node(kind, None, self.fog.node(), Point::default(), 1.0),
                LayerKind::Effects => list.push_node(kind, None, self.effects.node(), Point::default(), 1.0),
                LayerKind::BottomTiles => list.push_layer(&self.bottom_tiles),
                LayerKind::MiddleTiles => list.push_layer(&self.middle_tiles),
                LayerKind::TopTiles => list.push_layer(&self.top_tiles),
                LayerKind::Auras => self.push_auras(&mut list),
                LayerKind::Drawings => list.push_layer(&self.drawings),
                LayerKind::AreaEffects => list.push_layer(&self.area_effects),
                LayerKind::Markers => list.push_layer(&self.markers),
                LayerKind::Monsters => list.push_layer(&self.monsters),
                LayerKind::Players => list.push_layer(&self.players),
            }
        }
        list
    }

    /// Auras are placed at their token's current anchor, so they follow a
    /// drag that has not been confirmed by a snapshot yet.
    fn push_auras(&self, list: &mut DisplayList) {
        let layer = self.auras.node();
        if !layer.visible {
            return;
        }
        for view in self.auras.ordered_views() {
            if let Some(token) = self.token_by_id(view.token_id()).filter(|t| t.node().visible) {
                let origin = layer.position.add(&token.aura_anchor());
                list.push_view(LayerKind::Auras, view, origin, layer.alpha);
            }
        }
    }

    pub fn token_by_id(&self, id: &str) -> Option<&TokenView> {
        self.players.get(id).or_else(|| self.monsters.get(id))
    }

    pub fn token_by_id_mut(&mut self, id: &str) -> Option<&mut TokenView> {
        match self.players.get_mut(id) {
            Some(view) => Some(view),
            None => self.monsters.get_mut(id),
        }
    }

    /// Searches the top, middle and bottom tile bands in that order.
    pub fn tile_view_by_id(&self, id: &str) -> Option<&TileView> {
        self.top_tiles
            .get(id)
            .or_else(|| self.middle_tiles.get(id))
            .or_else(|| self.bottom_tiles.get(id))
    }

    pub fn marker_view_by_id(&self, id: &str) -> Option<&MarkerView> {
        self.markers.get(id)
    }

    pub fn area_effect_view_by_id(&self, id: &str) -> Option<&AreaEffectView> {
        self.area_effects.get(id)
    }

    pub fn drawing_view_by_id(&self, id: &str) -> Option<&DrawingView> {
        self.drawings.get(id)
    }

    /// Any view with this id, tokens first
    pub fn find_view(&self, id: &str) -> Option<ViewRef<'_>> {
        if let Some(view) = self.token_by_id(id) {
            return Some(ViewRef::Token(view));
        }
        if let Some(view) = self.tile_view_by_id(id) {
            return Some(ViewRef::Tile(view));
        }
        if let Some(view) = self.marker_view_by_id(id) {
            return Some(ViewRef::Marker(view));
        }
        if let Some(view) = self.area_effect_view_by_id(id) {
            return Some(ViewRef::AreaEffect(view));
        }
        if let Some(view) = self.drawing_view_by_id(id) {
            return Some(ViewRef::Drawing(view));
        }
        self.auras.get(id).map(ViewRef::Aura)
    }

    /// Topmost visible, interactive token under `point`
    fn interactive_token_at(&self, point: Point) -> Option<String> {
        [&self.players, &self.monsters].into_iter().find_map(|layer| {
            layer
                .ordered_views()
                .into_iter()
                .rev()
                .find(|view| view.is_interactive() && view.node().visible && view.contains(point))
                .map(|view| view.id().to_string())
        })
    }

    fn emit(&self, moved: TokenMoved) -> ProtocolMessage {
        let message = ProtocolMessage::from(moved);
        if let Some(outbox) = &self.outbox {
            outbox.send(message.clone());
        }
        message
    }

    /// Feeds one pointer event through the token under it, or the token
    /// being dragged.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<ProtocolMessage> {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } | PointerEvent::UpOutside { position } => {
                self.pointer_up(position)
            }
        }
    }

    pub fn pointer_down(&mut self, point: Point) -> Option<ProtocolMessage> {
        if self.active_drag.is_some() {
            return None;
        }
        let id = self.interactive_token_at(point)?;
        let moved = self.token_by_id_mut(&id)?.on_pointer_down(point)?;
        self.active_drag = Some(id);
        Some(self.emit(moved))
    }

    pub fn pointer_move(&mut self, point: Point) -> Option<ProtocolMessage> {
        let id = self.active_drag.clone()?;
        let Some(view) = self.token_by_id_mut(&id) else {
            self.active_drag = None;
            return None;
        };
        let moved = view.on_pointer_move(point)?;
        Some(self.emit(moved))
    }

    pub fn pointer_up(&mut self, point: Point) -> Option<ProtocolMessage> {
        let id = self.active_drag.clone()?;
        let Some(view) = self.token_by_id_mut(&id) else {
            self.active_drag = None;
            return None;
        };
        let event = if view.contains(point) {
            PointerEvent::Up { position: point }
        } else {
            PointerEvent::UpOutside { position: point }
        };
        let moved = view.handle(event);
        let still_dragging = view.is_dragging();
        if !still_dragging {
            self.active_drag = None;
        }
        moved.map(|moved| self.emit(moved))
    }

    /// Abandons the local drag, if any, and announces it.
    pub fn cancel_drag(&mut self) -> Option<ProtocolMessage> {
        let id = self.active_drag.take()?;
        let moved = self.token_by_id_mut(&id)?.cancel()?;
        Some(self.emit(moved))
    }

    /// Applies a movement message from the server or another client.
    pub fn apply_remote(&mut self, message: &ProtocolMessage) {
        match message {
            ProtocolMessage::TokenMoved(moved) => self.apply_token_moved(moved),
        }
    }

    fn apply_token_moved(&mut self, moved: &TokenMoved) {
        let local = self.active_drag.as_deref() == Some(moved.id.as_str());
        let Some(view) = self.token_by_id_mut(&moved.id) else {
            log::debug!("{:?} for unknown token {}", moved.state, moved.id);
            return;
        };

        match moved.state {
            ControlState::Start if !local => view.set_controlled(true),
            ControlState::Control if !local => view.follow(moved.position()),
            ControlState::End if !local => view.set_controlled(false),
            ControlState::Start | ControlState::Control | ControlState::End => {}
            ControlState::Blocked if local => view.set_blocked(true),
            ControlState::Blocked => log::debug!("late block for idle token {}", moved.id),
            ControlState::Cancel => {
                view.abort();
                view.set_controlled(false);
                if local {
                    self.active_drag = None;
                }
            }
        }
    }
}

impl std::fmt::Debug for MapContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapContainer")
            .field("grid", &self.grid)
            .field("players", &self.players.len())
            .field("monsters", &self.monsters.len())
            .field("turned", &self.turned)
            .field("active_drag", &self.active_drag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridKind;
    use crate::data::entities::{Role, Token};
    use crate::data::snapshot::MapInfo;
    use crate::textures::MemoryFetcher;
    use std::sync::Arc;

    fn container() -> MapContainer {
        let config = EngineConfig::default();
        let textures = TextureCache::with_fetcher(&config, Arc::new(MemoryFetcher::new()));
        MapContainer::with_textures(config, textures)
    }

    fn snapshot(tokens: Vec<Token>) -> WorldSnapshot {
        WorldSnapshot {
            map: Some(MapInfo {
                id: "arena".to_string(),
                width: Some(700.0),
                height: Some(700.0),
                ..MapInfo::default()
            }),
            tokens,
            ..WorldSnapshot::default()
        }
    }

    #[test]
    fn test_snapshot_without_map_is_ignored() {
        let mut map = container();
        map.update(&WorldSnapshot::default()).unwrap();
        assert!(map.grid().is_none());
        assert!(map.players().is_empty());
    }

    #[test]
    fn test_invalid_grid_fails_fast() {
        let mut map = container();
        let mut bad = snapshot(vec![Token::new("a", Role::Friendly, 35.0, 35.0)]);
        if let Some(info) = bad.map.as_mut() {
            info.grid.size = 0.0;
        }
        assert!(map.update(&bad).is_err());
        assert!(map.players().is_empty());
    }

    #[test]
    fn test_tokens_split_by_role() {
        let mut map = container();
        map.update(&snapshot(vec![
            Token::new("a", Role::Friendly, 35.0, 35.0),
            Token::new("b", Role::Hostile, 105.0, 35.0),
            Token::new("c", Role::Neutral, 175.0, 35.0),
        ]))
        .unwrap();

        assert_eq!(map.players().ids(), vec!["a"]);
        assert_eq!(map.monsters().ids(), vec!["b", "c"]);
        assert!(matches!(map.find_view("b"), Some(ViewRef::Token(_))));
        assert!(map.find_view("zzz").is_none());
    }

    #[test]
    fn test_grid_change_replaces_grid() {
        let mut map = container();
        map.update(&snapshot(vec![])).unwrap();
        assert_eq!(map.grid().map(|g| g.kind()), Some(GridKind::Square));

        let mut hex = snapshot(vec![]);
        if let Some(info) = hex.map.as_mut() {
            info.grid.kind = GridKind::Hex;
        }
        map.update(&hex).unwrap();
        assert_eq!(map.grid().map(|g| g.kind()), Some(GridKind::Hex));
    }

    #[test]
    fn test_distances() {
        let mut map = container();
        map.update(&snapshot(vec![
            Token::new("a", Role::Friendly, 35.0, 35.0),
            Token::new("b", Role::Hostile, 245.0, 105.0),
        ]))
        .unwrap();

        map.update_distances(Some("a"));
        assert_eq!(map.token_by_id("b").and_then(|v| v.distance()), Some("15 ft"));
        assert_eq!(map.token_by_id("a").and_then(|v| v.distance()), None);

        map.update_distances(None);
        assert_eq!(map.token_by_id("b").and_then(|v| v.distance()), None);
    }

    #[test]
    fn test_new_tokens_follow_interaction_mode() {
        let config = EngineConfig {
            interaction: InteractionMode::None,
            ..EngineConfig::default()
        };
        let textures = TextureCache::with_fetcher(&config, Arc::new(MemoryFetcher::new()));
        let mut map = MapContainer::with_textures(config, textures);
        map.update(&snapshot(vec![Token::new("a", Role::Friendly, 35.0, 35.0)])).unwrap();

        assert_eq!(map.token_by_id("a").map(|v| v.is_interactive()), Some(false));
        assert!(map.pointer_down(Point::new(35.0, 35.0)).is_none());
    }

    #[test]
    fn test_late_token_respects_turn_only() {
        let mut map = container();
        let mut world = snapshot(vec![Token::new("a", Role::Friendly, 35.0, 35.0)]);
        world.started = true;
        world.turned_id = Some("a".to_string());
        map.update(&world).unwrap();
        map.set_interaction_mode(InteractionMode::TurnOnly);
        map.update_interaction();

        world.tokens.push(Token::new("b", Role::Friendly, 105.0, 35.0));
        map.update(&world).unwrap();
        assert_eq!(map.token_by_id("a").map(|v| v.is_interactive()), Some(true));
        assert_eq!(map.token_by_id("b").map(|v| v.is_interactive()), Some(false));
        assert!(map.pointer_down(Point::new(105.0, 35.0)).is_none());
    }

    #[test]
    fn test_takeover_ends_local_drag() {
        let mut map = container();
        let hero = Token::new("a", Role::Friendly, 35.0, 35.0);
        let ally = Token::new("b", Role::Friendly, 175.0, 35.0);
        map.update(&snapshot(vec![hero.clone(), ally.clone()])).unwrap();
        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(105.0, 35.0)).unwrap();

        let mut seized = hero.clone();
        seized.controlled = true;
        map.update(&snapshot(vec![seized, ally.clone()])).unwrap();
        assert_eq!(map.active_drag(), None);
        assert!(!map.token_by_id("a").unwrap().is_dragging());
        assert!(map.pointer_down(Point::new(175.0, 35.0)).is_some());
        map.pointer_up(Point::new(175.0, 35.0)).unwrap();

        // released again, hovering alone does not resume anything
        map.update(&snapshot(vec![hero, ally])).unwrap();
        assert!(map.pointer_move(Point::new(105.0, 35.0)).is_none());
    }

    #[test]
    fn test_cancel_drag() {
        let mut map = container();
        map.update(&snapshot(vec![Token::new("a", Role::Friendly, 35.0, 35.0)])).unwrap();
        assert!(map.cancel_drag().is_none());

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(300.0, 300.0)).unwrap();
        let ProtocolMessage::TokenMoved(moved) = map.cancel_drag().unwrap();
        assert_eq!(moved.state, ControlState::Cancel);
        assert_eq!(map.active_drag(), None);
        assert_eq!(map.token_by_id("a").map(|v| v.center()), Some(Point::new(35.0, 35.0)));
    }
}
