//! Token view
//!
//! Besides drawing the token art and its badges, a token view runs the local
//! drag state machine:
//!
//! ```text
//! Idle --down (interactive, not controlled, inside)--> Dragging   emits start
//! Dragging --move--> Dragging                                   emits control
//! Dragging --up / up outside--> Idle                            emits end
//! ```
//!
//! While the token is controlled by someone else every pointer event is a
//! no-op. A blocked token keeps emitting `control` with the raw pointer but
//! its visual stays where it is.

use async_trait::async_trait;

use super::{clamp, fit_scale, EntityView, ViewKind, ViewNode};
use crate::core::constants::{
    CONTROLLED_TINT, DEAD_COLOR, DEAD_TOKEN_Z, FRIENDLY_COLOR, FRIENDLY_TOKEN_Z,
    HIDDEN_FRIENDLY_ALPHA, HOSTILE_COLOR, NEUTRAL_COLOR, NORMAL_TINT, OTHER_TOKEN_Z,
    TURNED_COLOR,
};
use crate::core::geo::{Point, Rect};
use crate::core::grid::{Cell, Grid};
use crate::data::entities::{Role, Token};
use crate::input::events::{InteractionContext, InteractionMode, PointerEvent};
use crate::input::messages::{ControlState, TokenMoved};
use crate::rendering::context::RenderContext;
use crate::rendering::visual::{Fill, Stroke, Visual};
use crate::textures::TextureHandle;

const BADGE_STROKE: Stroke = Stroke {
    width: 2.0,
    color: 0x000000,
    alpha: 0.2,
};
const ELEVATION_FILL: Fill = Fill {
    color: 0x333333,
    alpha: 0.9,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug)]
pub struct TokenView {
    token: Token,
    grid: Grid,
    node: ViewNode,
    drag: DragState,
    controlled: bool,
    blocked: bool,
    turned: bool,
    interactive: bool,
    distance: Option<String>,
    aura_anchor: Point,
    /// Index of the token art among the node's children
    sprite: Option<usize>,
}

/// Draw order key of a token: friendly above everyone, the dead below the
/// living.
pub fn token_z_index(token: &Token) -> i32 {
    if token.dead {
        DEAD_TOKEN_Z
    } else if token.is_friendly() {
        FRIENDLY_TOKEN_Z
    } else {
        OTHER_TOKEN_Z
    }
}

impl TokenView {
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_turned(&self) -> bool {
        self.turned
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn distance(&self) -> Option<&str> {
        self.distance.as_deref()
    }

    /// Current visual center, which leads the snapshot while dragging
    pub fn center(&self) -> Point {
        self.node.center()
    }

    /// Cell under the visual center
    pub fn cell(&self) -> Cell {
        self.grid.pixel_to_cell(self.center())
    }

    /// Where this token's auras are centered
    pub fn aura_anchor(&self) -> Point {
        self.aura_anchor
    }

    pub fn contains(&self, point: Point) -> bool {
        self.node.contains(point)
    }

    /// Role and status color used for the label badge
    pub fn color(&self) -> u32 {
        if self.turned {
            TURNED_COLOR
        } else if self.token.dead {
            DEAD_COLOR
        } else {
            match self.token.role {
                Role::Hostile => HOSTILE_COLOR,
                Role::Friendly => FRIENDLY_COLOR,
                Role::Neutral => NEUTRAL_COLOR,
            }
        }
    }

    pub fn scale_factor(&self) -> f64 {
        let asset_scale = self.token.asset.as_ref().map(|a| a.scale).unwrap_or(1.0);
        self.token.scale * asset_scale
    }

    fn tint(&self) -> u32 {
        if self.controlled {
            CONTROLLED_TINT
        } else {
            NORMAL_TINT
        }
    }

    pub fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
        self.update_tint();
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn set_turned(&mut self, turned: bool) {
        if self.turned != turned {
            self.turned = turned;
            self.node.mark_dirty();
        }
    }

    pub fn set_distance(&mut self, distance: Option<String>) {
        if self.distance != distance {
            self.distance = distance;
            self.node.mark_dirty();
        }
    }

    /// Recomputes whether this token accepts pointer focus.
    pub fn update_interaction(&mut self, ctx: &InteractionContext) {
        let friendly = self.token.is_friendly();
        self.interactive = match ctx.mode {
            InteractionMode::All => friendly,
            InteractionMode::TurnOnly => {
                friendly && (ctx.holds_turn(&self.token.id) || !ctx.started)
            }
            InteractionMode::None => false,
        };
    }

    fn update_tint(&mut self) {
        let tint = self.tint();
        if let Some(child) = self.sprite.and_then(|index| self.node.child_mut(index)) {
            if let Visual::Sprite { tint: current, .. } = &mut child.visual {
                *current = tint;
            }
        }
    }

    fn move_to(&mut self, center: Point) {
        self.node.set_center(center);
        self.aura_anchor = center;
    }

    fn message(&self, position: Point, state: ControlState) -> TokenMoved {
        TokenMoved::new(self.token.id.clone(), position, state)
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<TokenMoved> {
        match event {
            PointerEvent::Down { position } => self.on_pointer_down(position),
            PointerEvent::Move { position } => self.on_pointer_move(position),
            PointerEvent::Up { .. } => self.on_pointer_up(),
            PointerEvent::UpOutside { .. } => self.on_pointer_up_outside(),
        }
    }

    pub fn on_pointer_down(&mut self, pointer: Point) -> Option<TokenMoved> {
        if self.controlled || !self.interactive || self.is_dragging() || !self.contains(pointer) {
            return None;
        }
        self.drag = DragState::Dragging;
        self.blocked = false;
        log::debug!("drag start on {}", self.token.id);
        Some(self.message(self.center(), ControlState::Start))
    }

    pub fn on_pointer_move(&mut self, pointer: Point) -> Option<TokenMoved> {
        if self.controlled || !self.is_dragging() {
            return None;
        }
        if !self.blocked {
            self.move_to(pointer);
        }
        Some(self.message(pointer, ControlState::Control))
    }

    pub fn on_pointer_up(&mut self) -> Option<TokenMoved> {
        if self.controlled || !self.is_dragging() {
            return None;
        }
        self.drag = DragState::Idle;
        self.blocked = false;
        log::debug!("drag end on {}", self.token.id);
        Some(self.message(self.center(), ControlState::End))
    }

    pub fn on_pointer_up_outside(&mut self) -> Option<TokenMoved> {
        self.on_pointer_up()
    }

    /// Aborts a local drag and announces it. Idle tokens emit nothing.
    pub fn cancel(&mut self) -> Option<TokenMoved> {
        if !self.is_dragging() {
            return None;
        }
        self.abort();
        Some(self.message(self.center(), ControlState::Cancel))
    }

    /// Drops any drag in progress and snaps back to the snapshot position.
    pub fn abort(&mut self) {
        self.drag = DragState::Idle;
        self.blocked = false;
        self.move_to(self.token.center());
    }

    /// Mirrors a position reported for a token someone else is moving.
    pub fn follow(&mut self, center: Point) {
        if !self.is_dragging() {
            self.move_to(center);
        }
    }

    fn layout(&mut self) {
        let size = self.grid.size_from_grid_size(self.token.grid_size());
        self.node.set_size(size.width, size.height);
        self.node.z_index = token_z_index(&self.token);

        if !self.is_dragging() {
            self.move_to(self.token.center());
        }

        if self.token.is_friendly() {
            self.node.visible = true;
            self.node.alpha = if self.token.hidden {
                HIDDEN_FRIENDLY_ALPHA
            } else {
                1.0
            };
        } else {
            self.node.visible = !self.token.hidden;
            self.node.alpha = 1.0;
        }
    }

    fn add_token_sprite(&mut self, texture: TextureHandle) {
        let (w, h) = (self.node.width, self.node.height);
        let (tw, th) = (texture.width() as f64, texture.height() as f64);
        let scale = fit_scale(tw, th, w, h) * self.scale_factor();
        let (offset_x, offset_y) = self
            .token
            .asset
            .as_ref()
            .map(|a| (a.offset_x, a.offset_y))
            .unwrap_or((0.0, 0.0));
        let z = if self.token.bloodied && !self.token.dead && self.has_art() {
            1
        } else {
            0
        };

        let index = self.node.add_child(
            Visual::Sprite {
                texture,
                position: Point::new(w / 2.0, h / 2.0),
                anchor: Point::new(0.5 + offset_x / 100.0, 0.5 + offset_y / 100.0),
                width: tw * scale,
                height: th * scale,
                rotation: self.token.rotation.to_radians(),
                tint: self.tint(),
            },
            z,
        );
        if self.token.dead {
            if let Some(child) = self.node.child_mut(index) {
                child.visible = false;
            }
        }
        self.sprite = Some(index);
    }

    /// Whether the token carries its own art, as opposed to a plain badge
    fn has_art(&self) -> bool {
        self.token.asset.is_some() || self.token.cached_image.is_some()
    }

    async fn add_overlay(&mut self, ctx: &RenderContext) {
        let (path, z) = if self.token.dead {
            (&ctx.assets.corpse, 1)
        } else if self.token.bloodied {
            if self.has_art() {
                (&ctx.assets.bloodied, 0)
            } else {
                (&ctx.assets.token_bloodied, 1)
            }
        } else {
            return;
        };

        let Some(texture) = ctx.textures.load_bundled(path).await else {
            return;
        };
        let (w, h) = (self.node.width, self.node.height);
        let size = w.min(h) * self.scale_factor();
        self.node.add_child(
            Visual::Sprite {
                texture,
                position: Point::new(w / 2.0, h / 2.0),
                anchor: Point::new(0.5, 0.5),
                width: size.min(w),
                height: size.min(h),
                rotation: 0.0,
                tint: NORMAL_TINT,
            },
            z,
        );
    }

    fn add_elevation(&mut self, has_texture: bool) {
        let elevation = self.token.elevation;
        if elevation == 0 {
            return;
        }
        let (w, h) = (self.node.width, self.node.height);
        let size = w.min(h) * clamp(self.scale_factor(), 0.1, 1.0);
        let label_size = self.grid.adjusted_size().width * 0.4;
        let diagonal = (size / 2.0) * std::f64::consts::FRAC_1_SQRT_2;
        let square = self.token.grid_size().is_square();
        let beside_label = self.token.label.is_some() && has_texture;

        let (width_factor, text_offset, x) = if beside_label {
            let x = w / 2.0 - 2.0 - label_size * 0.7 - label_size + diagonal;
            (2.0, 0.7, x)
        } else {
            let x = w / 2.0 - 2.0 - label_size * 0.8 + diagonal;
            (1.3, 0.6, x)
        };
        let (x, y) = if square {
            (x, h / 2.0 - 2.0 - label_size / 2.0 + diagonal)
        } else {
            (w, h)
        };
        let max_x = if beside_label {
            w - label_size * 2.2
        } else {
            w - label_size * 1.3
        };
        let x = clamp(x, 0.0, max_x);
        let y = clamp(y, 0.0, h - label_size);

        let (box_z, text_z) = if has_texture { (3, 4) } else { (10, 11) };
        let arrow = if elevation > 0 { '↑' } else { '↓' };

        self.node.add_child(
            Visual::Rect {
                rect: Rect::new(x, y, label_size * width_factor, label_size),
                corner_radius: label_size / 2.0,
                fill: Some(ELEVATION_FILL),
                stroke: Some(BADGE_STROKE),
            },
            box_z,
        );
        self.node.add_child(
            Visual::Text {
                text: format!("{}{}", arrow, elevation.unsigned_abs()),
                position: Point::new(x + label_size * text_offset, y + label_size / 2.0),
                font_size: label_size / 2.5,
                color: 0xffffff,
            },
            text_z,
        );
    }

    /// Label text: the explicit label, else the name's initial.
    pub fn label_text(&self) -> String {
        if let Some(label) = &self.token.label {
            return label.clone();
        }
        self.token
            .name
            .as_deref()
            .unwrap_or("Unknown")
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    fn add_label(&mut self, has_texture: bool) {
        if self.token.label.is_none() && has_texture {
            return;
        }
        let (w, h) = (self.node.width, self.node.height);
        let (center, radius, font_size) = if has_texture {
            let size = w.min(h) * clamp(self.scale_factor(), 0.1, 1.0);
            let label_size = self.grid.adjusted_size().width * 0.4;
            let diagonal = (size / 2.0) * std::f64::consts::FRAC_1_SQRT_2;
            let (x, y) = if self.token.grid_size().is_square() {
                (w / 2.0 - 2.0 + diagonal, h / 2.0 - 2.0 + diagonal)
            } else {
                (w, h)
            };
            let x = clamp(x, 0.0, w - label_size / 2.0);
            let y = clamp(y, 0.0, h - label_size / 2.0);
            (Point::new(x, y), label_size / 2.0, label_size / 2.5)
        } else {
            let size = w.min(h) * self.scale_factor();
            (Point::new(w / 2.0, h / 2.0), size / 2.0, size / 2.5)
        };

        self.node.add_child(
            Visual::Circle {
                center,
                radius,
                fill: Some(Fill::new(self.color(), 1.0)),
                stroke: Some(BADGE_STROKE),
            },
            5,
        );
        self.node.add_child(
            Visual::Text {
                text: self.label_text(),
                position: center,
                font_size,
                color: 0xffffff,
            },
            6,
        );
    }

    fn add_distance(&mut self) {
        let Some(distance) = self.distance.clone().filter(|d| !d.is_empty()) else {
            return;
        };
        let size = self.grid.size();
        self.node.add_child(
            Visual::Text {
                text: distance,
                position: Point::new(self.node.width / 2.0, -size / 2.0),
                font_size: size / 4.0,
                color: 0xffffff,
            },
            10,
        );
    }
}

#[async_trait]
impl EntityView for TokenView {
    type Entity = Token;

    const KIND: ViewKind = ViewKind::Token;

    fn create(token: &Token, grid: &Grid) -> Self {
        let mut view = Self {
            token: token.clone(),
            grid: *grid,
            node: ViewNode::new(),
            drag: DragState::Idle,
            controlled: token.controlled,
            blocked: false,
            turned: false,
            interactive: token.is_friendly(),
            distance: None,
            aura_anchor: token.center(),
            sprite: None,
        };
        view.layout();
        view
    }

    fn entity(&self) -> &Token {
        &self.token
    }

    fn update(&mut self, token: &Token, grid: &Grid) {
        self.token = token.clone();
        self.grid = *grid;
        self.set_controlled(token.controlled);
        self.layout();
        self.node.mark_dirty();
    }

    async fn draw(&mut self, ctx: &RenderContext) {
        self.node.clear();
        self.sprite = None;
        self.layout();

        let texture = match self.token.image_resource() {
            Some(resource) => ctx.textures.load(resource).await,
            None => None,
        };
        let has_texture = texture.is_some();
        if let Some(texture) = texture {
            self.add_token_sprite(texture);
        }

        self.add_overlay(ctx).await;
        self.add_elevation(has_texture);
        self.add_label(has_texture);
        self.add_distance();
        self.node.mark_clean();
    }

    fn node(&self) -> &ViewNode {
        &self.node
    }

    fn node_mut(&mut self) -> &mut ViewNode {
        &mut self.node
    }
}
