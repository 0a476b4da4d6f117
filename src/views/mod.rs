//! Per-entity views
//!
//! A view owns the visuals for exactly one entity. `update` copies the entity
//! in and recomputes geometry synchronously; `draw` rebuilds the visuals and
//! may wait on textures.

pub mod area_effect;
pub mod aura;
pub mod drawing;
pub mod marker;
pub mod node;
pub mod tile;
pub mod token;

use std::fmt;

use async_trait::async_trait;

use crate::core::geo::{Point, Rect};
use crate::core::grid::Grid;
use crate::data::entities::Entity;
use crate::rendering::context::RenderContext;

pub use area_effect::AreaEffectView;
pub use aura::{AuraSource, AuraView};
pub use drawing::DrawingView;
pub use marker::MarkerView;
pub use node::{Child, ViewNode};
pub use tile::TileView;
pub use token::{DragState, TokenView};

/// Closed set of view variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Token,
    Tile,
    Marker,
    AreaEffect,
    Aura,
    Drawing,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Token => write!(f, "token"),
            ViewKind::Tile => write!(f, "tile"),
            ViewKind::Marker => write!(f, "marker"),
            ViewKind::AreaEffect => write!(f, "area-effect"),
            ViewKind::Aura => write!(f, "aura"),
            ViewKind::Drawing => write!(f, "drawing"),
        }
    }
}

#[async_trait]
pub trait EntityView: Send {
    type Entity: Entity + Clone + PartialEq + Send + Sync;

    const KIND: ViewKind;

    fn create(entity: &Self::Entity, grid: &Grid) -> Self
    where
        Self: Sized;

    /// The entity as of the last update
    fn entity(&self) -> &Self::Entity;

    fn id(&self) -> &str {
        self.entity().id()
    }

    /// Copies the entity in and recomputes position, size and z. Marks the
    /// view dirty.
    fn update(&mut self, entity: &Self::Entity, grid: &Grid);

    /// Rebuilds the view's visuals. A texture that fails to load is skipped.
    async fn draw(&mut self, ctx: &RenderContext);

    fn node(&self) -> &ViewNode;

    fn node_mut(&mut self) -> &mut ViewNode;

    /// Cache keys of the textures this view currently displays
    fn texture_keys(&self) -> Vec<String> {
        self.node().texture_keys()
    }
}

/// A view found by id, whatever layer it lives in
#[derive(Debug, Clone, Copy)]
pub enum ViewRef<'a> {
    Token(&'a TokenView),
    Tile(&'a TileView),
    Marker(&'a MarkerView),
    AreaEffect(&'a AreaEffectView),
    Aura(&'a AuraView),
    Drawing(&'a DrawingView),
}

impl<'a> ViewRef<'a> {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewRef::Token(_) => ViewKind::Token,
            ViewRef::Tile(_) => ViewKind::Tile,
            ViewRef::Marker(_) => ViewKind::Marker,
            ViewRef::AreaEffect(_) => ViewKind::AreaEffect,
            ViewRef::Aura(_) => ViewKind::Aura,
            ViewRef::Drawing(_) => ViewKind::Drawing,
        }
    }

    pub fn node(&self) -> &'a ViewNode {
        match *self {
            ViewRef::Token(view) => view.node(),
            ViewRef::Tile(view) => view.node(),
            ViewRef::Marker(view) => view.node(),
            ViewRef::AreaEffect(view) => view.node(),
            ViewRef::Aura(view) => view.node(),
            ViewRef::Drawing(view) => view.node(),
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            ViewRef::Token(view) => view.id(),
            ViewRef::Tile(view) => view.id(),
            ViewRef::Marker(view) => view.id(),
            ViewRef::AreaEffect(view) => view.id(),
            ViewRef::Aura(view) => view.id(),
            ViewRef::Drawing(view) => view.id(),
        }
    }
}

/// Clamp that tolerates `max < min` instead of panicking like `f64::clamp`.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value <= min {
        min
    } else if value >= max {
        max
    } else {
        value
    }
}

/// Scale that fits a `width` x `height` sprite inside the target box while
/// keeping its aspect ratio.
pub(crate) fn fit_scale(width: f64, height: f64, target_width: f64, target_height: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (target_width / width).min(target_height / height)
}

/// Smallest rectangle holding every point
pub(crate) fn bounding_box(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for point in points {
        min = Point::new(min.x.min(point.x), min.y.min(point.y));
        max = Point::new(max.x.max(point.x), max.y.max(point.y));
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}
