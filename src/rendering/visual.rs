use crate::core::geo::{Point, Rect};
use crate::textures::TextureHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: u32,
    pub alpha: f32,
}

impl Fill {
    pub fn new(color: u32, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: u32,
    pub alpha: f32,
}

impl Stroke {
    pub fn new(width: f64, color: u32, alpha: f32) -> Self {
        Self { width, color, alpha }
    }
}

/// Drawing primitives a view is built from. Coordinates are local to the
/// owning view.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    Sprite {
        texture: TextureHandle,
        position: Point,
        /// Fraction of the sprite size the position refers to, (0.5, 0.5) is centered
        anchor: Point,
        width: f64,
        height: f64,
        /// Radians
        rotation: f64,
        tint: u32,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    Rect {
        rect: Rect,
        corner_radius: f64,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    Text {
        text: String,
        position: Point,
        font_size: f64,
        color: u32,
    },
    /// Ambient effect the backend animates over `rect`
    Effect { name: String, rect: Rect },
}

impl Visual {
    pub fn is_sprite(&self) -> bool {
        matches!(self, Visual::Sprite { .. })
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        match self {
            Visual::Sprite { texture, .. } => Some(texture),
            _ => None,
        }
    }
}
