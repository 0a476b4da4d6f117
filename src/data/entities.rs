//! Domain entities carried by a world snapshot
//!
//! These are owned by the caller and read-only to the engine; views copy what
//! they need on every update.

use serde::{Deserialize, Serialize};

use crate::core::geo::Point;
use crate::core::grid::{Cell, Grid, GridSize};

/// Anything with a stable, unique id that a view can be keyed by.
pub trait Entity {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Friendly,
    Hostile,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl SizeClass {
    pub fn to_grid_size(self) -> GridSize {
        let side = match self {
            SizeClass::Tiny => 0.5,
            SizeClass::Small | SizeClass::Medium => 1.0,
            SizeClass::Large => 2.0,
            SizeClass::Huge => 3.0,
            SizeClass::Gargantuan => 4.0,
        };
        GridSize::new(side, side)
    }
}

/// Height band an entity is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    Map,
    #[default]
    Object,
    Token,
}

impl MapLayer {
    /// Ordering key within a single layer
    pub fn rank(self) -> i32 {
        match self {
            MapLayer::Map => 0,
            MapLayer::Object => 1,
            MapLayer::Token => 2,
        }
    }
}

/// Reference to an image plus how to place it inside its owner's box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Asset {
    pub resource: Option<String>,
    pub scale: f64,
    /// Horizontal anchor shift, percent of the sprite width
    pub offset_x: f64,
    /// Vertical anchor shift, percent of the sprite height
    pub offset_y: f64,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            resource: None,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Asset {
    pub fn from_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Aura {
    /// Radius in grid units
    pub radius: f64,
    pub enabled: bool,
    pub color: Option<String>,
    pub opacity: Option<f32>,
}

impl Default for Aura {
    fn default() -> Self {
        Self {
            radius: 5.0,
            enabled: true,
            color: None,
            opacity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub name: Option<String>,
    /// Center of the token in world pixels
    pub x: f64,
    pub y: f64,
    pub role: Role,
    pub size: SizeClass,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Rotation in degrees
    pub rotation: f64,
    pub asset: Option<Asset>,
    /// Pre-rendered token image, preferred over the asset when present
    pub cached_image: Option<String>,
    pub dead: bool,
    pub bloodied: bool,
    pub hidden: bool,
    pub elevation: i32,
    pub label: Option<String>,
    pub auras: Vec<Aura>,
    /// Frozen by an external authority
    pub controlled: bool,
    /// Sight radius in grid units
    pub vision: Option<f64>,
}

fn unit_scale() -> f64 {
    1.0
}

impl Token {
    pub fn new(id: impl Into<String>, role: Role, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            role,
            x,
            y,
            scale: 1.0,
            ..Self::default()
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn cell(&self, grid: &Grid) -> Cell {
        grid.pixel_to_cell(self.center())
    }

    pub fn grid_size(&self) -> GridSize {
        self.size.to_grid_size()
    }

    /// The resource to show, cached image first
    pub fn image_resource(&self) -> Option<&str> {
        self.cached_image
            .as_deref()
            .or_else(|| self.asset.as_ref().and_then(|asset| asset.resource.as_deref()))
    }

    pub fn is_friendly(&self) -> bool {
        self.role == Role::Friendly
    }
}

impl Entity for Token {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tile {
    pub id: String,
    /// Top-left corner in world pixels
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub layer: MapLayer,
    pub hidden: bool,
    pub asset: Asset,
}

impl Entity for Tile {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
    pub color: Option<String>,
    pub icon: Option<Asset>,
    pub layer: MapLayer,
    pub hidden: bool,
}

impl Entity for Marker {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingShape {
    #[default]
    Line,
    Rectangle,
    Circle,
}

/// Free-hand annotation. `data` holds flat `x, y` pairs for lines, the two
/// corners for rectangles, and center plus a point on the rim for circles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Drawing {
    pub id: String,
    pub shape: DrawingShape,
    pub data: Vec<f64>,
    pub layer: MapLayer,
    pub stroke_width: f64,
    pub stroke_color: Option<String>,
    pub fill_color: Option<String>,
    pub opacity: Option<f32>,
}

impl Drawing {
    pub fn points(&self) -> Vec<Point> {
        self.data
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect()
    }
}

impl Entity for Drawing {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaShape {
    #[default]
    Circle,
    Cone,
    Cube,
    Line,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaEffect {
    pub id: String,
    pub shape: AreaShape,
    /// Origin in world pixels
    pub x: f64,
    pub y: f64,
    /// Radius / edge / length in grid units
    pub size: f64,
    /// Direction in degrees for cones and lines
    pub angle: f64,
    pub color: Option<String>,
    pub opacity: Option<f32>,
    pub layer: MapLayer,
}

impl Entity for AreaEffect {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parses `#rrggbb` / `rrggbb` into a packed color.
pub fn parse_color(value: &str) -> Option<u32> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
