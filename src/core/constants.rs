//! Engine-wide constants: z bands, role colors and grid conventions.

/// Hex rows are staggered, so an entity footprint packs to this fraction of
/// the square footprint along the vertical axis.
pub const HEX_PACKING_FACTOR: f64 = 0.8;

/// Grid units (feet) covered by one cell when a map does not say otherwise.
pub const DEFAULT_UNITS_PER_CELL: f64 = 5.0;

/// Token z bands inside a token layer.
pub const FRIENDLY_TOKEN_Z: i32 = 50;
pub const OTHER_TOKEN_Z: i32 = 30;
pub const DEAD_TOKEN_Z: i32 = 29;

/// Label disc colors.
pub const TURNED_COLOR: u32 = 0xff9500;
pub const DEAD_COLOR: u32 = 0x555555;
pub const HOSTILE_COLOR: u32 = 0x631515;
pub const FRIENDLY_COLOR: u32 = 0x3F51B5;
pub const NEUTRAL_COLOR: u32 = 0x964B00;

/// Sprite tints.
pub const CONTROLLED_TINT: u32 = 0xFFCCCC;
pub const NORMAL_TINT: u32 = 0xFFFFFF;

/// Alpha applied to friendly tokens the players should see as hidden.
pub const HIDDEN_FRIENDLY_ALPHA: f32 = 0.5;

pub const GRID_LINE_COLOR: u32 = 0x000000;
pub const GRID_LINE_ALPHA: f32 = 0.25;
pub const AURA_DEFAULT_COLOR: u32 = 0x3F51B5;
pub const AURA_DEFAULT_OPACITY: f32 = 0.2;
pub const FOG_COLOR: u32 = 0x111111;
pub const FOG_ALPHA: f32 = 0.6;
pub const MARKER_DEFAULT_COLOR: u32 = 0xE53935;
pub const AREA_DEFAULT_COLOR: u32 = 0xFF5722;
pub const AREA_DEFAULT_OPACITY: f32 = 0.3;
pub const DRAWING_DEFAULT_COLOR: u32 = 0x000000;

/// Map edge in cells when neither the map nor its background gives a size.
pub const DEFAULT_MAP_CELLS: f64 = 30.0;
