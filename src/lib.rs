//! # battlemap
//!
//! A layered tabletop battle map engine.
//!
//! The engine turns world snapshots (tokens, tiles, markers, drawings and
//! area effects on a square or hex grid) into a retained scene graph,
//! reconciling it incrementally on every update. Textures are loaded
//! asynchronously through a deduplicating cache, and local token drags are
//! turned into position messages for the game server.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod textures;
pub mod views;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{EngineConfig, EngineProfile},
    geo::{Point, Rect, Size},
    grid::{Cell, Grid, GridKind, GridSpec},
    map::{DrawStats, MapContainer},
};

pub use crate::data::{
    entities::{AreaEffect, Drawing, Entity, Marker, Role, Tile, Token},
    snapshot::{MapInfo, WorldSnapshot},
};

pub use crate::input::{
    ControlState, InteractionContext, InteractionMode, Outbox, PointerEvent, ProtocolMessage,
    TokenMoved,
};

pub use crate::layers::{Layer, LayerKind, Reconciliation};

pub use crate::rendering::{DisplayList, DrawCommand, RenderContext, Visual};

pub use crate::textures::{AssetFetcher, TextureCache, TextureHandle};

pub use crate::views::{EntityView, TokenView, ViewKind, ViewRef};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
