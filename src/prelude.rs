//! Prelude module for common battlemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use battlemap::prelude::*;`

pub use crate::core::{
    config::{AssetConfig, EngineConfig, EngineProfile, TextureLoadingConfig},
    geo::{Point, Rect, Size},
    grid::{Cell, Grid, GridKind, GridSize, GridSpec},
    map::{DrawStats, MapContainer},
};

pub use crate::data::{
    entities::{
        AreaEffect, AreaShape, Asset, Aura, Drawing, DrawingShape, Entity, MapLayer, Marker,
        Role, SizeClass, Tile, Token,
    },
    snapshot::{MapInfo, WorldSnapshot},
};

pub use crate::input::{
    events::{InteractionContext, InteractionMode, PointerEvent},
    messages::{ControlState, Outbox, ProtocolMessage, TokenMoved},
};

pub use crate::layers::{Layer, LayerKind, Reconciliation};

pub use crate::views::{
    AreaEffectView, AuraView, DrawingView, EntityView, MarkerView, TileView, TokenView, ViewKind,
    ViewNode, ViewRef,
};

pub use crate::textures::{
    AssetFetcher, HttpFetcher, MemoryFetcher, Texture, TextureCache, TextureHandle,
};

pub use crate::rendering::{DisplayList, DrawCommand, RenderContext, Visual};

pub use crate::{Error as MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
