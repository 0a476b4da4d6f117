pub mod background;
pub mod base;
pub mod grid;
pub mod overlay;

use crate::views::{AreaEffectView, AuraView, DrawingView, MarkerView, TileView, TokenView};

pub use background::BackgroundLayer;
pub use base::{Layer, LayerKind, Reconciliation};
pub use grid::GridLayer;
pub use overlay::{OverlayKind, OverlayLayer};

pub type TokensLayer = Layer<TokenView>;
pub type TilesLayer = Layer<TileView>;
pub type MarkersLayer = Layer<MarkerView>;
pub type AreaEffectsLayer = Layer<AreaEffectView>;
pub type AurasLayer = Layer<AuraView>;
pub type DrawingsLayer = Layer<DrawingView>;
