use crate::core::config::AssetConfig;
use crate::textures::TextureCache;

/// Shared state every view may read while drawing
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub textures: TextureCache,
    /// Paths of the bundled status art
    pub assets: AssetConfig,
}

impl RenderContext {
    pub fn new(textures: TextureCache, assets: AssetConfig) -> Self {
        Self { textures, assets }
    }
}
