//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use battlemap::prelude::*;

/// Encodes a solid `width` x `height` PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 40, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// In-memory fetcher that counts calls and yields before answering, so
/// concurrent loads overlap.
#[derive(Default)]
pub struct CountingFetcher {
    assets: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(url.to_string(), bytes);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 {}", url))
    }
}

/// Remote URL the default config resolves `resource` to
pub fn remote(resource: &str) -> String {
    format!("http://{}{}", EngineConfig::default().assets.remote_host, resource)
}

/// Bundled URL the default config resolves `path` to
pub fn bundled(path: &str) -> String {
    format!("http://{}{}", EngineConfig::default().assets.bundled_host, path)
}

pub fn container_with(fetcher: Arc<CountingFetcher>) -> MapContainer {
    let config = EngineConfig::default();
    let textures = TextureCache::with_fetcher(&config, fetcher);
    MapContainer::with_textures(config, textures)
}

pub fn container() -> MapContainer {
    container_with(Arc::new(CountingFetcher::new()))
}

pub fn map_info() -> MapInfo {
    MapInfo {
        id: "crypt".to_string(),
        width: Some(1400.0),
        height: Some(700.0),
        ..MapInfo::default()
    }
}

pub fn snapshot(tokens: Vec<Token>) -> WorldSnapshot {
    WorldSnapshot {
        map: Some(map_info()),
        tokens,
        ..WorldSnapshot::default()
    }
}

pub fn friendly(id: &str, x: f64, y: f64) -> Token {
    Token::new(id, Role::Friendly, x, y)
}

pub fn hostile(id: &str, x: f64, y: f64) -> Token {
    Token::new(id, Role::Hostile, x, y)
}
