use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::prelude::HashMap;
use crate::Result;

/// Shared async HTTP client for asset fetching
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent("battlemap/0.1.0")
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to a default http client: {}", e);
            reqwest::Client::new()
        })
});

/// Fetches the raw bytes behind a resolved asset URL.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// Fetcher backed by the shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    max_retries: u32,
}

impl HttpFetcher {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    async fn fetch_once(url: &str) -> anyhow::Result<Vec<u8>> {
        let response = HTTP_CLIENT.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            log::debug!("fetch asset {} attempt {}", url, attempt);
            match Self::fetch_once(url).await {
                Ok(bytes) => {
                    log::debug!("downloaded {} ({} bytes)", url, bytes.len());
                    return Ok(bytes);
                }
                Err(e) if attempt <= self.max_retries => {
                    log::warn!("asset {} failed on attempt {}: {}", url, attempt, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Serves assets registered up front; useful for embedded art and offline maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(url.into(), bytes);
    }

    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

#[async_trait]
impl AssetFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no asset registered for {}", url))
    }
}

/// A decoded image
pub struct Texture {
    key: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Texture {
    /// Decodes encoded image bytes into RGBA8 pixels.
    pub fn decode(key: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            key: key.into(),
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

/// Textures are identified by their key.
impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.width == other.width && self.height == other.height
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("key", &self.key)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let texture = Texture::decode("http://h/a.png", &png(3, 2)).unwrap();
        assert_eq!(texture.width(), 3);
        assert_eq!(texture.height(), 2);
        assert_eq!(texture.pixels().len(), 3 * 2 * 4);
        assert_eq!(texture.key(), "http://h/a.png");
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(Texture::decode("x", b"not an image").is_err());
    }

    #[test]
    fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new().with("http://h/a.png", vec![1, 2, 3]);
        let bytes = futures::executor::block_on(fetcher.fetch("http://h/a.png")).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert!(futures::executor::block_on(fetcher.fetch("http://h/b.png")).is_err());
    }
}
