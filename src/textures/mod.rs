pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::{TextureCache, TextureHandle};
pub use loader::{AssetFetcher, HttpFetcher, MemoryFetcher, Texture};
pub use source::{AssetOrigin, HostSource, TextureSource};
