use crate::core::config::AssetConfig;

/// Where an asset path is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetOrigin {
    /// Referenced by snapshot data, served by the session host
    Remote,
    /// Art shipped with the engine (status overlays)
    Bundled,
}

/// Trait representing anything that can turn an asset path into a URL.
pub trait TextureSource: Send + Sync {
    fn url(&self, resource: &str, origin: AssetOrigin) -> String;
}

/// Resolves paths against the configured hosts
#[derive(Debug, Clone)]
pub struct HostSource {
    remote_host: String,
    bundled_host: String,
}

impl HostSource {
    pub fn new(remote_host: impl Into<String>, bundled_host: impl Into<String>) -> Self {
        Self {
            remote_host: remote_host.into(),
            bundled_host: bundled_host.into(),
        }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(config.remote_host.clone(), config.bundled_host.clone())
    }
}

impl TextureSource for HostSource {
    fn url(&self, resource: &str, origin: AssetOrigin) -> String {
        if resource.starts_with("http://") || resource.starts_with("https://") {
            return resource.to_string();
        }

        let host = match origin {
            AssetOrigin::Remote => &self.remote_host,
            AssetOrigin::Bundled => &self.bundled_host,
        };
        if resource.starts_with('/') {
            format!("http://{}{}", host, resource)
        } else {
            format!("http://{}/{}", host, resource)
        }
    }
}
