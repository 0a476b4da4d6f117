//! Configuration for asset resolution, texture loading and interaction
//!
//! Engines are usually built from a preset; `EngineProfile::Custom` carries a
//! fully specified configuration (for example one deserialized from JSON).

use serde::{Deserialize, Serialize};

use crate::input::events::InteractionMode;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineProfile {
    Balanced,
    LowMemory,
    Custom(EngineConfig),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineConfig {
        match self {
            Self::Balanced => EngineConfig {
                assets: AssetConfig::default(),
                textures: TextureLoadingConfig {
                    retired_capacity: 256,
                    remember_failures: true,
                    max_retries: 2,
                },
                interaction: InteractionMode::All,
            },
            Self::LowMemory => EngineConfig {
                assets: AssetConfig::default(),
                textures: TextureLoadingConfig {
                    retired_capacity: 16,
                    remember_failures: true,
                    max_retries: 1,
                },
                interaction: InteractionMode::All,
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub assets: AssetConfig,
    pub textures: TextureLoadingConfig,
    pub interaction: InteractionMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineProfile::default().resolve()
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where asset paths are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetConfig {
    /// Host serving assets referenced by snapshots (`http://{remote_host}{resource}`)
    pub remote_host: String,
    /// Host serving art shipped with the engine
    pub bundled_host: String,
    pub corpse: String,
    pub bloodied: String,
    pub token_bloodied: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            remote_host: "localhost:8080".to_string(),
            bundled_host: "localhost:4200".to_string(),
            corpse: "/assets/img/corpse.png".to_string(),
            bloodied: "/assets/img/bloodied.png".to_string(),
            token_bloodied: "/assets/img/token-bloodied.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextureLoadingConfig {
    /// Textures no view references any more stay decoded in an LRU of this size
    pub retired_capacity: usize,
    /// Keep answering "missing" for a resource that failed, instead of refetching
    pub remember_failures: bool,
    pub max_retries: u32,
}

impl Default for TextureLoadingConfig {
    fn default() -> Self {
        Self {
            retired_capacity: 256,
            remember_failures: true,
            max_retries: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_presets() {
        let balanced = EngineProfile::Balanced.resolve();
        let low = EngineProfile::LowMemory.resolve();

        assert_eq!(balanced.textures.retired_capacity, 256);
        assert!(low.textures.retired_capacity < balanced.textures.retired_capacity);
        assert_eq!(balanced.interaction, InteractionMode::All);
        assert_eq!(EngineConfig::default(), balanced);
    }

    #[test]
    fn test_partial_json_config() {
        let config =
            EngineConfig::from_json(r#"{"assets": {"remoteHost": "dm.local:9000"}, "interaction": "turn-only"}"#)
                .unwrap();

        assert_eq!(config.assets.remote_host, "dm.local:9000");
        assert_eq!(config.assets.corpse, "/assets/img/corpse.png");
        assert_eq!(config.interaction, InteractionMode::TurnOnly);
        assert!(config.textures.remember_failures);
    }

    #[test]
    fn test_custom_profile_passthrough() {
        let mut custom = EngineConfig::default();
        custom.textures.max_retries = 7;
        assert_eq!(EngineProfile::Custom(custom.clone()).resolve(), custom);
    }
}
