use serde::{Deserialize, Serialize};

use crate::core::grid::GridSpec;
use crate::data::entities::{AreaEffect, Asset, Drawing, MapLayer, Marker, Tile, Token};
use crate::Result;

/// Map metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapInfo {
    pub id: String,
    pub grid: GridSpec,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background: Option<Asset>,
    pub fog: bool,
    /// 0 is pitch black, 1 is full daylight
    pub ambient_light: Option<f32>,
    /// Name of an ambient effect (rain, snow, ...) for the effects layer
    pub effect: Option<String>,
}

/// Complete description of the world for one render cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub map: Option<MapInfo>,
    pub tokens: Vec<Token>,
    pub tiles: Vec<Tile>,
    pub markers: Vec<Marker>,
    pub drawings: Vec<Drawing>,
    pub area_effects: Vec<AreaEffect>,
    /// Token currently holding the turn
    pub turned_id: Option<String>,
    /// Whether the encounter has started
    pub started: bool,
}

impl WorldSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn friendly_tokens(&self) -> Vec<Token> {
        self.tokens.iter().filter(|t| t.is_friendly()).cloned().collect()
    }

    pub fn other_tokens(&self) -> Vec<Token> {
        self.tokens.iter().filter(|t| !t.is_friendly()).cloned().collect()
    }

    pub fn tiles_in(&self, layer: MapLayer) -> Vec<Tile> {
        self.tiles.iter().filter(|t| t.layer == layer).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::GridKind;

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = WorldSnapshot::from_json(
            r#"{
                "map": {"id": "crypt", "grid": {"kind": "hex", "size": 70}, "fog": true},
                "tokens": [
                    {"id": "a", "role": "friendly", "x": 35, "y": 35},
                    {"id": "b", "role": "hostile", "x": 105, "y": 35}
                ],
                "tiles": [
                    {"id": "floor", "layer": "map", "width": 700, "height": 700},
                    {"id": "chest", "layer": "object", "zIndex": 2}
                ],
                "turnedId": "a",
                "started": true
            }"#,
        )
        .unwrap();

        let map = snapshot.map.as_ref().unwrap();
        assert_eq!(map.grid.kind, GridKind::Hex);
        assert_eq!(map.grid.units_per_cell, 5.0);
        assert_eq!(snapshot.friendly_tokens().len(), 1);
        assert_eq!(snapshot.other_tokens()[0].id, "b");
        assert_eq!(snapshot.tiles_in(MapLayer::Map)[0].id, "floor");
        assert_eq!(snapshot.tiles_in(MapLayer::Object)[0].z_index, 2);
        assert_eq!(snapshot.turned_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(WorldSnapshot::from_json("{\"tokens\": 3}").is_err());
    }
}
