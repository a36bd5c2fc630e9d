use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::components::tilemap::TileType;

/// A custom property attached to a tile in a Tiled-style tileset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileProperty {
    pub name: String,
    /// Declared property type ("bool", "string", ...). Informational only.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl TileProperty {
    pub fn new(name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            kind: String::new(),
            value,
        }
    }
}

/// One entry of a tileset's `tiles` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Tile id local to its tileset.
    pub id: u32,
    #[serde(default)]
    pub properties: Vec<TileProperty>,
}

/// The parts of a tileset file needed for collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileDescriptor>,
}

/// Classify a tile from its property list.
///
/// The first recognised property decides. Flags (`solid`, `unisolid`,
/// `hazard`, `ladder`) must be booleans; `slope` must be one of the six
/// slope codes. Anything malformed yields `Normal`.
pub fn classify(properties: &[TileProperty]) -> TileType {
    for property in properties {
        let flagged = match property.name.as_str() {
            "solid" => TileType::Solid,
            "unisolid" => TileType::Unisolid,
            "hazard" => TileType::Hazard,
            "ladder" => TileType::Ladder,
            "slope" => return classify_slope(&property.value),
            _ => continue,
        };
        return match property.value.as_bool() {
            Some(true) => flagged,
            Some(false) => TileType::Normal,
            None => {
                log::warn!(
                    "Tile property '{}' should be a bool, got {}",
                    property.name,
                    property.value
                );
                TileType::Normal
            }
        };
    }
    TileType::Normal
}

fn classify_slope(value: &serde_json::Value) -> TileType {
    let code = value.as_str().unwrap_or_default();
    match TileType::from_slope_code(code) {
        Some(tile_type) => tile_type,
        None => {
            log::warn!("Unknown slope type: {}", value);
            TileType::Normal
        }
    }
}

/// Local tile id → tile type for one tileset. Ids without an entry are
/// `Normal`.
#[derive(Debug, Clone, Default)]
pub struct TilesetTypes {
    types: HashMap<u32, TileType>,
}

impl TilesetTypes {
    /// Parse a tileset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let descriptor: TilesetDescriptor = serde_json::from_str(json)?;
        Ok(Self::from_descriptor(&descriptor))
    }

    pub fn from_descriptor(descriptor: &TilesetDescriptor) -> Self {
        let types = descriptor
            .tiles
            .iter()
            .map(|tile| (tile.id, classify(&tile.properties)))
            .filter(|(_, tile_type)| *tile_type != TileType::Normal)
            .collect();
        Self { types }
    }

    pub fn get(&self, local_id: u32) -> TileType {
        self.types.get(&local_id).copied().unwrap_or(TileType::Normal)
    }

    /// Number of tiles with a non-`Normal` type.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
