use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, ScaleRatio, Size};
use crate::hull::Hull;

/// Manifest schema version the engine expects.
pub const ATLAS_SCHEMA_VERSION: u32 = 4;

/// Engine atlas manifest for one packed sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasRecord {
    pub version: u32,
    /// Engine path of this atlas
    pub name: String,
    /// Always equal to `name`: an atlas references its own sheet
    pub referenced_texture_name: String,
    pub is_reference: bool,
    pub sub_atlases: Vec<SubAtlasEntry>,
}

impl AtlasRecord {
    pub fn new(name: String) -> Self {
        Self {
            version: ATLAS_SCHEMA_VERSION,
            referenced_texture_name: name.clone(),
            name,
            is_reference: true,
            sub_atlases: Vec::new(),
        }
    }

    /// Engine paths of every sprite, in sheet order.
    pub fn engine_paths(&self) -> impl Iterator<Item = &str> {
        self.sub_atlases.iter().map(|s| s.name.as_str())
    }
}

/// One sprite's placement within an atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAtlasEntry {
    /// Engine path the game uses to look the sprite up
    pub name: String,
    /// Pixels trimmed from the left/top of the original image
    pub top_left: Point,
    pub original_size: Size,
    /// Placement in the sheet
    pub rect: Rect,
    pub scale_ratio: ScaleRatio,
    pub is_multi: bool,
    pub is_mip: bool,
    pub is_alpha8: bool,
    pub hull: Hull,
}
