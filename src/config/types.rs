use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// modatlas configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModAtlasConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Root folder of the sprite images
    pub source_dir: String,
    /// Target folder; its name is the mod guid
    pub target_dir: Option<String>,
    /// Folder raw sheets are written to before being moved into the target
    pub work_dir: String,
    /// Compute convex hulls for every sprite
    pub include_hulls: bool,
    /// Write <target>.pkg after building
    pub package: bool,
    /// Package compression: "stored" or "deflate"
    pub codec: String,
    /// Maximum sheet width in pixels
    pub max_width: u32,
    /// Maximum sheet height in pixels
    pub max_height: u32,
    /// Placement heuristic
    pub heuristic: String,
    /// Sheet PNG compression (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for ModAtlasConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source_dir: ".".to_string(),
            target_dir: None,
            work_dir: ".".to_string(),
            include_hulls: false,
            package: true,
            codec: "deflate".to_string(),
            max_width: 2880,
            max_height: 2880,
            heuristic: "best-short-side-fit".to_string(),
            compress: None,
        }
    }
}
