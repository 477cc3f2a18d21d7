use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModAtlasError;

/// Per-sheet frame manifest in TexturePacker's "hash" layout.
///
/// `frames` keeps the order the packer emitted them in.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameManifest {
    pub frames: Vec<(String, PlacementFrame)>,
    pub meta: SheetMeta,
}

/// Placement of one sprite within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementFrame {
    /// Packed rectangle in sheet pixels
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    /// Trimmed region relative to the untrimmed image
    pub sprite_source_size: FrameRect,
    /// Untrimmed image size
    pub source_size: FrameSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetMeta {
    pub app: String,
    pub version: String,
    pub image: String,
    pub format: String,
    pub size: FrameSize,
    pub scale: String,
}

#[derive(Serialize, Deserialize)]
struct RawManifest {
    frames: Map<String, Value>,
    meta: SheetMeta,
}

impl FrameManifest {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read frame manifest: {}", path.display()))?;
        let manifest = Self::parse(&content).map_err(|e| ModAtlasError::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(manifest)
    }

    /// Parse a manifest. A name listed twice keeps its first position and
    /// its last value.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        let raw: RawManifest = serde_json::from_str(content)?;
        let frames = raw
            .frames
            .into_iter()
            .map(|(name, value)| Ok((name, serde_json::from_value(value)?)))
            .collect::<serde_json::Result<Vec<(String, PlacementFrame)>>>()?;

        Ok(Self {
            frames,
            meta: raw.meta,
        })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut frames = Map::new();
        for (name, frame) in &self.frames {
            frames.insert(name.clone(), serde_json::to_value(frame)?);
        }
        let raw = RawManifest {
            frames,
            meta: self.meta.clone(),
        };

        let content = serde_json::to_string_pretty(&raw)?;
        fs::write(path, content).map_err(|e| ModAtlasError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}
