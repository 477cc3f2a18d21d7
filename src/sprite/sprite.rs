use image::RgbaImage;
use std::path::PathBuf;

/// Trimming information to reconstruct original sprite positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimInfo {
    /// Pixels trimmed from left edge
    pub offset_x: u32,
    /// Pixels trimmed from top edge
    pub offset_y: u32,
    /// Original width before trimming
    pub source_width: u32,
    /// Original height before trimming
    pub source_height: u32,
    /// Trimmed width
    pub trimmed_width: u32,
    /// Trimmed height
    pub trimmed_height: u32,
}

impl TrimInfo {
    /// Create TrimInfo for an untrimmed sprite
    pub fn untrimmed(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            source_width: width,
            source_height: height,
            trimmed_width: width,
            trimmed_height: height,
        }
    }

    /// Returns true if the sprite was actually trimmed
    pub fn was_trimmed(&self) -> bool {
        self.trimmed_width != self.source_width || self.trimmed_height != self.source_height
    }
}

/// An image discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Path as found by the scan
    pub path: PathBuf,
    /// File name with extension; the key frames are reported under
    pub name: String,
}

/// A loaded sprite, ready for packing
#[derive(Debug, Clone)]
pub struct SourceSprite {
    /// Same key as the originating `SourceImage`
    pub name: String,
    /// Trimmed image data
    pub image: RgbaImage,
    pub trim_info: TrimInfo,
}

impl SourceSprite {
    /// Width of the sprite (after trimming)
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the sprite (after trimming)
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
