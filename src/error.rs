use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModAtlasError {
    #[error(
        "Invalid target name '{0}': use your mod guid, for example ThunderstoreTeamName-ModName"
    )]
    InvalidTargetName(String),

    #[error("Source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("No .png or .dds images found under '{0}'")]
    NoImages(PathBuf),

    #[error("Failed to load image '{path}'")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}'")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(
        "Sprite '{name}' ({width}x{height}) exceeds maximum sheet size ({max_width}x{max_height})"
    )]
    SpriteTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("Frame '{name}' has no matching source image")]
    UnknownFrame { name: String },

    #[error("Failed to parse frame manifest '{path}'")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write output file '{path}'")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Failed to write package '{path}'")]
    Package {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}
