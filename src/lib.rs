pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod naming;
pub mod package;
pub mod packing;
pub mod pipeline;
pub mod sprite;

pub use atlas::{AtlasAssembler, AtlasRecord, SubAtlasEntry};
pub use cli::{CliArgs, Command, PackageCodec, PackingHeuristic};
pub use error::ModAtlasError;
pub use hull::{Hull, HullProvider, transform_hull};
pub use naming::{is_valid_target_name, validate_target_name};
pub use pipeline::{BuildOptions, BuildReport, Pipeline, build};
pub use sprite::{SourceImage, SourceSprite, TrimInfo};
