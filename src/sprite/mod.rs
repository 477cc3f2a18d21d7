mod loader;
mod sprite;
mod trimmer;

pub use loader::{SOURCE_EXTENSIONS, find_source_images, load_sprites};
pub use sprite::{SourceImage, SourceSprite, TrimInfo};
pub use trimmer::trim_sprite;
