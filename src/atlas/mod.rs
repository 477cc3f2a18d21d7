mod assembler;
mod types;

pub use assembler::{AtlasAssembler, write_atlas_record};
pub use types::{ATLAS_SCHEMA_VERSION, AtlasRecord, SubAtlasEntry};
