mod args;

pub use args::{
    BuildArgs, CliArgs, Command, CompressionLevel, HullArgs, InitArgs, PackageCodec,
    PackingHeuristic,
};
