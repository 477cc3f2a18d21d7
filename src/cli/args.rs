use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modatlas")]
#[command(version, about = "Sprite atlas builder for SGG-engine mods", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack a sprite folder into atlases, manifests and a mod package
    Build(BuildArgs),
    /// Print the convex hull of a single image as JSON
    Hull(HullArgs),
    /// Write a config file with default settings
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Root folder of the sprite images [default: .]
    pub source: Option<PathBuf>,

    /// Target folder; its name must be your mod guid (Owner-ModName)
    pub target: Option<PathBuf>,

    /// Load settings from a .modatlas config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder the packer writes raw sheets into before they are moved [default: .]
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Compute convex hulls for every sprite
    #[arg(long)]
    pub hulls: bool,

    /// Skip writing <target>.pkg
    #[arg(long)]
    pub no_package: bool,

    /// Package compression [default: deflate]
    #[arg(long, value_enum)]
    pub codec: Option<PackageCodec>,

    /// Maximum sheet width in pixels [default: 2880]
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum sheet height in pixels [default: 2880]
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Placement heuristic [default: best-short-side-fit]
    #[arg(long, value_enum)]
    pub heuristic: Option<PackingHeuristic>,

    /// Compress sheet PNGs (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HullArgs {
    /// Image to trace
    pub image: PathBuf,

    /// Pixels with alpha at or below this value count as transparent
    #[arg(long, default_value_t = 0)]
    pub alpha_threshold: u8,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the config file
    #[arg(default_value = "modatlas.json")]
    pub path: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

/// Compression used for the package archive
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PackageCodec {
    /// No compression
    #[value(name = "stored")]
    Stored,
    /// Deflate
    #[default]
    #[value(name = "deflate")]
    Deflate,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            return Ok(CompressionLevel::Max);
        }
        let n = s
            .parse::<u8>()
            .map_err(|_e| format!("invalid compression level: {}", s))?;
        if n <= 6 {
            Ok(CompressionLevel::Level(n))
        } else {
            Err(format!("compression level must be 0-6 or 'max', got {}", n))
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PackingHeuristic {
    /// Best Short Side Fit - minimizes the shorter leftover side
    #[default]
    #[value(name = "best-short-side-fit")]
    BestShortSideFit,
    /// Best Long Side Fit - minimizes the longer leftover side
    #[value(name = "best-long-side-fit")]
    BestLongSideFit,
    /// Best Area Fit - picks the smallest free rectangle
    #[value(name = "best-area-fit")]
    BestAreaFit,
    /// Bottom Left - Tetris-style packing
    #[value(name = "bottom-left")]
    BottomLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parsing() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_build_args_parse() {
        let cli = CliArgs::try_parse_from([
            "modatlas",
            "build",
            "sprites",
            "out/Acme-Mod",
            "--hulls",
            "--codec",
            "stored",
            "--compress",
        ])
        .unwrap();

        let Command::Build(args) = cli.command else {
            panic!("expected build subcommand");
        };
        assert_eq!(args.source, Some(PathBuf::from("sprites")));
        assert_eq!(args.target, Some(PathBuf::from("out/Acme-Mod")));
        assert!(args.hulls);
        assert!(!args.no_package);
        assert_eq!(args.codec, Some(PackageCodec::Stored));
        assert_eq!(args.compress, Some(CompressionLevel::Level(2)));
    }

    #[test]
    fn test_build_with_config_only() {
        let cli = CliArgs::try_parse_from(["modatlas", "build", "-c", "mod.json"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build subcommand");
        };
        assert_eq!(args.config, Some(PathBuf::from("mod.json")));
        assert!(args.target.is_none());
    }
}
