use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use modatlas::cli::{
    BuildArgs, CliArgs, Command, CompressionLevel, HullArgs, InitArgs, PackageCodec,
    PackingHeuristic,
};
use modatlas::config::{CompressConfig, LoadedConfig, ModAtlasConfig, save_config};
use modatlas::hull::{ConvexHullProvider, HullProvider};
use modatlas::packing::PackSettings;
use modatlas::pipeline::{BuildOptions, build as build_atlases};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match cli.command {
        Command::Build(args) => build(&args),
        Command::Hull(args) => hull(&args),
        Command::Init(args) => init(&args),
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[allow(clippy::print_stdout)]
fn build(args: &BuildArgs) -> Result<()> {
    let merged = merge_config_with_args(args)?;

    init_logging(merged.verbose);
    info!("modatlas v{}", env!("CARGO_PKG_VERSION"));

    let report = build_atlases(merged.options)?;

    if let Some(package) = &report.package {
        info!("Package: {}", package.display());
    }
    info!("Done!");

    println!("\nManifest Paths - Use in Codebase:");
    for path in &report.engine_paths {
        println!("{}", path);
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn hull(args: &HullArgs) -> Result<()> {
    let provider = ConvexHullProvider {
        alpha_threshold: args.alpha_threshold,
    };
    let hull = provider.hull(&args.image)?;
    let json = serde_json::to_string_pretty(&hull).context("failed to serialize hull")?;
    println!("{}", json);
    Ok(())
}

fn init(args: &InitArgs) -> Result<()> {
    init_logging(false);

    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }
    save_config(&ModAtlasConfig::default(), &args.path)?;
    info!("Wrote {}", args.path.display());
    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    options: BuildOptions,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &BuildArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Paths: CLI > config > default
    let source_dir = args.source.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_source_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let Some(target_dir) = args
        .target
        .clone()
        .or_else(|| loaded_config.as_ref().and_then(|lc| lc.resolve_target_dir()))
    else {
        bail!("no target directory given (pass TARGET or set target_dir in the config)");
    };

    let work_dir = args.work_dir.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_work_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let defaults = ModAtlasConfig::default();

    let max_width = args.max_width.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.max_width)
            .unwrap_or(defaults.max_width)
    });

    let max_height = args.max_height.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.max_height)
            .unwrap_or(defaults.max_height)
    });

    // Boolean flags: CLI presence wins, otherwise use config
    let include_hulls = if args.hulls {
        true
    } else if let Some(ref lc) = loaded_config {
        lc.config.include_hulls
    } else {
        defaults.include_hulls
    };

    let package = if args.no_package {
        false
    } else if let Some(ref lc) = loaded_config {
        lc.config.package
    } else {
        defaults.package
    };

    let codec = if let Some(c) = args.codec {
        c
    } else if let Some(ref lc) = loaded_config {
        parse_codec(&lc.config.codec).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown codec '{}' in config file. Valid values: stored, deflate",
                lc.config.codec
            )
        })?
    } else {
        PackageCodec::default()
    };

    let heuristic = if let Some(h) = args.heuristic {
        h
    } else if let Some(ref lc) = loaded_config {
        parse_heuristic(&lc.config.heuristic).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown heuristic '{}' in config file. Valid values: best-short-side-fit, \
                 best-long-side-fit, best-area-fit, bottom-left",
                lc.config.heuristic
            )
        })?
    } else {
        PackingHeuristic::default()
    };

    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    } else {
        None
    };

    let options = BuildOptions {
        work_dir,
        include_hulls,
        package,
        codec,
        pack: PackSettings::new(max_width, max_height)
            .heuristic(heuristic)
            .compress(compress),
        ..BuildOptions::new(source_dir, target_dir)
    };

    Ok(MergedConfig {
        options,
        verbose: args.verbose,
    })
}

fn parse_heuristic(s: &str) -> Option<PackingHeuristic> {
    match s {
        "best-short-side-fit" => Some(PackingHeuristic::BestShortSideFit),
        "best-long-side-fit" => Some(PackingHeuristic::BestLongSideFit),
        "best-area-fit" => Some(PackingHeuristic::BestAreaFit),
        "bottom-left" => Some(PackingHeuristic::BottomLeft),
        _ => None,
    }
}

fn parse_codec(s: &str) -> Option<PackageCodec> {
    match s {
        "stored" => Some(PackageCodec::Stored),
        "deflate" => Some(PackageCodec::Deflate),
        _ => None,
    }
}
