mod context;
mod relocate;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use crate::atlas::{AtlasAssembler, write_atlas_record};
use crate::hull::{ConvexHullProvider, Hull, HullProvider, NoHulls};
use crate::package::{ArchivePackager, Packager};
use crate::packing::{FrameManifest, Packer, SheetPacker};
use crate::sprite::{SourceImage, find_source_images};

pub use context::{BuildContext, BuildOptions};
pub use relocate::{SheetImage, relocate_sheet_images};

/// What a finished build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Written `.atlas.json` files, one per sheet
    pub manifests: Vec<PathBuf>,
    /// Engine path of every packed sprite, in sheet order
    pub engine_paths: Vec<String>,
    /// Sheet images moved into the target
    pub sheet_images: Vec<PathBuf>,
    pub package: Option<PathBuf>,
}

/// Run a build with the default collaborators.
pub fn build(options: BuildOptions) -> Result<BuildReport> {
    Pipeline::new(options).run()
}

/// Source folder to mod package.
///
/// Collaborators default to the built-in packer, hull tracer and zip
/// packager; each can be swapped before calling [`Pipeline::run`].
pub struct Pipeline {
    options: BuildOptions,
    packer: Box<dyn Packer>,
    hull_provider: Box<dyn HullProvider>,
    packager: Box<dyn Packager>,
}

impl Pipeline {
    pub fn new(options: BuildOptions) -> Self {
        let hull_provider: Box<dyn HullProvider> = if options.include_hulls {
            Box::new(ConvexHullProvider::default())
        } else {
            Box::new(NoHulls)
        };

        Self {
            packer: Box::new(SheetPacker::new(options.pack.clone())),
            hull_provider,
            packager: Box::new(ArchivePackager),
            options,
        }
    }

    pub fn packer(mut self, packer: Box<dyn Packer>) -> Self {
        self.packer = packer;
        self
    }

    pub fn hull_provider(mut self, hull_provider: Box<dyn HullProvider>) -> Self {
        self.hull_provider = hull_provider;
        self
    }

    pub fn packager(mut self, packager: Box<dyn Packager>) -> Self {
        self.packager = packager;
        self
    }

    pub fn run(&self) -> Result<BuildReport> {
        // Nothing on disk changes until the name and sources check out.
        let ctx = BuildContext::new(&self.options)?;
        let images = find_source_images(&ctx.source_dir, Some(&ctx.target_dir))?;
        info!(
            "Found {} images under {}",
            images.len(),
            ctx.source_dir.display()
        );

        ctx.prepare_target_dir()?;

        let paths: HashMap<String, PathBuf> = images
            .iter()
            .map(|image| (image.name.clone(), image.path.clone()))
            .collect();
        let hulls = self.compute_hulls(&images)?;

        fs::create_dir_all(&ctx.work_dir)
            .with_context(|| format!("failed to create {}", ctx.work_dir.display()))?;
        let sheets = self.packer.pack(&images, &ctx.base_name, &ctx.work_dir)?;

        let mut report = BuildReport::default();
        let assembler = AtlasAssembler::new(&ctx.base_name, &ctx.source_dir, &paths, &hulls);
        let manifest_dir = ctx.manifest_dir();

        for sheet in &sheets {
            let frames = FrameManifest::read(&sheet.manifest_path)?;
            let record = assembler.assemble(&sheet.stem, &frames)?;
            let written = write_atlas_record(&record, &manifest_dir, &sheet.stem)?;
            info!("Wrote {}", written.display());

            fs::remove_file(&sheet.manifest_path).with_context(|| {
                format!("failed to remove {}", sheet.manifest_path.display())
            })?;

            report
                .engine_paths
                .extend(record.engine_paths().map(str::to_string));
            report.manifests.push(written);
        }

        let atlas_dir = ctx.atlas_dir();
        for sheet in &sheets {
            report
                .sheet_images
                .extend(relocate_sheet_images(&ctx.work_dir, &sheet.stem, &atlas_dir));
        }

        if self.options.package {
            let package_path = ctx.package_path();
            self.packager
                .package(&ctx.target_dir, &package_path, self.options.codec)?;
            report.package = Some(package_path);
        }

        info!(
            "Built {} atlas(es) with {} sprites",
            report.manifests.len(),
            report.engine_paths.len()
        );

        Ok(report)
    }

    /// Hull per image name. Names are unique after the scan.
    fn compute_hulls(&self, images: &[SourceImage]) -> Result<HashMap<String, Hull>> {
        if self.options.include_hulls {
            info!("Computing hulls for {} images...", images.len());
        }

        let provider: &dyn HullProvider = self.hull_provider.as_ref();
        let computed = images
            .par_iter()
            .map(|image| {
                let hull = provider.hull(&image.path)?;
                debug!("{}: {} hull points", image.name, hull.len());
                Ok((image.name.clone(), hull))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(computed.into_iter().collect())
    }
}
