use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::cli::PackageCodec;
use crate::error::ModAtlasError;

/// Bundles a finished target directory into a single package file.
pub trait Packager {
    fn package(&self, source_dir: &Path, output: &Path, codec: PackageCodec) -> Result<()>;
}

/// Writes the target directory as a zip archive.
///
/// Entries are relative to `source_dir`, use `/` separators and are
/// written in path order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchivePackager;

impl Packager for ArchivePackager {
    fn package(&self, source_dir: &Path, output: &Path, codec: PackageCodec) -> Result<()> {
        let zip_err = |e: zip::result::ZipError| ModAtlasError::Package {
            path: output.to_path_buf(),
            source: e,
        };

        let file = File::create(output)
            .with_context(|| format!("failed to create package: {}", output.display()))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(match codec {
            PackageCodec::Stored => CompressionMethod::Stored,
            PackageCodec::Deflate => CompressionMethod::Deflated,
        });

        let mut entries = Vec::new();
        collect_entries(source_dir, &mut entries)?;

        for path in entries {
            let name = archive_name(source_dir, &path);
            if path.is_dir() {
                zip.add_directory(name, options).map_err(zip_err)?;
            } else {
                debug!("Packaging {}", name);
                zip.start_file(name, options).map_err(zip_err)?;
                let mut input = File::open(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                io::copy(&mut input, &mut zip)
                    .with_context(|| format!("failed to package {}", path.display()))?;
            }
        }

        zip.finish().map_err(zip_err)?;
        info!("Wrote package {}", output.display());

        Ok(())
    }
}

fn collect_entries(dir: &Path, entries: &mut Vec<PathBuf>) -> Result<()> {
    let mut children = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    children.sort();

    for path in children {
        let is_dir = path.is_dir();
        entries.push(path.clone());
        if is_dir {
            collect_entries(&path, entries)?;
        }
    }

    Ok(())
}

fn archive_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
