use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Where a packed sheet's image ended up, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetImage {
    Png(PathBuf),
    Dds(PathBuf),
    Absent,
}

impl SheetImage {
    /// Look for `<stem>.png` and `<stem>.dds` in `dir`, one slot per format.
    pub fn probe(dir: &Path, stem: &str) -> [Self; 2] {
        let present = |ext: &str| {
            let path = dir.join(format!("{}.{}", stem, ext));
            path.is_file().then_some(path)
        };
        [
            present("png").map_or(SheetImage::Absent, SheetImage::Png),
            present("dds").map_or(SheetImage::Absent, SheetImage::Dds),
        ]
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SheetImage::Png(path) | SheetImage::Dds(path) => Some(path),
            SheetImage::Absent => None,
        }
    }
}

/// Move every image of one sheet from `work_dir` into `dest_dir`.
///
/// Best effort: a sheet may exist in only one format, and a file that
/// cannot be moved is logged and left behind without affecting the
/// other format. Returns the new paths.
pub fn relocate_sheet_images(work_dir: &Path, stem: &str, dest_dir: &Path) -> Vec<PathBuf> {
    let probes = SheetImage::probe(work_dir, stem);
    if probes.iter().all(|image| *image == SheetImage::Absent) {
        debug!("No image found for sheet {}", stem);
        return Vec::new();
    }

    let mut moved = Vec::new();
    for image in &probes {
        let Some(from) = image.path() else {
            continue;
        };
        let Some(file_name) = from.file_name() else {
            continue;
        };
        let to = dest_dir.join(file_name);

        match move_file(from, &to) {
            Ok(()) => {
                debug!("Moved {} -> {}", from.display(), to.display());
                moved.push(to);
            }
            Err(e) => warn!("Could not move {}: {}", from.display(), e),
        }
    }

    moved
}

/// Rename, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if from == to || fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
