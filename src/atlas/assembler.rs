use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use super::{AtlasRecord, SubAtlasEntry};
use crate::error::ModAtlasError;
use crate::geometry::{Point, Rect, ScaleRatio, Size};
use crate::hull::{Hull, transform_hull};
use crate::naming::{atlas_engine_name, logical_name};
use crate::packing::{FrameManifest, PlacementFrame};

/// Turns packer frame manifests into engine atlas records.
///
/// Frames are looked up by name in `paths` and `hulls`; both maps must
/// cover every name the packer reports.
pub struct AtlasAssembler<'a> {
    base_name: &'a str,
    source_root: &'a Path,
    paths: &'a HashMap<String, PathBuf>,
    hulls: &'a HashMap<String, Hull>,
}

impl<'a> AtlasAssembler<'a> {
    pub fn new(
        base_name: &'a str,
        source_root: &'a Path,
        paths: &'a HashMap<String, PathBuf>,
        hulls: &'a HashMap<String, Hull>,
    ) -> Self {
        Self {
            base_name,
            source_root,
            paths,
            hulls,
        }
    }

    /// Build the record for one sheet. Sub-atlases follow frame order.
    pub fn assemble(&self, sheet_stem: &str, manifest: &FrameManifest) -> Result<AtlasRecord> {
        let mut record = AtlasRecord::new(atlas_engine_name(sheet_stem));

        for (name, frame) in &manifest.frames {
            let entry = self.sub_atlas(name, frame)?;
            debug!("{} -> {:?}", entry.name, entry.rect);
            record.sub_atlases.push(entry);
        }

        Ok(record)
    }

    fn sub_atlas(&self, name: &str, frame: &PlacementFrame) -> Result<SubAtlasEntry> {
        let unknown = || ModAtlasError::UnknownFrame {
            name: name.to_string(),
        };
        let path = self.paths.get(name).ok_or_else(unknown)?;
        let hull = self.hulls.get(name).ok_or_else(unknown)?;

        // Trim offsets are bounded by the image size, far below i32::MAX.
        let top_left = Point::new(
            frame.sprite_source_size.x as i32,
            frame.sprite_source_size.y as i32,
        );
        let rect = Rect::new(frame.frame.x, frame.frame.y, frame.frame.w, frame.frame.h);

        Ok(SubAtlasEntry {
            name: logical_name(self.base_name, self.source_root, path),
            top_left,
            original_size: Size::new(frame.source_size.w, frame.source_size.h),
            rect,
            scale_ratio: ScaleRatio::UNIT,
            is_multi: false,
            is_mip: false,
            is_alpha8: false,
            hull: transform_hull(hull, top_left, Size::new(rect.width, rect.height)),
        })
    }
}

/// Write `<manifest_dir>/<sheet_stem>.atlas.json`.
pub fn write_atlas_record(
    record: &AtlasRecord,
    manifest_dir: &Path,
    sheet_stem: &str,
) -> Result<PathBuf> {
    let path = manifest_dir.join(format!("{}.atlas.json", sheet_stem));
    let content = serde_json::to_string_pretty(record)?;

    fs::write(&path, content).map_err(|e| ModAtlasError::OutputWrite {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}
