use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{Rgba, RgbaImage, imageops};
use log::{debug, info, warn};

use super::frames::{FrameManifest, FrameRect, FrameSize, PlacementFrame, SheetMeta};
use super::{MaxRectsPacker, save_sheet_image};
use crate::cli::{CompressionLevel, PackingHeuristic};
use crate::error::ModAtlasError;
use crate::sprite::{SourceImage, SourceSprite, load_sprites};

/// Sheet constraints handed to a [`Packer`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackSettings {
    pub max_width: u32,
    pub max_height: u32,
    /// Fill colour of unused sheet pixels
    pub background: Rgba<u8>,
    pub allow_rotation: bool,
    /// Crop transparent borders before placement
    pub trim: bool,
    /// Gap between the sheet edge and any sprite
    pub border_padding: u32,
    /// Gap between neighbouring sprites
    pub shape_padding: u32,
    pub heuristic: PackingHeuristic,
    pub compress: Option<CompressionLevel>,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            max_width: 2880,
            max_height: 2880,
            background: Rgba([0, 0, 0, 0]),
            allow_rotation: false,
            trim: true,
            border_padding: 0,
            shape_padding: 0,
            heuristic: PackingHeuristic::BestShortSideFit,
            compress: None,
        }
    }
}

impl PackSettings {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            ..Self::default()
        }
    }

    pub fn heuristic(mut self, heuristic: PackingHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }
}

/// One sheet written by a [`Packer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSheet {
    pub index: usize,
    /// `<base><index>`
    pub stem: String,
    pub manifest_path: PathBuf,
    pub image_path: PathBuf,
}

impl PackedSheet {
    pub fn new(out_dir: &Path, base_name: &str, index: usize) -> Self {
        let stem = format!("{}{}", base_name, index);
        Self {
            index,
            manifest_path: out_dir.join(format!("{}.json", stem)),
            image_path: out_dir.join(format!("{}.png", stem)),
            stem,
        }
    }
}

/// Packs source images into sheets.
///
/// Implementations write one image and one frame manifest per sheet into
/// `out_dir`, named `<base_name><index>`, and return them in index order.
pub trait Packer {
    fn pack(
        &self,
        images: &[SourceImage],
        base_name: &str,
        out_dir: &Path,
    ) -> Result<Vec<PackedSheet>>;
}

/// MaxRects packer rendering PNG sheets.
pub struct SheetPacker {
    settings: PackSettings,
}

/// A rendered sheet before it is written out
struct SheetLayout {
    width: u32,
    height: u32,
    image: RgbaImage,
    frames: Vec<(String, PlacementFrame)>,
    occupancy: f64,
}

impl SheetPacker {
    pub fn new(settings: PackSettings) -> Self {
        Self { settings }
    }

    fn bin_size(&self) -> (u32, u32) {
        let border = self.settings.border_padding * 2;
        (
            self.settings.max_width.saturating_sub(border),
            self.settings.max_height.saturating_sub(border),
        )
    }

    fn padded_size(&self, sprite: &SourceSprite) -> (u32, u32) {
        (
            sprite.width() + self.settings.shape_padding,
            sprite.height() + self.settings.shape_padding,
        )
    }

    fn too_large(&self, sprite: &SourceSprite) -> ModAtlasError {
        ModAtlasError::SpriteTooLarge {
            name: sprite.name.clone(),
            width: sprite.width(),
            height: sprite.height(),
            max_width: self.settings.max_width,
            max_height: self.settings.max_height,
        }
    }

    /// Pack as many sprites as fit into one sheet; returns the leftovers.
    fn pack_sheet(&self, sprites: Vec<SourceSprite>) -> (SheetLayout, Vec<SourceSprite>) {
        let (bin_w, bin_h) = self.bin_size();
        let border = self.settings.border_padding;
        let mut packer = MaxRectsPacker::new(bin_w, bin_h);

        let mut placed = Vec::new();
        let mut unpacked = Vec::new();
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for sprite in sprites {
            let (padded_w, padded_h) = self.padded_size(&sprite);
            match packer.insert(padded_w, padded_h, self.settings.heuristic) {
                Some(rect) => {
                    let x = rect.x + border;
                    let y = rect.y + border;
                    max_x = max_x.max(x + sprite.width());
                    max_y = max_y.max(y + sprite.height());
                    placed.push((sprite, x, y));
                }
                None => unpacked.push(sprite),
            }
        }

        let width = (max_x + border).max(1);
        let height = (max_y + border).max(1);
        let mut image = RgbaImage::from_pixel(width, height, self.settings.background);
        let mut frames = Vec::with_capacity(placed.len());

        for (sprite, x, y) in placed {
            imageops::replace(&mut image, &sprite.image, i64::from(x), i64::from(y));
            debug!("Placed {} at ({}, {})", sprite.name, x, y);
            frames.push((sprite.name.clone(), placement_frame(&sprite, x, y)));
        }

        let layout = SheetLayout {
            width,
            height,
            image,
            frames,
            occupancy: packer.occupancy(),
        };
        (layout, unpacked)
    }
}

impl Packer for SheetPacker {
    fn pack(
        &self,
        images: &[SourceImage],
        base_name: &str,
        out_dir: &Path,
    ) -> Result<Vec<PackedSheet>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        if self.settings.allow_rotation {
            warn!("Rotation is not supported; packing sprites unrotated");
        }

        let sprites = load_sprites(images, self.settings.trim)?;

        let (bin_w, bin_h) = self.bin_size();
        for sprite in &sprites {
            let (padded_w, padded_h) = self.padded_size(sprite);
            if padded_w > bin_w || padded_h > bin_h {
                return Err(self.too_large(sprite).into());
            }
        }

        let mut sheets = Vec::new();
        let mut remaining = sprites;

        while !remaining.is_empty() {
            let sheet = PackedSheet::new(out_dir, base_name, sheets.len());
            let first = remaining[0].clone();
            let (layout, unpacked) = self.pack_sheet(remaining);

            // An empty bin always takes a sprite that passed the size check.
            if layout.frames.is_empty() {
                return Err(self.too_large(&first).into());
            }

            save_sheet_image(&layout.image, &sheet.image_path, self.settings.compress)?;

            let manifest = FrameManifest {
                meta: SheetMeta {
                    app: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    image: format!("{}.png", sheet.stem),
                    format: "RGBA8888".to_string(),
                    size: FrameSize {
                        w: layout.width,
                        h: layout.height,
                    },
                    scale: "1".to_string(),
                },
                frames: layout.frames,
            };
            manifest.write(&sheet.manifest_path)?;

            info!(
                "Sheet {}: {}x{} with {} sprites ({:.1}% efficiency)",
                sheet.index,
                layout.width,
                layout.height,
                manifest.frames.len(),
                layout.occupancy * 100.0,
            );

            sheets.push(sheet);
            remaining = unpacked;
        }

        info!(
            "Packed {} images into {} sheet(s)",
            images.len(),
            sheets.len()
        );

        Ok(sheets)
    }
}

fn placement_frame(sprite: &SourceSprite, x: u32, y: u32) -> PlacementFrame {
    let trim = &sprite.trim_info;

    PlacementFrame {
        frame: FrameRect {
            x,
            y,
            w: sprite.width(),
            h: sprite.height(),
        },
        rotated: false,
        trimmed: trim.was_trimmed(),
        sprite_source_size: FrameRect {
            x: trim.offset_x,
            y: trim.offset_y,
            w: trim.trimmed_width,
            h: trim.trimmed_height,
        },
        source_size: FrameSize {
            w: trim.source_width,
            h: trim.source_height,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sprite(dir: &Path, name: &str, w: u32, h: u32, opaque: (u32, u32, u32, u32)) -> SourceImage {
        let (ox, oy, ow, oh) = opaque;
        let mut img = RgbaImage::new(w, h);
        for y in oy..oy + oh {
            for x in ox..ox + ow {
                img.put_pixel(x, y, Rgba([255, 128, 0, 255]));
            }
        }
        let path = dir.join(name);
        img.save(&path).unwrap();
        SourceImage {
            path,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_packs_two_sprites_into_one_sheet() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let images = vec![
            write_sprite(src.path(), "b.png", 32, 32, (0, 0, 32, 32)),
            write_sprite(src.path(), "a.png", 64, 64, (0, 0, 64, 64)),
        ];

        let packer = SheetPacker::new(PackSettings::default());
        let sheets = packer.pack(&images, "Acme-Mod", out.path()).unwrap();

        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].stem, "Acme-Mod0");
        assert!(sheets[0].image_path.is_file());

        let manifest = FrameManifest::read(&sheets[0].manifest_path).unwrap();
        let names: Vec<_> = manifest.frames.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let (_, a) = &manifest.frames[0];
        assert_eq!(a.frame, FrameRect { x: 0, y: 0, w: 64, h: 64 });
        assert!(!a.trimmed);
        assert_eq!(manifest.meta.image, "Acme-Mod0.png");
    }

    #[test]
    fn test_trim_offset_recorded_in_frame() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let images = vec![write_sprite(src.path(), "dot.png", 10, 10, (2, 3, 4, 5))];

        let sheets = SheetPacker::new(PackSettings::default())
            .pack(&images, "Acme-Mod", out.path())
            .unwrap();
        let manifest = FrameManifest::read(&sheets[0].manifest_path).unwrap();
        let (_, frame) = &manifest.frames[0];

        assert!(frame.trimmed);
        assert_eq!(frame.frame, FrameRect { x: 0, y: 0, w: 4, h: 5 });
        assert_eq!(frame.sprite_source_size, FrameRect { x: 2, y: 3, w: 4, h: 5 });
        assert_eq!(frame.source_size, FrameSize { w: 10, h: 10 });
    }

    #[test]
    fn test_overflow_spills_into_second_sheet() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let images: Vec<_> = (0..3)
            .map(|i| write_sprite(src.path(), &format!("s{}.png", i), 40, 40, (0, 0, 40, 40)))
            .collect();

        let sheets = SheetPacker::new(PackSettings::new(80, 40))
            .pack(&images, "Acme-Mod", out.path())
            .unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[1].stem, "Acme-Mod1");
        let second = FrameManifest::read(&sheets[1].manifest_path).unwrap();
        assert_eq!(second.frames.len(), 1);
    }

    #[test]
    fn test_sprite_larger_than_sheet_is_rejected() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let images = vec![write_sprite(src.path(), "huge.png", 64, 16, (0, 0, 64, 16))];

        let err = SheetPacker::new(PackSettings::new(32, 32))
            .pack(&images, "Acme-Mod", out.path())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ModAtlasError>(),
            Some(ModAtlasError::SpriteTooLarge { .. })
        ));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
