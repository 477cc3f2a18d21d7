use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use image::ImageReader;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::{SourceImage, SourceSprite, TrimInfo, trim_sprite};
use crate::error::ModAtlasError;

/// File extensions picked up by the source scan.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["png", "dds"];

/// Recursively find every `.png` and `.dds` under `source_dir`.
///
/// All PNGs are listed before all DDS files, each group in path order.
/// Anything inside `exclude` is skipped, so a target nested in the source
/// tree never feeds its own previous output back in. Files sharing a name
/// collapse to the last one scanned.
pub fn find_source_images(
    source_dir: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<SourceImage>> {
    if !source_dir.is_dir() {
        return Err(ModAtlasError::SourceNotFound(source_dir.to_path_buf()).into());
    }

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let root = Pattern::escape(&source_dir.to_string_lossy());
    let excluded = exclude.and_then(|dir| fs::canonicalize(dir).ok());

    let mut images = Vec::new();
    for ext in SOURCE_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", root.trim_end_matches(['/', '\\']), ext);
        let paths = glob::glob_with(&pattern, options)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;

        for entry in paths {
            let path = entry.with_context(|| format!("failed to read glob entry: {}", pattern))?;
            if !path.is_file() {
                continue;
            }
            if excluded.as_deref().is_some_and(|dir| is_within(&path, dir)) {
                debug!("Skipping {}", path.display());
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            debug!("Found {}", path.display());
            images.push(SourceImage { path, name });
        }
    }

    if images.is_empty() {
        return Err(ModAtlasError::NoImages(source_dir.to_path_buf()).into());
    }

    Ok(dedupe_by_name(images))
}

fn is_within(path: &Path, dir: &Path) -> bool {
    fs::canonicalize(path).is_ok_and(|p| p.starts_with(dir))
}

/// Frames are keyed by file name, so of two files sharing a name in
/// different folders only the last scanned is kept, in the slot of the first.
fn dedupe_by_name(images: Vec<SourceImage>) -> Vec<SourceImage> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<SourceImage> = Vec::with_capacity(images.len());

    for image in images {
        if let Some(slot) = slots.get(&image.name).copied() {
            warn!(
                "'{}' and '{}' share the name '{}'; only the last one is kept",
                unique[slot].path.display(),
                image.path.display(),
                image.name
            );
            unique[slot] = image;
        } else {
            slots.insert(image.name.clone(), unique.len());
            unique.push(image);
        }
    }

    unique
}

/// Load and optionally trim every source image.
///
/// Sprites come back largest-area first, which is the order the packer
/// places (and reports) them in.
pub fn load_sprites(images: &[SourceImage], trim: bool) -> Result<Vec<SourceSprite>> {
    info!("Loading {} images...", images.len());

    let sprites: Result<Vec<_>> = images
        .par_iter()
        .map(|image| load_single_sprite(image, trim))
        .collect();

    let mut sprites = sprites?;
    sprites.sort_by(|a, b| {
        let area_a = u64::from(a.width()) * u64::from(a.height());
        let area_b = u64::from(b.width()) * u64::from(b.height());
        area_b.cmp(&area_a)
    });

    Ok(sprites)
}

fn load_single_sprite(source: &SourceImage, trim: bool) -> Result<SourceSprite> {
    let path = &source.path;
    let img = ImageReader::open(path)
        .map_err(|e| ModAtlasError::ImageLoad {
            path: path.clone(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| ModAtlasError::ImageLoad {
            path: path.clone(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| ModAtlasError::ImageLoad {
            path: path.clone(),
            source: e,
        })?
        .into_rgba8();

    let (image, trim_info) = if trim {
        trim_sprite(&img)
    } else {
        let (w, h) = img.dimensions();
        (img, TrimInfo::untrimmed(w, h))
    };

    Ok(SourceSprite {
        name: source.name.clone(),
        image,
        trim_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn write_png(path: &Path, w: u32, h: u32) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut img = RgbaImage::new(w, h);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([10, 20, 30, 255]);
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_find_source_images_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 4, 4);
        write_png(&dir.path().join("icons/deep/b.png"), 4, 4);
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::write(dir.path().join("icons/c.dds"), "not decoded by the scan").unwrap();

        let images = find_source_images(dir.path(), None).unwrap();
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.png", "c.dds"]);
        assert!(images[1].path.ends_with("icons/deep/b.png"));
    }

    #[test]
    fn test_find_source_images_empty_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_source_images(dir.path(), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModAtlasError>(),
            Some(ModAtlasError::NoImages(_))
        ));
    }

    #[test]
    fn test_find_source_images_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_source_images(&dir.path().join("nope"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModAtlasError>(),
            Some(ModAtlasError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_load_sprites_sorts_by_area() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("small.png"), 8, 8);
        write_png(&dir.path().join("big.png"), 32, 16);

        let images = find_source_images(dir.path(), None).unwrap();
        let sprites = load_sprites(&images, true).unwrap();

        assert_eq!(sprites[0].name, "big.png");
        assert_eq!(sprites[1].name, "small.png");
        assert_eq!(sprites[0].trim_info, TrimInfo::untrimmed(32, 16));
    }

    #[test]
    fn test_same_name_keeps_last_scanned() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("x/icon.png"), 8, 8);
        write_png(&dir.path().join("y/icon.png"), 12, 12);
        write_png(&dir.path().join("z.png"), 4, 4);

        let images = find_source_images(dir.path(), None).unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].name, "icon.png");
        assert!(images[0].path.ends_with("y/icon.png"));
        assert_eq!(images[1].name, "z.png");
    }

    #[test]
    fn test_excluded_dir_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 4, 4);
        write_png(&dir.path().join("Acme-Mod/textures/atlases/Acme-Mod0.png"), 4, 4);

        let images = find_source_images(dir.path(), Some(&dir.path().join("Acme-Mod"))).unwrap();
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(names, vec!["a.png"]);
    }

    #[test]
    fn test_only_excluded_images_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("Acme-Mod/old.png"), 4, 4);

        let err = find_source_images(dir.path(), Some(&dir.path().join("Acme-Mod"))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModAtlasError>(),
            Some(ModAtlasError::NoImages(_))
        ));
    }

    #[test]
    fn test_load_error_reports_cause_once() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SourceImage {
            path: dir.path().join("gone.png"),
            name: "gone.png".to_string(),
        };

        let err = load_sprites(&[missing], true).unwrap_err();
        let typed = err.downcast_ref::<ModAtlasError>().unwrap();
        let cause = std::error::Error::source(typed).unwrap().to_string();
        let message = format!("{:#}", err);

        assert!(message.contains("gone.png"));
        assert_eq!(message.matches(cause.as_str()).count(), 1);
    }
}
