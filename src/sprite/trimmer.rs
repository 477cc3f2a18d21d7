use image::RgbaImage;

use super::TrimInfo;

/// Crop away fully transparent borders.
///
/// A fully transparent (or empty) image collapses to a single transparent
/// pixel at the origin so it still occupies a slot on the sheet.
pub fn trim_sprite(image: &RgbaImage) -> (RgbaImage, TrimInfo) {
    let (width, height) = image.dimensions();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        return (
            RgbaImage::new(1, 1),
            TrimInfo {
                offset_x: 0,
                offset_y: 0,
                source_width: width,
                source_height: height,
                trimmed_width: 1,
                trimmed_height: 1,
            },
        );
    };

    let trimmed_width = max_x - min_x + 1;
    let trimmed_height = max_y - min_y + 1;

    let trimmed = image::imageops::crop_imm(image, min_x, min_y, trimmed_width, trimmed_height)
        .to_image();

    let trim_info = TrimInfo {
        offset_x: min_x,
        offset_y: min_y,
        source_width: width,
        source_height: height,
        trimmed_width,
        trimmed_height,
    };

    (trimmed, trim_info)
}
