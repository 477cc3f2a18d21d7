use std::path::Path;

use anyhow::Result;
use image::{ImageReader, RgbaImage};

use super::Hull;
use crate::error::ModAtlasError;
use crate::geometry::Point;

/// Source of hull polygons for sprite images.
pub trait HullProvider: Sync {
    fn hull(&self, path: &Path) -> Result<Hull>;
}

/// Hull provider used when hulls are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHulls;

impl HullProvider for NoHulls {
    fn hull(&self, _path: &Path) -> Result<Hull> {
        Ok(Vec::new())
    }
}

/// Computes the convex hull of every pixel whose alpha exceeds a threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexHullProvider {
    pub alpha_threshold: u8,
}

impl HullProvider for ConvexHullProvider {
    fn hull(&self, path: &Path) -> Result<Hull> {
        let img = ImageReader::open(path)
            .map_err(|e| ModAtlasError::ImageLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .with_guessed_format()
            .map_err(|e| ModAtlasError::ImageLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?
            .decode()
            .map_err(|e| ModAtlasError::ImageLoad {
                path: path.to_path_buf(),
                source: e,
            })?
            .into_rgba8();

        Ok(convex_hull(&img, self.alpha_threshold))
    }
}

/// Convex hull of the opaque pixels of `image`, in pixel coordinates.
///
/// Vertices are returned without collinear points, starting from the
/// left-most (then top-most) pixel. Fully transparent images yield an
/// empty hull.
pub fn convex_hull(image: &RgbaImage, alpha_threshold: u8) -> Hull {
    let (width, height) = image.dimensions();

    // Only the outermost opaque pixel of each row can be a hull vertex.
    let mut candidates = Vec::new();
    for y in 0..height {
        let mut row = (0..width).filter(|&x| image.get_pixel(x, y)[3] > alpha_threshold);
        let Some(first) = row.next() else {
            continue;
        };
        let last = row.last().unwrap_or(first);

        candidates.push(pixel_point(first, y));
        if last != first {
            candidates.push(pixel_point(last, y));
        }
    }

    monotone_chain(candidates)
}

fn pixel_point(x: u32, y: u32) -> Point {
    // Image dimensions are far below i32::MAX.
    Point::new(x as i32, y as i32)
}

fn cross(o: Point, a: Point, b: Point) -> i64 {
    (i64::from(a.x) - i64::from(o.x)) * (i64::from(b.y) - i64::from(o.y))
        - (i64::from(a.y) - i64::from(o.y)) * (i64::from(b.x) - i64::from(o.x))
}

fn monotone_chain(mut points: Vec<Point>) -> Hull {
    points.sort_by_key(|p| (p.x, p.y));
    points.dedup();

    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(points.len());
    for &p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sorted(mut hull: Hull) -> Hull {
        hull.sort_by_key(|p| (p.x, p.y));
        hull
    }

    #[test]
    fn test_hull_of_opaque_square() {
        let mut img = RgbaImage::new(8, 8);
        for y in 2..6 {
            for x in 1..5 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }

        let hull = convex_hull(&img, 0);

        assert_eq!(
            sorted(hull),
            vec![
                Point::new(1, 2),
                Point::new(1, 5),
                Point::new(4, 2),
                Point::new(4, 5),
            ]
        );
    }

    #[test]
    fn test_hull_of_triangle_drops_collinear_edge_pixels() {
        let mut img = RgbaImage::new(10, 10);
        for y in 2..8u32 {
            for x in 2..8u32 {
                if (x - 2) + (y - 2) <= 5 {
                    img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
                }
            }
        }

        let hull = convex_hull(&img, 0);

        assert_eq!(
            sorted(hull),
            vec![Point::new(2, 2), Point::new(2, 7), Point::new(7, 2)]
        );
    }

    #[test]
    fn test_transparent_image_has_empty_hull() {
        let img = RgbaImage::new(16, 16);
        assert!(convex_hull(&img, 0).is_empty());
    }

    #[test]
    fn test_alpha_threshold_ignores_faint_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 10]));
        img.put_pixel(2, 2, Rgba([0, 0, 0, 200]));

        assert_eq!(convex_hull(&img, 16), vec![Point::new(2, 2)]);
        assert_eq!(convex_hull(&img, 0).len(), 2);
    }

    #[test]
    fn test_no_hulls_provider_is_empty() {
        let hull = NoHulls.hull(Path::new("does/not/matter.png")).unwrap();
        assert!(hull.is_empty());
    }
}
