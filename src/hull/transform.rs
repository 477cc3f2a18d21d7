use super::Hull;
use crate::geometry::{Point, Size};

/// Re-express a hull computed against the original image in the space of
/// its trimmed placement.
///
/// Every vertex is translated by `-top_left`. Sprites are never scaled by
/// the packer, so `size` does not alter coordinates; it is part of the
/// signature so callers pass the full placement context.
pub fn transform_hull(hull: &[Point], top_left: Point, _size: Size) -> Hull {
    if hull.is_empty() {
        return Vec::new();
    }

    hull.iter()
        .map(|p| Point::new(p.x - top_left.x, p.y - top_left.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hull_stays_empty() {
        let out = transform_hull(&[], Point::new(5, 7), Size::new(10, 10));
        assert!(out.is_empty());
    }

    #[test]
    fn test_translates_by_top_left() {
        let hull = vec![Point::new(4, 2), Point::new(9, 2), Point::new(4, 8)];

        let out = transform_hull(&hull, Point::new(3, 1), Size::new(6, 7));

        assert_eq!(
            out,
            vec![Point::new(1, 1), Point::new(6, 1), Point::new(1, 7)]
        );
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let hull = vec![Point::new(0, 0), Point::new(31, 0), Point::new(31, 31)];
        let out = transform_hull(&hull, Point::new(0, 0), Size::new(32, 32));
        assert_eq!(out, hull);
    }

    #[test]
    fn test_preserves_order_and_ignores_size() {
        let hull: Vec<_> = (0..12).map(|i| Point::new(i * 3, 40 - i)).collect();
        let offset = Point::new(2, 5);

        let small = transform_hull(&hull, offset, Size::new(1, 1));
        let large = transform_hull(&hull, offset, Size::new(512, 512));

        assert_eq!(small, large);
        for (before, after) in hull.iter().zip(&small) {
            assert_eq!(after.x, before.x - offset.x);
            assert_eq!(after.y, before.y - offset.y);
        }
    }
}
