mod provider;
mod transform;

use crate::geometry::Point;

/// Polygon approximating a sprite's opaque silhouette, in pixel space.
pub type Hull = Vec<Point>;

pub use provider::{ConvexHullProvider, HullProvider, NoHulls, convex_hull};
pub use transform::transform_hull;
