use crate::cli::PackingHeuristic;
use crate::geometry::Rect;

/// MaxRects bin packer. Never rotates.
pub struct MaxRectsPacker {
    bin_width: u32,
    bin_height: u32,
    free_rects: Vec<Rect>,
}

impl MaxRectsPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bin_width: width,
            bin_height: height,
            free_rects: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Try to insert a rectangle with the given dimensions
    /// Returns the placed rectangle if successful
    pub fn insert(&mut self, width: u32, height: u32, heuristic: PackingHeuristic) -> Option<Rect> {
        let best_rect = self.find_position(width, height, heuristic)?;
        self.place_rect(best_rect);
        Some(best_rect)
    }

    fn find_position(&self, width: u32, height: u32, heuristic: PackingHeuristic) -> Option<Rect> {
        self.free_rects
            .iter()
            .filter(|free| width <= free.width && height <= free.height)
            .min_by_key(|free| score_rect(free, width, height, heuristic))
            .map(|free| Rect::new(free.x, free.y, width, height))
    }

    fn place_rect(&mut self, rect: Rect) {
        let mut new_rects = Vec::new();

        self.free_rects.retain(|free| {
            if !rect.intersects(free) {
                return true;
            }

            if rect.x > free.x {
                new_rects.push(Rect::new(free.x, free.y, rect.x - free.x, free.height));
            }
            if rect.right() < free.right() {
                new_rects.push(Rect::new(
                    rect.right(),
                    free.y,
                    free.right() - rect.right(),
                    free.height,
                ));
            }
            if rect.y > free.y {
                new_rects.push(Rect::new(free.x, free.y, free.width, rect.y - free.y));
            }
            if rect.bottom() < free.bottom() {
                new_rects.push(Rect::new(
                    free.x,
                    rect.bottom(),
                    free.width,
                    free.bottom() - rect.bottom(),
                ));
            }

            false
        });

        self.free_rects.extend(new_rects);
        self.prune_free_rects();
    }

    /// Drop free rectangles fully contained in another one.
    fn prune_free_rects(&mut self) {
        let mut i = 0;
        while i < self.free_rects.len() {
            let mut j = i + 1;
            while j < self.free_rects.len() {
                if self.free_rects[i].contains(&self.free_rects[j]) {
                    self.free_rects.swap_remove(j);
                } else if self.free_rects[j].contains(&self.free_rects[i]) {
                    self.free_rects.swap_remove(i);
                    j = i + 1;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }

    /// Approximate packing efficiency (0.0 to 1.0).
    ///
    /// Free rectangles may overlap, so this under-reports until the bin
    /// is full. Only used for logging.
    pub fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.bin_width) * u64::from(self.bin_height);
        if total_area == 0 {
            return 0.0;
        }
        let free_area: u64 = self.free_rects.iter().map(Rect::area).sum();
        let used_area = total_area.saturating_sub(free_area);
        used_area as f64 / total_area as f64
    }
}

fn score_rect(free: &Rect, width: u32, height: u32, heuristic: PackingHeuristic) -> (u64, u64) {
    let leftover_h = u64::from(free.width - width);
    let leftover_v = u64::from(free.height - height);
    let short = leftover_h.min(leftover_v);
    let long = leftover_h.max(leftover_v);

    match heuristic {
        PackingHeuristic::BestShortSideFit => (short, long),
        PackingHeuristic::BestLongSideFit => (long, short),
        PackingHeuristic::BestAreaFit => (free.area(), short),
        PackingHeuristic::BottomLeft => (u64::from(free.y + height), u64::from(free.x)),
    }
}
