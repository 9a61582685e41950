//! Brush footprint resolution, including mirror copies

use crate::request::{MirrorMode, PaintRequest};
use terrain_paint_core::TilePos;

/// Half-open rectangle of tiles: `min` inclusive, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub min: TilePos,
    pub max: TilePos,
}

impl TileRect {
    /// Square of `size` tiles anchored at its top-left corner.
    ///
    /// Edges past the `i32` range saturate; clamping to a map does the rest.
    pub fn square(origin: TilePos, size: u32) -> Self {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        Self {
            min: origin,
            max: origin.offset(size, size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.min.x && pos.x < self.max.x && pos.y >= self.min.y && pos.y < self.max.y
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            let w = i64::from(self.max.x) - i64::from(self.min.x);
            let h = i64::from(self.max.y) - i64::from(self.min.y);
            usize::try_from(w * h).unwrap_or(usize::MAX)
        }
    }

    /// Positions row by row
    pub fn positions(&self) -> impl Iterator<Item = TilePos> {
        let (min, max) = (self.min, self.max);
        (min.y..max.y).flat_map(move |y| (min.x..max.x).map(move |x| TilePos::new(x, y)))
    }

    /// Intersect with a `width × height` map. `None` when nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let clamped = Self {
            min: TilePos::new(self.min.x.max(0), self.min.y.max(0)),
            max: TilePos::new(
                self.max.x.min(i32::try_from(width).unwrap_or(i32::MAX)),
                self.max.y.min(i32::try_from(height).unwrap_or(i32::MAX)),
            ),
        };
        (!clamped.is_empty()).then_some(clamped)
    }

    /// Reflect across the vertical center line of a map `width` tiles wide
    pub fn mirror_x(&self, width: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        Self {
            min: TilePos::new(width.saturating_sub(self.max.x), self.min.y),
            max: TilePos::new(width.saturating_sub(self.min.x), self.max.y),
        }
    }

    /// Reflect across the horizontal center line of a map `height` tiles tall
    pub fn mirror_y(&self, height: u32) -> Self {
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            min: TilePos::new(self.min.x, height.saturating_sub(self.max.y)),
            max: TilePos::new(self.max.x, height.saturating_sub(self.min.y)),
        }
    }
}

/// Turn a request into the rectangles to paint, each clamped to the map.
///
/// Mirrors are taken from the unclamped brush so a brush hanging off one edge
/// mirrors to one hanging off the opposite edge. Empty and duplicate
/// rectangles are dropped; the original brush comes first.
pub fn resolve_regions(request: &PaintRequest, width: u32, height: u32) -> Vec<TileRect> {
    let brush = TileRect::square(request.origin, request.brush_size);

    let mut candidates = vec![brush];
    match request.mirror {
        MirrorMode::None => {}
        MirrorMode::TwoWay => candidates.push(brush.mirror_x(width)),
        MirrorMode::FourWay => {
            candidates.push(brush.mirror_x(width));
            candidates.push(brush.mirror_y(height));
            candidates.push(brush.mirror_x(width).mirror_y(height));
        }
    }

    let mut regions: Vec<TileRect> = Vec::with_capacity(candidates.len());
    for rect in candidates.iter().filter_map(|r| r.clamp_to(width, height)) {
        if !regions.contains(&rect) {
            regions.push(rect);
        }
    }
    regions
}
