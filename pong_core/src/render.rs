//! World-to-grid mapping for character-cell renderers.

use crate::types::{Entity, View};
use crate::vector::Vec2;

/// Inclusive cell rectangle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl CellRect {
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }
}

/// Maps world rectangles onto a `cols` x `rows` grid.
///
/// Cell extents come from the entity size alone, so a paddle keeps the same
/// height in cells wherever it sits.
#[derive(Debug, Copy, Clone)]
pub struct RenderHelper {
    cols: usize,
    rows: usize,
    scale: Vec2,
}

impl RenderHelper {
    pub fn new(cols: usize, rows: usize, screen: Vec2) -> Self {
        let scale = if screen.width() > 0.0 && screen.height() > 0.0 {
            Vec2::new(cols as f32 / screen.width(), rows as f32 / screen.height())
        } else {
            Vec2::zero()
        };
        RenderHelper { cols, rows, scale }
    }

    pub fn for_view(cols: usize, rows: usize, view: &View) -> Self {
        Self::new(cols, rows, view.screen)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cells covered by `entity`, or `None` when it is entirely off the grid
    pub fn cell_rect(&self, entity: &Entity) -> Option<CellRect> {
        let (left, right) = span(entity.pos.x, entity.size.width(), self.scale.x, self.cols)?;
        let (top, bottom) = span(entity.pos.y, entity.size.height(), self.scale.y, self.rows)?;
        Some(CellRect {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Cell holding the centre of `entity`
    pub fn center_cell(&self, entity: &Entity) -> Option<(usize, usize)> {
        let center = entity.center();
        let x = cell(center.x, self.scale.x, self.cols)?;
        let y = cell(center.y, self.scale.y, self.rows)?;
        Some((x, y))
    }

    /// Height in cells of anything `height` world units tall
    pub fn cells_for_height(&self, height: f32) -> usize {
        extent(height, self.scale.y)
    }
}

fn extent(size: f32, scale: f32) -> usize {
    ((size * scale).round() as usize).max(1)
}

fn cell(coord: f32, scale: f32, limit: usize) -> Option<usize> {
    let c = (coord * scale).floor();
    if c < 0.0 || c >= limit as f32 {
        None
    } else {
        Some(c as usize)
    }
}

fn span(pos: f32, size: f32, scale: f32, limit: usize) -> Option<(usize, usize)> {
    if limit == 0 || !pos.is_finite() {
        return None;
    }
    let start = (pos * scale).floor() as i64;
    let end = start + extent(size, scale) as i64 - 1;
    let max = limit as i64 - 1;

    if end < 0 || start > max {
        return None;
    }
    Some((start.max(0) as usize, end.min(max) as usize))
}
