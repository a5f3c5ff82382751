use std::collections::HashSet;

use smallvec::SmallVec;

use crate::foundation::core::{CellRect, PixelSize, Point, Rgb8};
use crate::raster::config::SplitMode;
use crate::surface::PixelCanvas;

/// Children produced by one split; never more than four.
pub type SplitChildren = SmallVec<[CellRect; 4]>;

/// Stable identity of a cell, unique within its partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RectId(u64);

/// One flat-colored cell of the mosaic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRect {
    pub id: RectId,
    pub rect: CellRect,
    pub color: Rgb8,
}

/// Whether `rect` can be split under `mode` with every child at least 1px on each side.
pub fn is_splittable(rect: CellRect, mode: SplitMode) -> bool {
    match mode {
        SplitMode::Quadrant if rect.width >= 2 && rect.height >= 2 => true,
        _ => rect.width.max(rect.height) >= 2,
    }
}

/// Children of `rect`, top/left children taking the ceiling half of odd extents.
///
/// Quadrant mode on a cell that is 1px along one axis degrades to a half split. Returns an empty
/// list for terminal cells.
pub fn split_children(rect: CellRect, mode: SplitMode) -> SplitChildren {
    let mut out = SplitChildren::new();
    if !is_splittable(rect, mode) {
        return out;
    }
    let CellRect {
        x,
        y,
        width,
        height,
    } = rect;
    let (cw, fw) = (width.div_ceil(2), width / 2);
    let (ch, fh) = (height.div_ceil(2), height / 2);

    if mode == SplitMode::Quadrant && width >= 2 && height >= 2 {
        out.push(CellRect::new(x, y, cw, ch));
        out.push(CellRect::new(x + cw, y, fw, ch));
        out.push(CellRect::new(x, y + ch, cw, fh));
        out.push(CellRect::new(x + cw, y + ch, fw, fh));
    } else if width > height {
        out.push(CellRect::new(x, y, cw, height));
        out.push(CellRect::new(x + cw, y, fw, height));
    } else {
        out.push(CellRect::new(x, y, width, ch));
        out.push(CellRect::new(x, y + ch, width, fh));
    }
    out
}

/// Disjoint cells that exactly tile the render area.
///
/// Starts as one cell and only changes by replacing cells with their children.
#[derive(Clone, Debug)]
pub struct Partition {
    size: PixelSize,
    rects: Vec<SplitRect>,
    next_id: u64,
}

impl Partition {
    /// A single cell spanning the whole render area.
    pub fn seed(size: PixelSize, color: Rgb8) -> Self {
        Self {
            size,
            rects: vec![SplitRect {
                id: RectId(0),
                rect: CellRect::new(0, 0, size.width, size.height),
                color,
            }],
            next_id: 1,
        }
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn rects(&self) -> &[SplitRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn covered_area(&self) -> u64 {
        self.rects.iter().map(|r| r.rect.area()).sum()
    }

    /// First splittable cell containing `p` (edges inclusive).
    pub fn select_at(&self, p: Point, mode: SplitMode) -> Option<RectId> {
        self.rects
            .iter()
            .find(|r| r.rect.contains_inclusive(p))
            .filter(|r| is_splittable(r.rect, mode))
            .map(|r| r.id)
    }

    /// Every splittable cell whose center lies within `radius` of `p`.
    pub fn select_within(&self, p: Point, radius: f64, mode: SplitMode) -> Vec<RectId> {
        let radius_sq = radius * radius;
        self.rects
            .iter()
            .filter(|r| is_splittable(r.rect, mode))
            .filter(|r| {
                let c = r.rect.center();
                let (dx, dy) = (p.x - c.x, p.y - c.y);
                dx * dx + dy * dy <= radius_sq
            })
            .map(|r| r.id)
            .collect()
    }

    /// Replace every targeted cell with its children, coloring each child through `sample`.
    ///
    /// Unknown or terminal ids are skipped. Returns how many cells were replaced.
    pub fn split(
        &mut self,
        targets: &[RectId],
        mode: SplitMode,
        mut sample: impl FnMut(CellRect) -> Rgb8,
    ) -> usize {
        let wanted: HashSet<RectId> = targets.iter().copied().collect();
        if wanted.is_empty() {
            return 0;
        }
        let (selected, kept): (Vec<SplitRect>, Vec<SplitRect>) = std::mem::take(&mut self.rects)
            .into_iter()
            .partition(|r| wanted.contains(&r.id) && is_splittable(r.rect, mode));
        self.rects = kept;

        for parent in &selected {
            for child in split_children(parent.rect, mode) {
                let id = RectId(self.next_id);
                self.next_id += 1;
                self.rects.push(SplitRect {
                    id,
                    rect: child,
                    color: sample(child),
                });
            }
        }
        selected.len()
    }
}

/// Clear the canvas and fill every cell with its color.
pub fn paint_partition(canvas: &mut PixelCanvas, partition: &Partition) {
    canvas.clear();
    for cell in partition.rects() {
        canvas.fill_rect(cell.rect, cell.color.to_rgba8());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/partition.rs"]
mod tests;
