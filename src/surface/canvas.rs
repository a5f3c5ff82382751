use crate::foundation::core::{CellRect, PixelSize, Rgba8};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA8 pixel context backed by a `vello_cpu` pixmap.
///
/// Mirrors the small subset of a 2D canvas context the effects need: resize (which clears and
/// resets the translation), translate, clear/fill rectangles and single-row image blits.
pub struct PixelCanvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    origin: (i64, i64),
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &self.origin)
            .finish()
    }
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> FxResult<Self> {
        let (w, h) = checked_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            origin: (0, 0),
        })
    }

    /// Reallocate to `width` x `height`. Like assigning a canvas size, this clears every pixel
    /// and resets the translation even when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> FxResult<()> {
        let (w, h) = checked_dims(width, height)?;
        self.width = w;
        self.height = h;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.origin = (0, 0);
        Ok(())
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(u32::from(self.width), u32::from(self.height))
    }

    /// Accumulate a translation applied to every subsequent draw/clear call.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.origin.0 += i64::from(dx);
        self.origin.1 += i64::from(dy);
    }

    pub fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    /// Clear a rectangle given in translated coordinates; out-of-bounds parts are clipped.
    pub fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let Some((x0, x1, y0, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let stride = usize::from(self.width) * 4;
        let data = self.pixmap.data_as_u8_slice_mut();
        for row in y0..y1 {
            data[row * stride + x0 * 4..row * stride + x1 * 4].fill(0);
        }
    }

    /// Fill a rectangle (translated coordinates) with an opaque-or-not straight color,
    /// replacing the covered pixels.
    pub fn fill_rect(&mut self, rect: CellRect, color: Rgba8) {
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            i32::try_from(rect.x),
            i32::try_from(rect.y),
            i32::try_from(rect.width),
            i32::try_from(rect.height),
        ) else {
            return;
        };
        let Some((x0, x1, y0, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        let premul = color.premultiplied();
        let stride = usize::from(self.width) * 4;
        let data = self.pixmap.data_as_u8_slice_mut();
        for row in y0..y1 {
            for px in data[row * stride + x0 * 4..row * stride + x1 * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&premul);
            }
        }
    }

    /// Composite one full-width row of `src` (row `src_row`) source-over at `(dx, dy)` in
    /// translated coordinates.
    pub fn draw_row(&mut self, src: &vello_cpu::Pixmap, src_row: u32, dx: i32, dy: i32) {
        let src_w = usize::from(src.width());
        if src_row >= u32::from(src.height()) || src_w == 0 {
            return;
        }
        let Ok(w) = i32::try_from(src_w) else {
            return;
        };
        let Some((x0, x1, y0, y1)) = self.clip(dx, dy, w, 1) else {
            return;
        };
        debug_assert_eq!(y1, y0 + 1);

        let dest_left = self.origin.0 + i64::from(dx);
        let src_skip = (x0 as i64 - dest_left) as usize;
        let src_stride = src_w * 4;
        let src_start = src_row as usize * src_stride + src_skip * 4;
        let src_bytes = &src.data_as_u8_slice()[src_start..src_start + (x1 - x0) * 4];

        let stride = usize::from(self.width) * 4;
        let dst = &mut self.pixmap.data_as_u8_slice_mut()[y0 * stride + x0 * 4..y0 * stride + x1 * 4];
        for (d, s) in dst.chunks_exact_mut(4).zip(src_bytes.chunks_exact(4)) {
            let sa = s[3];
            if sa == 255 {
                d.copy_from_slice(s);
                continue;
            }
            if sa == 0 {
                continue;
            }
            let inv = 255 - u16::from(sa);
            for c in 0..4 {
                d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
            }
        }
    }

    /// Premultiplied RGBA bytes at device coordinates (ignores translation).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let i = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.pixmap.data_as_u8_slice();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixmap(&self) -> &vello_cpu::Pixmap {
        &self.pixmap
    }

    /// Un-premultiplied copy of the pixel data, suitable for PNG encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.pixmap.data_as_u8_slice().to_vec();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    fn clip(&self, x: i32, y: i32, width: i32, height: i32) -> Option<(usize, usize, usize, usize)> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let left = self.origin.0 + i64::from(x);
        let top = self.origin.1 + i64::from(y);
        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = (left + i64::from(width)).min(i64::from(self.width));
        let y1 = (top + i64::from(height)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, x1 as usize, y0 as usize, y1 as usize))
    }
}

fn checked_dims(width: u32, height: u32) -> FxResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(FxError::surface(format!(
            "canvas dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| FxError::surface("canvas width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FxError::surface("canvas height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/surface/canvas.rs"]
mod tests;
