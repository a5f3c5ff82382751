use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{CellRect, PixelSize, Rgb8};
use crate::foundation::error::{FxError, FxResult};

/// Color used when a cell maps to no in-bounds samples.
pub const FALLBACK_COLOR: Rgb8 = Rgb8::BLACK;

/// Read-only native-resolution pixels of the source image (straight RGBA8).
#[derive(Clone, Debug)]
pub struct SourceSamples {
    width: u32,
    height: u32,
    rgba8: Arc<[u8]>,
}

impl SourceSamples {
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> FxResult<Self> {
        if width == 0 || height == 0 {
            return Err(FxError::decode("image has zero size"));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(FxError::decode(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: rgba8.into(),
        })
    }

    /// Decode encoded image bytes (any format the `image` crate recognizes).
    pub fn decode(bytes: &[u8]) -> FxResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| FxError::decode(format!("decode image: {e}")))?
            .to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.into_raw())
    }

    pub fn open(path: &Path) -> FxResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Average color of a canvas-space cell, sampled from the image at an adaptive stride.
    ///
    /// The cell is scaled into image space per axis (`image / canvas`); samples that land outside
    /// the image are skipped. A positive canvas extent always covers at least one image sample
    /// so upscaled renders never average over nothing.
    pub fn average_color(&self, cell: CellRect, canvas: PixelSize) -> Rgb8 {
        if cell.width == 0 || cell.height == 0 || canvas.is_empty() {
            return FALLBACK_COLOR;
        }
        let sx = f64::from(self.width) / f64::from(canvas.width);
        let sy = f64::from(self.height) / f64::from(canvas.height);

        let x0 = (f64::from(cell.x) * sx).floor() as u64;
        let y0 = (f64::from(cell.y) * sy).floor() as u64;
        let w = ((f64::from(cell.width) * sx).floor() as u64).max(1);
        let h = ((f64::from(cell.height) * sy).floor() as u64).max(1);
        let step = sample_stride(w * h);

        let (img_w, img_h) = (u64::from(self.width), u64::from(self.height));
        let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
        for py in (y0..y0 + h).step_by(step) {
            if py >= img_h {
                break;
            }
            for px in (x0..x0 + w).step_by(step) {
                if px >= img_w {
                    break;
                }
                let i = ((py * img_w + px) * 4) as usize;
                r += u64::from(self.rgba8[i]);
                g += u64::from(self.rgba8[i + 1]);
                b += u64::from(self.rgba8[i + 2]);
                count += 1;
            }
        }

        if count == 0 {
            return FALLBACK_COLOR;
        }
        Rgb8::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }
}

/// Sample stride for an image-space area: coarser for large regions, finer near detail.
pub fn sample_stride(area: u64) -> usize {
    if area > 10_000 {
        8
    } else if area > 2_500 {
        4
    } else {
        2
    }
}

/// Render size fitting `image` inside `max` with the image's aspect ratio.
///
/// The axis along which the image is relatively wider than the box is pinned to the box; the
/// other follows the aspect ratio. Results are rounded to whole pixels, minimum 1.
pub fn fit_within(image: PixelSize, max: PixelSize) -> PixelSize {
    if image.is_empty() || max.is_empty() {
        return PixelSize::new(max.width.max(1), max.height.max(1));
    }
    let img_aspect = f64::from(image.width) / f64::from(image.height);
    let max_aspect = f64::from(max.width) / f64::from(max.height);
    let (w, h) = if img_aspect > max_aspect {
        (f64::from(max.width), f64::from(max.width) / img_aspect)
    } else {
        (f64::from(max.height) * img_aspect, f64::from(max.height))
    };
    PixelSize::new(
        (w.round() as u32).max(1),
        (h.round() as u32).max(1),
    )
}
