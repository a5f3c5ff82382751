use crate::foundation::core::{PixelSize, Point, Rect};
use crate::foundation::error::FxResult;
use crate::foundation::math::UniformSource;
use crate::surface::PixelCanvas;
use crate::text::GlyphBuffer;

/// Maximum horizontal scanline displacement at intensity 1.
pub const FUZZ_RANGE_PX: i32 = 30;
/// Horizontal room reserved on each side of the glyph buffer for displaced rows.
pub const SURFACE_MARGIN_X: u32 = 50;
/// Vertical room reserved above and below the glyph buffer.
pub const SURFACE_MARGIN_Y: u32 = 0;

/// Horizontal offset of one scanline: `floor(intensity * (u - 0.5) * range)`.
///
/// `floor` is kept deliberately: negative offsets round one pixel further left than positive
/// ones round right.
pub fn row_displacement(intensity: f64, u: f64) -> i32 {
    (intensity * (u - 0.5) * f64::from(FUZZ_RANGE_PX)).floor() as i32
}

/// Visible surface size for a glyph buffer: the buffer plus the fixed margins.
pub fn surface_size_for(glyphs: &GlyphBuffer) -> PixelSize {
    let size = glyphs.size();
    PixelSize::new(
        size.width + 2 * SURFACE_MARGIN_X,
        size.height + 2 * SURFACE_MARGIN_Y,
    )
}

/// Ink box of the buffer in visible-surface coordinates, used for hover hit testing.
pub fn interactive_region(glyphs: &GlyphBuffer) -> Rect {
    let left = f64::from(SURFACE_MARGIN_X + glyphs.x_offset());
    let top = f64::from(SURFACE_MARGIN_Y);
    Rect::new(
        left,
        top,
        left + f64::from(glyphs.bounding_width()),
        top + f64::from(glyphs.size().height),
    )
}

/// Boundary-inclusive point-in-rectangle test.
pub fn region_contains(region: Rect, p: Point) -> bool {
    p.x >= region.x0 && p.x <= region.x1 && p.y >= region.y0 && p.y <= region.y1
}

/// Size the canvas for `glyphs` and move its origin inside the margins.
pub fn prepare_surface(canvas: &mut PixelCanvas, glyphs: &GlyphBuffer) -> FxResult<()> {
    let size = surface_size_for(glyphs);
    canvas.resize(size.width, size.height)?;
    canvas.translate(SURFACE_MARGIN_X as i32, SURFACE_MARGIN_Y as i32);
    Ok(())
}

/// Paint one fuzz frame onto a canvas prepared by [`prepare_surface`].
///
/// Clears the glyph area grown by the fuzz range, then copies every buffer row at an
/// independently sampled offset.
pub fn paint_fuzz_frame(
    canvas: &mut PixelCanvas,
    glyphs: &GlyphBuffer,
    intensity: f64,
    rng: &mut dyn UniformSource,
) {
    let size = glyphs.size();
    let (w, h) = (size.width as i32, size.height as i32);
    canvas.clear_rect(
        -FUZZ_RANGE_PX,
        -FUZZ_RANGE_PX,
        w + 2 * FUZZ_RANGE_PX,
        h + 2 * FUZZ_RANGE_PX,
    );
    for row in 0..size.height {
        let dx = row_displacement(intensity, rng.next_unit());
        canvas.draw_row(glyphs.pixmap(), row, dx, row as i32);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fuzz/frame.rs"]
mod tests;
