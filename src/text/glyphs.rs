use crate::foundation::core::{PixelSize, Rgba8};
use crate::foundation::error::{FxError, FxResult};
use crate::text::style::{FontSlant, FontWeight};

/// Horizontal padding added around the ink box of every glyph buffer, split evenly per side.
pub const GLYPH_PADDING_PX: u32 = 40;

/// Ink extents of a text run relative to its pen origin on the alphabetic baseline.
///
/// `left` grows to the left of the origin, `right` to the right, `ascent` above the baseline and
/// `descent` below it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InkBounds {
    pub left: f32,
    pub right: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl InkBounds {
    /// Nominal extents used when the run has no measurable ink (empty or whitespace-only text).
    pub fn nominal(advance: f32, font_px: f32) -> Self {
        Self {
            left: 0.0,
            right: advance.max(0.0),
            ascent: font_px,
            descent: font_px * 0.2,
        }
    }

    pub fn bounding_width(&self) -> u32 {
        (self.left + self.right).ceil().max(0.0) as u32
    }

    pub fn tight_height(&self) -> u32 {
        (self.ascent + self.descent).ceil().max(0.0) as u32
    }
}

/// A fully resolved rasterization request: no `inherit`, no relative sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRequest {
    pub text: String,
    pub family: String,
    pub size_px: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub color: Rgba8,
}

/// Font readiness plus ink measurement and drawing of a text run into a [`GlyphBuffer`].
pub trait GlyphRasterizer {
    /// Whether fonts are loaded and usable for measurement.
    fn fonts_ready(&self) -> bool;

    /// Measure the ink box of `req` and draw it into a freshly allocated buffer.
    fn rasterize(&mut self, req: &GlyphRequest) -> FxResult<GlyphBuffer>;
}

/// Offscreen premultiplied pixels holding rasterized text, immutable once published.
///
/// The buffer is `bounding_width + padding` wide and `tight_height` tall; the ink-left edge
/// sits at `x_offset = padding / 2` and the baseline at `ink.ascent`.
pub struct GlyphBuffer {
    pixmap: vello_cpu::Pixmap,
    ink: InkBounds,
    x_offset: u32,
}

impl std::fmt::Debug for GlyphBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphBuffer")
            .field("size", &self.size())
            .field("ink", &self.ink)
            .field("x_offset", &self.x_offset)
            .finish()
    }
}

impl GlyphBuffer {
    /// Allocate a transparent buffer sized for `ink` plus `padding`.
    pub fn allocate(ink: InkBounds, padding: u32) -> FxResult<Self> {
        let width = ink.bounding_width() + padding;
        let height = ink.tight_height();
        if width == 0 || height == 0 {
            return Err(FxError::font(format!(
                "glyph buffer would be empty ({width}x{height})"
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| FxError::font("glyph buffer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| FxError::font("glyph buffer height exceeds u16"))?;
        Ok(Self {
            pixmap: vello_cpu::Pixmap::new(w, h),
            ink,
            x_offset: padding / 2,
        })
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(
            u32::from(self.pixmap.width()),
            u32::from(self.pixmap.height()),
        )
    }

    pub fn ink(&self) -> InkBounds {
        self.ink
    }

    pub fn x_offset(&self) -> u32 {
        self.x_offset
    }

    pub fn bounding_width(&self) -> u32 {
        self.ink.bounding_width()
    }

    pub fn pixmap(&self) -> &vello_cpu::Pixmap {
        &self.pixmap
    }

    /// Mutable pixels; only meaningful before the buffer is published.
    pub fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }
}
