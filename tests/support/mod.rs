use canvasfx::{FxResult, GLYPH_PADDING_PX, GlyphBuffer, GlyphRasterizer, GlyphRequest, InkBounds};

/// Rasterizes each character as an 8x10 opaque block; no font files needed.
#[derive(Default)]
pub struct BlockGlyphs {
    pub rasterized: Vec<String>,
}

impl GlyphRasterizer for BlockGlyphs {
    fn fonts_ready(&self) -> bool {
        true
    }

    fn rasterize(&mut self, req: &GlyphRequest) -> FxResult<GlyphBuffer> {
        self.rasterized.push(req.text.clone());
        let chars = req.text.chars().count() as f32;
        let ink = if chars == 0.0 {
            InkBounds::nominal(0.0, req.size_px)
        } else {
            InkBounds {
                left: 0.0,
                right: 8.0 * chars,
                ascent: 8.0,
                descent: 2.0,
            }
        };
        let mut buf = GlyphBuffer::allocate(ink, GLYPH_PADDING_PX)?;
        if chars > 0.0 {
            let width = usize::from(buf.pixmap().width());
            let height = usize::from(buf.pixmap().height());
            let x0 = buf.x_offset() as usize;
            let x1 = x0 + buf.bounding_width() as usize;
            let px = req.color.premultiplied();
            let data = buf.pixmap_mut().data_as_u8_slice_mut();
            for row in 0..height {
                for x in x0..x1 {
                    let i = (row * width + x) * 4;
                    data[i..i + 4].copy_from_slice(&px);
                }
            }
        }
        Ok(buf)
    }
}
