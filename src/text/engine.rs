use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{FxError, FxResult};
use crate::text::glyphs::{GLYPH_PADDING_PX, GlyphBuffer, GlyphRasterizer, GlyphRequest, InkBounds};
use crate::text::style::FontSlant;

/// Parley-shaped, `vello_cpu`-rasterized text backed by explicitly registered font files.
///
/// Fonts are "ready" once at least one face has been registered; until then
/// [`GlyphRasterizer::rasterize`] refuses to measure anything. Faces sharing a family are
/// told apart by Parley's weight/slant matching, and every glyph run is drawn with the face
/// Parley resolved for it.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    families: Vec<String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Construct an engine with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
        }
    }

    /// Register raw font bytes and return the detected family name.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> FxResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| FxError::font("no font families registered from font bytes"))?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FxError::font("registered font family has no name"))?
            .to_string();

        tracing::debug!(%family, "registered font");
        if !self.families.contains(&family) {
            self.families.push(family.clone());
        }
        Ok(family)
    }

    /// Read and register one font file.
    pub fn register_font_file(&mut self, path: &Path) -> FxResult<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        self.register_font(bytes)
    }

    /// Register every `.ttf`/`.otf`/`.ttc` file directly inside `dir`; unreadable files are
    /// skipped. Returns the number of faces registered.
    pub fn load_fonts_from_dir(&mut self, dir: &Path) -> usize {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return 0;
        };

        let mut loaded = 0;
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            match self.register_font_file(&path) {
                Ok(_) => loaded += 1,
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping font"),
            }
        }
        loaded
    }

    /// Distinct registered family names, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(String::as_str)
    }

    /// First registered family named by a CSS family list; generic or unknown families fall
    /// back to the first registered family.
    fn family_for(&self, family_list: &str) -> Option<&str> {
        for name in family_list.split(',') {
            let name = name.trim().trim_matches(|c| c == '"' || c == '\'');
            if let Some(family) = self
                .families
                .iter()
                .find(|f| f.eq_ignore_ascii_case(name))
            {
                return Some(family);
            }
        }
        self.families.first().map(String::as_str)
    }

    fn layout(&mut self, req: &GlyphRequest, family: &str) -> parley::Layout<Rgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &req.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(req.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(req.weight.0)),
        ));
        builder.push_default(parley::style::StyleProperty::FontStyle(match req.slant {
            FontSlant::Normal => parley::style::FontStyle::Normal,
            FontSlant::Italic => parley::style::FontStyle::Italic,
            FontSlant::Oblique => parley::style::FontStyle::Oblique(None),
        }));
        builder.push_default(parley::style::StyleProperty::Brush(req.color));

        let mut layout: parley::Layout<Rgba8> = builder.build(&req.text);
        layout.break_all_lines(None);
        layout
    }
}

impl GlyphRasterizer for TextEngine {
    fn fonts_ready(&self) -> bool {
        !self.families.is_empty()
    }

    #[tracing::instrument(skip(self, req), fields(chars = req.text.chars().count(), size_px = req.size_px))]
    fn rasterize(&mut self, req: &GlyphRequest) -> FxResult<GlyphBuffer> {
        if !req.size_px.is_finite() || req.size_px <= 0.0 {
            return Err(FxError::validation("font size must be finite and > 0"));
        }
        let family = self
            .family_for(&req.family)
            .ok_or_else(|| FxError::font("no fonts registered"))?
            .to_string();

        let layout = self.layout(req, &family);
        let baseline = first_baseline(&layout);
        let ink = match baseline {
            Some(baseline) => measure_ink(&layout, baseline, req.size_px)?
                .unwrap_or_else(|| InkBounds::nominal(layout.width(), req.size_px)),
            None => InkBounds::nominal(layout.width(), req.size_px),
        };

        let mut buffer = GlyphBuffer::allocate(ink, GLYPH_PADDING_PX)?;
        let size = buffer.size();
        let pen_x = f64::from(buffer.x_offset()) + f64::from(ink.left);
        let shift_y = f64::from(ink.ascent) - f64::from(baseline.unwrap_or(ink.ascent));

        let mut ctx = vello_cpu::RenderContext::new(size.width as u16, size.height as u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((pen_x, shift_y)));
        fill_layout(&mut ctx, &layout);
        ctx.flush();
        ctx.render_to_pixmap(buffer.pixmap_mut());

        tracing::debug!(family = %family, ?ink, "rasterized glyph buffer");
        Ok(buffer)
    }
}

fn first_baseline(layout: &parley::Layout<Rgba8>) -> Option<f32> {
    for line in layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                return Some(run.baseline());
            }
        }
    }
    None
}

fn fill_layout(ctx: &mut vello_cpu::RenderContext, layout: &parley::Layout<Rgba8>) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            // Parley may pick a different face per run (weight, slant, fallback).
            ctx.glyph_run(run.run().font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Draw the layout into a generous scratch pixmap and scan coverage for the tight ink box.
/// `None` when nothing was painted.
fn measure_ink(
    layout: &parley::Layout<Rgba8>,
    baseline: f32,
    size_px: f32,
) -> FxResult<Option<InkBounds>> {
    let margin = size_px.ceil() as u32 + 2;
    let width = layout.width().ceil().max(0.0) as u32 + 2 * margin;
    let height = layout.height().ceil().max(0.0) as u32 + 2 * margin;
    let w: u16 = width
        .try_into()
        .map_err(|_| FxError::font("text too wide to measure"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FxError::font("text too tall to measure"))?;

    let mut scratch = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(margin),
        f64::from(margin),
    )));
    // Alpha-only pass: paint color does not matter for coverage.
    fill_layout(&mut ctx, layout);
    ctx.flush();
    ctx.render_to_pixmap(&mut scratch);

    let Some((x0, y0, x1, y1)) = alpha_bounds(scratch.data_as_u8_slice(), width, height) else {
        return Ok(None);
    };

    let origin_x = margin as f32;
    let baseline_y = margin as f32 + baseline;
    Ok(Some(InkBounds {
        left: origin_x - x0 as f32,
        right: x1 as f32 - origin_x,
        ascent: baseline_y - y0 as f32,
        descent: y1 as f32 - baseline_y,
    }))
}

/// Tight `[x0, x1) x [y0, y1)` box of pixels with non-zero alpha.
pub(crate) fn alpha_bounds(rgba: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0u32, 0u32);
    for y in 0..height {
        for x in 0..width {
            let a = rgba[((y * width + x) * 4 + 3) as usize];
            if a == 0 {
                continue;
            }
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x + 1);
            y1 = y1.max(y + 1);
        }
    }
    (x0 != u32::MAX).then_some((x0, y0, x1, y1))
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
