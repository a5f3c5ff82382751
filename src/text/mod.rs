//! Text styling, ink measurement and glyph buffers.

mod engine;
mod glyphs;
mod style;

pub use engine::TextEngine;
pub use glyphs::{GLYPH_PADDING_PX, GlyphBuffer, GlyphRasterizer, GlyphRequest, InkBounds};
pub use style::{
    FontSize, FontSlant, FontWeight, StaticStyleResolver, StyleResolver, TextStyle,
    eval_css_length, resolve_font_family, resolve_font_px,
};
