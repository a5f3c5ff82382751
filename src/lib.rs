//! canvasfx is a set of pixel-surface effects driven by an injected frame clock and pointer stream.
//!
//! Three building blocks share one contract: own a drawing surface, react to display-refresh
//! callbacks and react to pointer/touch events.
//!
//! - [`TextFuzzRenderer`]: text rasterized once into a [`GlyphBuffer`], then repainted every
//!   frame with each scanline shifted horizontally by a random offset.
//! - [`RasterSplitRevealer`]: an image shown as a mosaic of averaged-color cells that subdivide
//!   under the pointer until the true pixels appear.
//! - [`TypewriterDriver`]: a timer-driven typing/deleting prefix of one or more phrases, and
//!   [`FuzzyTypewriter`] which renders it through the fuzz effect.
//!
//! Nothing here owns a thread, a timer or a font system. Hosts implement [`FrameScheduler`],
//! [`TimerQueue`], [`Surface`], [`GlyphRasterizer`] and [`StyleResolver`] (or use the bundled
//! [`ManualFrameClock`], [`ManualTimers`], [`HeadlessSurface`], [`TextEngine`] and
//! [`StaticStyleResolver`]) and deliver callbacks by handle. Asynchronous work (font readiness,
//! image decode) is represented by tickets; completing a superseded ticket is a no-op.
//!
//! Pixels are premultiplied RGBA8 end-to-end.
#![forbid(unsafe_code)]

mod clock;
mod foundation;
mod fuzz;
mod raster;
mod surface;
mod text;
mod typewriter;

pub use clock::{FrameRequestId, FrameScheduler, ManualFrameClock, ManualTimers, TimerId, TimerQueue};
pub use foundation::color::parse_css_color;
pub use foundation::config::{from_json_str, from_path};
pub use foundation::core::{CellRect, PixelSize, Point, Rect, Rgb8, Rgba8, Vec2};
pub use foundation::error::{FxError, FxResult};
pub use foundation::math::{FixedUniform, Rng64, UniformSource};
pub use fuzz::{
    FUZZ_RANGE_PX, FuzzMotion, FuzzyTextConfig, InitTicket, SURFACE_MARGIN_X, SURFACE_MARGIN_Y,
    TextFuzzRenderer, interactive_region, paint_fuzz_frame, prepare_surface, region_contains,
    row_displacement, surface_size_for,
};
pub use raster::{
    FALLBACK_COLOR, LoadTicket, Partition, RasterSplitConfig, RasterSplitRevealer, RectId,
    SourceSamples, SplitChildren, SplitMode, SplitOutcome, SplitRect, fit_within, is_splittable,
    paint_partition, sample_stride, split_children,
};
pub use surface::{
    HeadlessSurface, PixelCanvas, PointerEvent, PointerResponse, Surface, client_to_local,
    client_to_scaled,
};
pub use text::{
    FontSize, FontSlant, FontWeight, GLYPH_PADDING_PX, GlyphBuffer, GlyphRasterizer, GlyphRequest,
    InkBounds, StaticStyleResolver, StyleResolver, TextEngine, TextStyle, eval_css_length,
    resolve_font_family, resolve_font_px,
};
pub use typewriter::{
    FuzzyTypewriter, FuzzyTypewriterConfig, NextTick, PhraseCompleted, Phrases, Step,
    TypewriterConfig, TypewriterDriver, TypingPhase, TypingState, VariableSpeed,
};
