use std::sync::Arc;

use crate::clock::{FrameRequestId, FrameScheduler};
use crate::foundation::color::parse_css_color;
use crate::foundation::core::Rect;
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::{Rng64, UniformSource};
use crate::fuzz::config::{FuzzMotion, FuzzyTextConfig, validate_style};
use crate::fuzz::frame::{interactive_region, paint_fuzz_frame, prepare_surface, region_contains};
use crate::surface::{PointerEvent, PointerResponse, Surface, client_to_local};
use crate::text::{
    GlyphBuffer, GlyphRasterizer, GlyphRequest, StyleResolver, TextStyle, resolve_font_family,
    resolve_font_px,
};

const DEFAULT_SEED: u64 = 0x5EED_F022;

/// Proof that a glyph-buffer initialization was requested for a specific content generation.
///
/// Hand it back to [`TextFuzzRenderer::complete_init`] once fonts are ready; a ticket issued
/// before a later content change (or teardown) is stale and is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitTicket {
    generation: u64,
}

/// Continuously repaints text with per-scanline horizontal jitter.
pub struct TextFuzzRenderer {
    style: TextStyle,
    motion: FuzzMotion,
    generation: u64,
    pending_init: Option<InitTicket>,
    glyphs: Option<Arc<GlyphBuffer>>,
    revision: u64,
    frame: Option<FrameRequestId>,
    region: Option<Rect>,
    listening: bool,
    hovering: bool,
    on_hover_change: Option<Box<dyn FnMut(bool)>>,
    rng: Box<dyn UniformSource>,
}

impl std::fmt::Debug for TextFuzzRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFuzzRenderer")
            .field("style", &self.style)
            .field("motion", &self.motion)
            .field("generation", &self.generation)
            .field("revision", &self.revision)
            .field("running", &self.frame.is_some())
            .field("hovering", &self.hovering)
            .finish()
    }
}

impl TextFuzzRenderer {
    /// Validate `config` and stage the first initialization (see [`Self::pending_init`]).
    pub fn new(config: FuzzyTextConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            style: config.style(),
            motion: config.motion(),
            generation: 1,
            pending_init: Some(InitTicket { generation: 1 }),
            glyphs: None,
            revision: 0,
            frame: None,
            region: None,
            listening: false,
            hovering: false,
            on_hover_change: None,
            rng: Box::new(Rng64::new(DEFAULT_SEED)),
        })
    }

    /// Replace the jitter source.
    pub fn with_rng(mut self, rng: impl UniformSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Register the hover notification, fired once per enter/leave transition.
    pub fn on_hover_change(&mut self, f: impl FnMut(bool) + 'static) {
        self.on_hover_change = Some(Box::new(f));
    }

    /// Update content-affecting attributes.
    ///
    /// Returns a fresh ticket when the style differs from the current one, superseding any
    /// pending initialization. The current buffer keeps animating until the new one lands.
    pub fn set_style(&mut self, style: TextStyle) -> FxResult<Option<InitTicket>> {
        validate_style(&style)?;
        if style == self.style {
            return Ok(None);
        }
        self.style = style;
        self.generation += 1;
        let ticket = InitTicket {
            generation: self.generation,
        };
        self.pending_init = Some(ticket);
        tracing::debug!(generation = self.generation, "text style changed");
        Ok(Some(ticket))
    }

    /// Update hover/intensity options. Never touches the glyph buffer.
    pub fn set_motion(&mut self, motion: FuzzMotion) -> FxResult<()> {
        motion.validate()?;
        self.motion = motion;
        if !motion.enable_hover {
            self.listening = false;
            self.hovering = false;
        } else if self.frame.is_some() {
            self.listening = true;
        }
        Ok(())
    }

    pub fn pending_init(&self) -> Option<InitTicket> {
        self.pending_init
    }

    /// Finish an initialization once the font system reports readiness.
    ///
    /// Resolves family and size, rasterizes the glyph buffer, publishes it and (re)starts the
    /// frame loop. Returns `false` when the ticket is stale, fonts are not ready yet (the ticket
    /// stays pending) or any step fails (logged, nothing drawn).
    #[tracing::instrument(skip_all, fields(generation = ticket.generation))]
    pub fn complete_init(
        &mut self,
        ticket: InitTicket,
        rasterizer: &mut dyn GlyphRasterizer,
        styles: &dyn StyleResolver,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if self.pending_init != Some(ticket) {
            tracing::trace!("discarding stale glyph initialization");
            return false;
        }
        if !rasterizer.fonts_ready() {
            tracing::trace!("fonts not ready; keeping initialization pending");
            return false;
        }
        self.pending_init = None;

        let buffer = match self
            .glyph_request(styles)
            .and_then(|req| rasterizer.rasterize(&req))
        {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::warn!(%err, "fuzzy text initialization failed");
                return false;
            }
        };

        self.glyphs = Some(Arc::new(buffer));
        self.revision += 1;
        self.restart_loop(surface, frames);
        true
    }

    /// Service a display-refresh callback. Ignores handles other than the pending one.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        if self.frame != Some(id) {
            return false;
        }
        self.frame = None;
        let Some(glyphs) = self.glyphs.clone() else {
            return false;
        };

        let intensity = self.current_intensity();
        match surface.context() {
            Some(canvas) => paint_fuzz_frame(canvas, &glyphs, intensity, self.rng.as_mut()),
            None => tracing::trace!("rendering context unavailable; skipping frame"),
        }
        self.frame = Some(frames.request_frame());
        true
    }

    /// Deliver a pointer/touch event. Ignored entirely while hover is disabled.
    pub fn handle_pointer(&mut self, event: PointerEvent, surface: &dyn Surface) -> PointerResponse {
        if !self.listening {
            return PointerResponse::ignored();
        }
        match event {
            PointerEvent::MouseMove { client } => {
                let local = client_to_local(client, surface.client_rect());
                let inside = self.region.is_some_and(|r| region_contains(r, local));
                self.set_hovering(inside);
                PointerResponse::handled()
            }
            PointerEvent::TouchMove { client } => {
                let local = client_to_local(client, surface.client_rect());
                let inside = self.region.is_some_and(|r| region_contains(r, local));
                self.set_hovering(inside);
                PointerResponse {
                    handled: true,
                    prevent_default: true,
                }
            }
            PointerEvent::MouseLeave | PointerEvent::TouchEnd => {
                self.set_hovering(false);
                PointerResponse::handled()
            }
        }
    }

    /// Stop animating and detach listeners. Safe to call repeatedly or before starting.
    pub fn teardown(&mut self, frames: &mut dyn FrameScheduler) {
        if let Some(id) = self.frame.take() {
            frames.cancel_frame(id);
        }
        self.pending_init = None;
        self.listening = false;
        self.hovering = false;
    }

    pub fn glyphs(&self) -> Option<&Arc<GlyphBuffer>> {
        self.glyphs.as_ref()
    }

    /// Number of glyph buffers published so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn interactive_region(&self) -> Option<Rect> {
        self.region
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn motion(&self) -> FuzzMotion {
        self.motion
    }

    pub fn current_intensity(&self) -> f64 {
        if self.hovering {
            self.motion.hover_intensity
        } else {
            self.motion.base_intensity
        }
    }

    fn glyph_request(&self, styles: &dyn StyleResolver) -> FxResult<GlyphRequest> {
        let family = resolve_font_family(&self.style.font_family, styles);
        let size_px = resolve_font_px(&self.style.font_size, styles).ok_or_else(|| {
            FxError::font(format!(
                "could not resolve font size {:?}",
                self.style.font_size
            ))
        })?;
        Ok(GlyphRequest {
            text: self.style.text.clone(),
            family,
            size_px,
            weight: self.style.font_weight,
            slant: self.style.font_slant,
            color: parse_css_color(&self.style.color)?,
        })
    }

    fn restart_loop(&mut self, surface: &mut dyn Surface, frames: &mut dyn FrameScheduler) {
        if let Some(id) = self.frame.take() {
            frames.cancel_frame(id);
        }
        self.listening = false;

        let Some(glyphs) = self.glyphs.clone() else {
            return;
        };
        let Some(canvas) = surface.context() else {
            tracing::debug!("rendering context unavailable; fuzzy text will not render");
            return;
        };
        if let Err(err) = prepare_surface(canvas, &glyphs) {
            tracing::warn!(%err, "could not size fuzzy text surface");
            return;
        }

        self.region = Some(interactive_region(&glyphs));
        self.listening = self.motion.enable_hover;
        if !self.listening {
            self.hovering = false;
        }

        let intensity = self.current_intensity();
        paint_fuzz_frame(canvas, &glyphs, intensity, self.rng.as_mut());
        self.frame = Some(frames.request_frame());
        tracing::debug!(revision = self.revision, "fuzz loop started");
    }

    fn set_hovering(&mut self, hovering: bool) {
        if self.hovering == hovering {
            return;
        }
        self.hovering = hovering;
        if let Some(cb) = self.on_hover_change.as_mut() {
            cb(hovering);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fuzz/renderer.rs"]
mod tests;
