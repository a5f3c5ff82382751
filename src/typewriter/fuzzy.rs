use crate::clock::{FrameRequestId, FrameScheduler, TimerId, TimerQueue};
use crate::foundation::error::FxResult;
use crate::fuzz::{InitTicket, TextFuzzRenderer};
use crate::surface::Surface;
use crate::text::{GlyphRasterizer, StyleResolver};
use crate::typewriter::config::FuzzyTypewriterConfig;
use crate::typewriter::driver::TypewriterDriver;

/// A typewriter whose displayed prefix (plus cursor) is rendered as fuzzy text.
///
/// Every visible text change restyles the inner renderer, so each tick yields a fresh
/// [`InitTicket`] the host completes once fonts are ready.
#[derive(Debug)]
pub struct FuzzyTypewriter {
    config: FuzzyTypewriterConfig,
    driver: TypewriterDriver,
    renderer: TextFuzzRenderer,
}

impl FuzzyTypewriter {
    pub fn new(config: FuzzyTypewriterConfig) -> FxResult<Self> {
        config.validate()?;
        let driver = TypewriterDriver::new(config.typewriter.clone())?;
        let renderer = TextFuzzRenderer::new(config.fuzz_config(config.decorate(driver.displayed())))?;
        Ok(Self {
            config,
            driver,
            renderer,
        })
    }

    pub fn on_phrase_complete(&mut self, f: impl FnMut(&str, usize) + 'static) {
        self.driver.on_phrase_complete(f);
    }

    pub fn start(&mut self, timers: &mut dyn TimerQueue) -> bool {
        self.driver.start(timers)
    }

    pub fn set_visible(&mut self, visible: bool, timers: &mut dyn TimerQueue) -> bool {
        self.driver.set_visible(visible, timers)
    }

    /// Advance the typewriter; returns the ticket for re-rasterizing changed text.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        timers: &mut dyn TimerQueue,
    ) -> FxResult<Option<InitTicket>> {
        if !self.driver.on_timer(id, timers) {
            return Ok(None);
        }
        self.sync_text()
    }

    /// Apply new options. Timing changes restart the sequence; style changes restyle in place.
    pub fn reconfigure(
        &mut self,
        config: FuzzyTypewriterConfig,
        timers: &mut dyn TimerQueue,
    ) -> FxResult<Option<InitTicket>> {
        config.validate()?;
        if config.typewriter != self.config.typewriter {
            self.driver.reconfigure(config.typewriter.clone(), timers)?;
        }
        let fuzz = config.fuzz_config(config.decorate(self.driver.displayed()));
        self.config = config;
        self.renderer.set_motion(fuzz.motion())?;
        self.renderer.set_style(fuzz.style())
    }

    pub fn complete_init(
        &mut self,
        ticket: InitTicket,
        rasterizer: &mut dyn GlyphRasterizer,
        styles: &dyn StyleResolver,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        self.renderer
            .complete_init(ticket, rasterizer, styles, surface, frames)
    }

    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) -> bool {
        self.renderer.on_frame(id, surface, frames)
    }

    pub fn teardown(&mut self, timers: &mut dyn TimerQueue, frames: &mut dyn FrameScheduler) {
        self.driver.teardown(timers);
        self.renderer.teardown(frames);
    }

    /// Text currently handed to the renderer, cursor included.
    pub fn text(&self) -> &str {
        &self.renderer.style().text
    }

    pub fn driver(&self) -> &TypewriterDriver {
        &self.driver
    }

    pub fn renderer(&self) -> &TextFuzzRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TextFuzzRenderer {
        &mut self.renderer
    }

    fn sync_text(&mut self) -> FxResult<Option<InitTicket>> {
        let mut style = self.renderer.style().clone();
        style.text = self.config.decorate(self.driver.displayed());
        self.renderer.set_style(style)
    }
}
