use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::clock::ManualFrameClock;
use crate::foundation::core::{PixelSize, Point, Rgba8};
use crate::foundation::math::FixedUniform;
use crate::fuzz::frame::SURFACE_MARGIN_X;
use crate::surface::HeadlessSurface;
use crate::text::{FontSize, GLYPH_PADDING_PX, InkBounds, StaticStyleResolver};

/// Draws every run as a solid block, 10px per character and 12px tall.
#[derive(Default)]
struct BlockRasterizer {
    not_ready: bool,
    requests: Vec<GlyphRequest>,
}

impl GlyphRasterizer for BlockRasterizer {
    fn fonts_ready(&self) -> bool {
        !self.not_ready
    }

    fn rasterize(&mut self, req: &GlyphRequest) -> FxResult<GlyphBuffer> {
        self.requests.push(req.clone());
        let ink = InkBounds {
            left: 0.0,
            right: 10.0 * req.text.chars().count() as f32,
            ascent: 9.0,
            descent: 3.0,
        };
        let mut buf = GlyphBuffer::allocate(ink, GLYPH_PADDING_PX)?;
        let width = usize::from(buf.pixmap().width());
        let (x0, x1) = (
            buf.x_offset() as usize,
            (buf.x_offset() + buf.bounding_width()) as usize,
        );
        let px = req.color.premultiplied();
        let data = buf.pixmap_mut().data_as_u8_slice_mut();
        for row in 0..12 {
            for x in x0..x1 {
                let i = (row * width + x) * 4;
                data[i..i + 4].copy_from_slice(&px);
            }
        }
        Ok(buf)
    }
}

fn config(text: &str) -> FuzzyTextConfig {
    FuzzyTextConfig {
        text: text.to_string(),
        font_size: FontSize::Px(12.0),
        color: "#ff0000".to_string(),
        ..FuzzyTextConfig::default()
    }
}

struct Harness {
    renderer: TextFuzzRenderer,
    raster: BlockRasterizer,
    styles: StaticStyleResolver,
    surface: HeadlessSurface,
    frames: ManualFrameClock,
}

impl Harness {
    fn new(cfg: FuzzyTextConfig) -> Self {
        Self {
            renderer: TextFuzzRenderer::new(cfg)
                .unwrap()
                .with_rng(FixedUniform(0.5)),
            raster: BlockRasterizer::default(),
            styles: StaticStyleResolver::default(),
            surface: HeadlessSurface::new(PixelSize::new(1, 1)).unwrap(),
            frames: ManualFrameClock::new(),
        }
    }

    fn init(&mut self, ticket: InitTicket) -> bool {
        self.renderer.complete_init(
            ticket,
            &mut self.raster,
            &self.styles,
            &mut self.surface,
            &mut self.frames,
        )
    }

    fn init_pending(&mut self) -> bool {
        let ticket = self.renderer.pending_init().unwrap();
        self.init(ticket)
    }

    fn run_frames(&mut self, n: usize) -> usize {
        let mut serviced = 0;
        for _ in 0..n {
            for id in self.frames.tick() {
                if self
                    .renderer
                    .on_frame(id, &mut self.surface, &mut self.frames)
                {
                    serviced += 1;
                }
            }
        }
        serviced
    }

    fn pointer(&mut self, event: PointerEvent) -> PointerResponse {
        self.renderer.handle_pointer(event, &self.surface)
    }
}

fn inside_point(r: &TextFuzzRenderer) -> Point {
    let region = r.interactive_region().unwrap();
    Point::new(region.x0 + 1.0, region.y0 + 1.0)
}

#[test]
fn init_publishes_buffer_and_starts_loop() {
    let mut h = Harness::new(config("404"));
    assert!(h.init_pending());
    assert_eq!(h.renderer.revision(), 1);
    assert!(h.renderer.is_running());
    assert!(h.renderer.pending_init().is_none());

    let glyphs = h.renderer.glyphs().unwrap().clone();
    assert_eq!(glyphs.size(), PixelSize::new(70, 12));
    let canvas = h.surface.canvas().unwrap();
    assert_eq!(canvas.size(), PixelSize::new(170, 12));
    // Intensity-neutral sample: the first ink column sits at margin + x_offset.
    let home = SURFACE_MARGIN_X + glyphs.x_offset();
    assert_eq!(canvas.pixel(home, 5), Some([255, 0, 0, 255]));
    assert_eq!(canvas.pixel(home - 1, 5), Some([0, 0, 0, 0]));

    assert_eq!(h.run_frames(3), 3);
    assert!(h.renderer.is_running());
}

#[test]
fn family_and_size_are_resolved_before_rasterizing() {
    let mut h = Harness::new(FuzzyTextConfig {
        font_size: "2rem".into(),
        ..config("x")
    });
    h.styles.font_family = Some("Inter".to_string());
    assert!(h.init_pending());
    let req = &h.raster.requests[0];
    assert_eq!(req.family, "Inter");
    assert_eq!(req.size_px, 32.0);
    assert_eq!(req.color, Rgba8::new(255, 0, 0, 255));
}

#[test]
fn hover_notifications_fire_once_per_transition() {
    let mut h = Harness::new(config("ab"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.renderer.on_hover_change(move |v| sink.borrow_mut().push(v));
    h.init_pending();

    let inside = inside_point(&h.renderer);
    h.pointer(PointerEvent::MouseMove { client: inside });
    h.pointer(PointerEvent::MouseMove {
        client: inside + crate::foundation::core::Vec2::new(2.0, 0.0),
    });
    assert!(h.renderer.is_hovering());
    assert_eq!(h.renderer.current_intensity(), 0.5);

    h.pointer(PointerEvent::MouseMove {
        client: Point::new(1.0, 1.0),
    });
    h.pointer(PointerEvent::MouseLeave);
    assert!(!h.renderer.is_hovering());
    assert_eq!(h.renderer.current_intensity(), 0.18);
    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn touch_move_prevents_default_and_touch_end_clears() {
    let mut h = Harness::new(config("ab"));
    h.init_pending();
    let inside = inside_point(&h.renderer);
    let resp = h.pointer(PointerEvent::TouchMove { client: inside });
    assert!(resp.handled && resp.prevent_default);
    assert!(h.renderer.is_hovering());

    let resp = h.pointer(PointerEvent::TouchEnd);
    assert!(resp.handled && !resp.prevent_default);
    assert!(!h.renderer.is_hovering());
}

#[test]
fn disabled_hover_ignores_pointer_input() {
    let mut h = Harness::new(FuzzyTextConfig {
        enable_hover: false,
        ..config("ab")
    });
    let seen = Rc::new(RefCell::new(0));
    let sink = seen.clone();
    h.renderer.on_hover_change(move |_| *sink.borrow_mut() += 1);
    h.init_pending();

    let inside = inside_point(&h.renderer);
    let resp = h.pointer(PointerEvent::TouchMove { client: inside });
    assert!(!resp.handled && !resp.prevent_default);
    assert!(!h.renderer.is_hovering());
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn color_change_rebuilds_the_buffer() {
    let mut h = Harness::new(config("ab"));
    h.init_pending();
    let first = h.renderer.glyphs().unwrap().clone();

    let mut style = h.renderer.style().clone();
    style.color = "#00ff00".to_string();
    let ticket = h.renderer.set_style(style).unwrap().unwrap();
    // Old buffer keeps animating until the new one lands.
    assert_eq!(h.run_frames(1), 1);
    assert!(h.init(ticket));

    let second = h.renderer.glyphs().unwrap();
    assert!(!Arc::ptr_eq(&first, second));
    assert_eq!(h.renderer.revision(), 2);
    assert_eq!(h.raster.requests[1].color, Rgba8::new(0, 255, 0, 255));
    // Exactly one loop is alive after the restart.
    assert_eq!(h.frames.pending().len(), 1);
}

#[test]
fn unchanged_style_issues_no_ticket() {
    let mut h = Harness::new(config("ab"));
    h.init_pending();
    let style = h.renderer.style().clone();
    assert!(h.renderer.set_style(style).unwrap().is_none());
}

#[test]
fn motion_change_keeps_the_buffer() {
    let mut h = Harness::new(config("ab"));
    h.init_pending();
    let first = h.renderer.glyphs().unwrap().clone();

    h.renderer
        .set_motion(FuzzMotion {
            enable_hover: true,
            base_intensity: 0.9,
            hover_intensity: 1.0,
        })
        .unwrap();
    assert!(Arc::ptr_eq(&first, h.renderer.glyphs().unwrap()));
    assert_eq!(h.renderer.revision(), 1);
    assert_eq!(h.renderer.current_intensity(), 0.9);
}

#[test]
fn stale_ticket_is_discarded() {
    let mut h = Harness::new(config("ab"));
    let stale = h.renderer.pending_init().unwrap();
    let mut style = h.renderer.style().clone();
    style.text = "abc".to_string();
    let fresh = h.renderer.set_style(style).unwrap().unwrap();

    assert!(!h.init(stale));
    assert!(h.renderer.glyphs().is_none());
    assert!(h.init(fresh));
    assert_eq!(h.raster.requests.len(), 1);
    assert_eq!(h.raster.requests[0].text, "abc");
}

#[test]
fn not_ready_fonts_keep_the_ticket_pending() {
    let mut h = Harness::new(config("ab"));
    h.raster.not_ready = true;
    let ticket = h.renderer.pending_init().unwrap();
    assert!(!h.init(ticket));
    assert_eq!(h.renderer.pending_init(), Some(ticket));

    h.raster.not_ready = false;
    assert!(h.init(ticket));
}

#[test]
fn teardown_is_idempotent_and_stops_frames() {
    let mut h = Harness::new(config("ab"));
    h.renderer.teardown(&mut h.frames);
    assert!(h.renderer.pending_init().is_none());

    let mut h = Harness::new(config("ab"));
    h.init_pending();
    h.renderer.teardown(&mut h.frames);
    h.renderer.teardown(&mut h.frames);
    assert!(!h.renderer.is_running());
    assert_eq!(h.run_frames(2), 0);
    assert!(!h.pointer(PointerEvent::MouseLeave).handled);
}

#[test]
fn teardown_before_fonts_ready_never_draws() {
    let mut h = Harness::new(config("ab"));
    let ticket = h.renderer.pending_init().unwrap();
    h.renderer.teardown(&mut h.frames);
    assert!(!h.init(ticket));
    assert!(h.renderer.glyphs().is_none());
    assert_eq!(h.surface.canvas().unwrap().size(), PixelSize::new(1, 1));
}

#[test]
fn unavailable_surface_draws_nothing() {
    let mut h = Harness::new(config("ab"));
    h.surface = HeadlessSurface::unavailable();
    assert!(h.init_pending());
    assert!(!h.renderer.is_running());
    assert!(!h.renderer.is_listening());
    assert!(h.frames.pending().is_empty());
}
