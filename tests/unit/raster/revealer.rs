use super::*;
use crate::clock::ManualFrameClock;
use crate::foundation::core::Rgb8;
use crate::raster::config::SplitMode;
use crate::surface::HeadlessSurface;

/// 40x20 image: left half red, right half blue.
fn halves() -> SourceSamples {
    let mut data = Vec::with_capacity(40 * 20 * 4);
    for _y in 0..20 {
        for x in 0..40 {
            let px = if x < 20 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
            data.extend_from_slice(&px);
        }
    }
    SourceSamples::from_rgba8(40, 20, data).unwrap()
}

fn config() -> RasterSplitConfig {
    RasterSplitConfig {
        image_src: "halves.png".to_string(),
        max_width: 40,
        max_height: 40,
        ..RasterSplitConfig::default()
    }
}

fn surface() -> HeadlessSurface {
    HeadlessSurface::new(PixelSize::new(1, 1)).unwrap()
}

fn loaded(cfg: RasterSplitConfig) -> (RasterSplitRevealer, HeadlessSurface) {
    let mut r = RasterSplitRevealer::new(cfg).unwrap();
    let mut s = surface();
    let ticket = r.pending_load().unwrap();
    assert!(r.complete_load(ticket, halves(), &mut s));
    (r, s)
}

fn mv(x: f64, y: f64) -> PointerEvent {
    PointerEvent::MouseMove {
        client: Point::new(x, y),
    }
}

#[test]
fn load_seeds_one_averaged_cell_and_paints_it() {
    let (r, s) = loaded(config());
    assert_eq!(r.render_size(), Some(PixelSize::new(40, 20)));
    let p = r.partition().unwrap();
    assert_eq!(p.len(), 1);
    // Area 800 samples at stride 2: ten red and ten blue columns.
    assert_eq!(p.rects()[0].color, Rgb8::new(127, 0, 127));
    let canvas = s.canvas().unwrap();
    assert_eq!(canvas.size(), PixelSize::new(40, 20));
    assert_eq!(canvas.pixel(39, 19), Some([127, 0, 127, 255]));
}

#[test]
fn pointer_before_load_is_ignored() {
    let mut r = RasterSplitRevealer::new(config()).unwrap();
    let mut frames = ManualFrameClock::new();
    assert_eq!(r.handle_pointer(mv(5.0, 5.0), &surface(), &mut frames), SplitOutcome::Ignored);
    assert!(frames.pending().is_empty());
}

#[test]
fn stale_load_is_discarded() {
    let mut r = RasterSplitRevealer::new(config()).unwrap();
    let mut s = surface();
    let stale = r.pending_load().unwrap();
    let fresh = r.set_source("other.png");
    assert!(!r.complete_load(stale, halves(), &mut s));
    assert!(!r.is_loaded());
    assert!(r.complete_load(fresh, halves(), &mut s));
    assert!(!r.complete_load(fresh, halves(), &mut s));
}

#[test]
fn half_split_reveals_both_colors() {
    let (mut r, mut s) = loaded(config());
    let mut frames = ManualFrameClock::new();
    let out = r.handle_pointer(mv(10.0, 10.0), &s, &mut frames);
    assert_eq!(out, SplitOutcome::Split { replaced: 1, cells: 2 });

    for id in frames.tick() {
        assert!(r.on_frame(id, &mut s));
    }
    let canvas = s.canvas().unwrap();
    assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(canvas.pixel(39, 0), Some([0, 0, 255, 255]));
}

#[test]
fn distance_gate_discards_short_moves() {
    let (mut r, s) = loaded(RasterSplitConfig {
        min_split_distance: 10.0,
        ..config()
    });
    let mut frames = ManualFrameClock::new();
    assert!(matches!(
        r.handle_pointer(mv(2.0, 2.0), &s, &mut frames),
        SplitOutcome::Split { .. }
    ));
    assert_eq!(r.handle_pointer(mv(5.0, 6.0), &s, &mut frames), SplitOutcome::Gated);
    assert!(matches!(
        r.handle_pointer(mv(17.0, 2.0), &s, &mut frames),
        SplitOutcome::Split { .. }
    ));
}

#[test]
fn leaving_resets_the_gate() {
    let (mut r, s) = loaded(RasterSplitConfig {
        min_split_distance: 10.0,
        ..config()
    });
    let mut frames = ManualFrameClock::new();
    r.handle_pointer(mv(2.0, 2.0), &s, &mut frames);
    r.handle_pointer(PointerEvent::MouseLeave, &s, &mut frames);
    assert!(matches!(
        r.handle_pointer(mv(3.0, 2.0), &s, &mut frames),
        SplitOutcome::Split { .. }
    ));
}

#[test]
fn redraws_coalesce_until_the_next_frame() {
    let (mut r, mut s) = loaded(RasterSplitConfig {
        split_mode: SplitMode::Quadrant,
        ..config()
    });
    let mut frames = ManualFrameClock::new();
    for x in [1.0, 30.0, 1.5, 38.0] {
        r.handle_pointer(mv(x, 1.0), &s, &mut frames);
    }
    assert_eq!(frames.pending().len(), 1);
    assert!(r.redraw_pending());

    let ids = frames.tick();
    assert_eq!(ids.len(), 1);
    assert!(r.on_frame(ids[0], &mut s));
    assert!(!r.on_frame(ids[0], &mut s));
    assert!(!r.redraw_pending());

    r.handle_pointer(mv(20.0, 19.0), &s, &mut frames);
    assert_eq!(frames.pending().len(), 1);
}

#[test]
fn radius_mode_splits_every_nearby_cell() {
    let (mut r, s) = loaded(RasterSplitConfig {
        split_mode: SplitMode::Quadrant,
        split_radius: 15.0,
        ..config()
    });
    let mut frames = ManualFrameClock::new();
    r.handle_pointer(mv(20.0, 10.0), &s, &mut frames);
    // Quadrant centers sit at (10,5), (30,5), (10,15), (30,15): all within 15 of the middle.
    let out = r.handle_pointer(mv(20.0, 10.0), &s, &mut frames);
    assert_eq!(out, SplitOutcome::Split { replaced: 4, cells: 16 });
    assert_eq!(r.handle_pointer(mv(500.0, 500.0), &s, &mut frames), SplitOutcome::NoTarget);
}

#[test]
fn pointer_coordinates_follow_on_screen_scaling() {
    let mut r = RasterSplitRevealer::new(config()).unwrap();
    let mut s = surface()
        .with_client_origin(Point::new(100.0, 100.0))
        .with_display_size(80.0, 40.0);
    let ticket = r.pending_load().unwrap();
    r.complete_load(ticket, halves(), &mut s);
    let mut frames = ManualFrameClock::new();

    // Client (170, 120) is (70, 20) on screen, (35, 10) in render pixels: the right half.
    r.handle_pointer(mv(170.0, 120.0), &s, &mut frames);
    r.handle_pointer(mv(170.0, 120.0), &s, &mut frames);
    let cells = r.partition().unwrap().rects();
    assert_eq!(cells.len(), 3);
    assert!(cells.iter().any(|c| c.rect == CellRect::new(0, 0, 20, 20)));
}

#[test]
fn style_only_changes_keep_the_mosaic() {
    let (mut r, _s) = loaded(config());
    let next = RasterSplitConfig {
        border_radius: 0.0,
        split_mode: SplitMode::Quadrant,
        ..config()
    };
    assert!(r.set_config(next).unwrap().is_none());
    assert!(r.is_loaded());
    assert_eq!(r.border_radius(), 0.0);

    let resized = RasterSplitConfig {
        max_width: 20,
        ..config()
    };
    assert!(r.set_config(resized).unwrap().is_some());
    assert!(!r.is_loaded());
}

#[test]
fn teardown_cancels_redraw_and_is_idempotent() {
    let (mut r, mut s) = loaded(config());
    let mut frames = ManualFrameClock::new();
    r.handle_pointer(mv(5.0, 5.0), &s, &mut frames);
    r.teardown(&mut frames);
    r.teardown(&mut frames);
    assert!(frames.tick().is_empty());
    assert!(!r.is_loaded());
    assert_eq!(r.handle_pointer(mv(5.0, 5.0), &s, &mut frames), SplitOutcome::Ignored);
    assert!(!r.on_frame(FrameRequestId(1), &mut s));
}

#[test]
fn unavailable_surface_loads_without_painting() {
    let mut r = RasterSplitRevealer::new(config()).unwrap();
    let mut s = HeadlessSurface::unavailable();
    let ticket = r.pending_load().unwrap();
    assert!(r.complete_load(ticket, halves(), &mut s));
    let mut frames = ManualFrameClock::new();
    r.handle_pointer(mv(1.0, 1.0), &s, &mut frames);
    for id in frames.tick() {
        assert!(!r.on_frame(id, &mut s));
    }
}
