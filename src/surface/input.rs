use crate::foundation::core::{PixelSize, Point, Rect};

/// Pointer/touch events in client coordinates, as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Mouse moved over the surface.
    MouseMove { client: Point },
    /// Mouse left the surface.
    MouseLeave,
    /// Primary touch point moved over the surface.
    TouchMove { client: Point },
    /// Touch sequence ended.
    TouchEnd,
}

/// What the component did with an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerResponse {
    /// A listener was attached and consumed the event.
    pub handled: bool,
    /// The host must suppress the platform default (scrolling, gestures).
    pub prevent_default: bool,
}

impl PointerResponse {
    pub(crate) fn ignored() -> Self {
        Self::default()
    }

    pub(crate) fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }
}

/// Client point relative to the surface's top-left corner, unscaled.
pub fn client_to_local(client: Point, rect: Rect) -> Point {
    Point::new(client.x - rect.x0, client.y - rect.y0)
}

/// Client point mapped into surface pixels, accounting for on-screen scaling.
///
/// Degenerate on-screen rectangles fall back to the unscaled offset.
pub fn client_to_scaled(client: Point, rect: Rect, pixels: PixelSize) -> Point {
    let local = client_to_local(client, rect);
    let (w, h) = (rect.width(), rect.height());
    if w <= 0.0 || h <= 0.0 {
        return local;
    }
    Point::new(
        local.x / w * f64::from(pixels.width),
        local.y / h * f64::from(pixels.height),
    )
}
