//! Drawing surfaces and pointer input.
//!
//! A [`Surface`] is whatever the host renders into: it may or may not currently provide a pixel
//! context (a lost or never-acquired context simply yields `None`) and it reports where it sits
//! on screen so client-space pointer coordinates can be mapped into surface pixels.

mod canvas;
mod input;

pub use canvas::PixelCanvas;
pub use input::{PointerEvent, PointerResponse, client_to_local, client_to_scaled};

use crate::foundation::core::{PixelSize, Point, Rect};
use crate::foundation::error::FxResult;

/// Host-provided drawing surface.
pub trait Surface {
    /// The pixel context, or `None` when the rendering context is unavailable.
    fn context(&mut self) -> Option<&mut PixelCanvas>;

    /// On-screen geometry in client coordinates.
    fn client_rect(&self) -> Rect;
}

/// In-memory surface used by the CLI and tests.
#[derive(Debug)]
pub struct HeadlessSurface {
    canvas: Option<PixelCanvas>,
    client_origin: Point,
    display_size: Option<(f64, f64)>,
}

impl HeadlessSurface {
    /// Available surface of the given initial size, placed at the client origin.
    pub fn new(size: PixelSize) -> FxResult<Self> {
        Ok(Self {
            canvas: Some(PixelCanvas::new(size.width, size.height)?),
            client_origin: Point::ZERO,
            display_size: None,
        })
    }

    /// A surface whose rendering context can never be acquired.
    pub fn unavailable() -> Self {
        Self {
            canvas: None,
            client_origin: Point::ZERO,
            display_size: None,
        }
    }

    /// Place the surface's top-left corner at `origin` in client space.
    pub fn with_client_origin(mut self, origin: Point) -> Self {
        self.client_origin = origin;
        self
    }

    /// Display the surface at a fixed on-screen size instead of its pixel size (CSS scaling).
    pub fn with_display_size(mut self, width: f64, height: f64) -> Self {
        self.display_size = Some((width, height));
        self
    }

    /// Read-only view of the pixels, if available.
    pub fn canvas(&self) -> Option<&PixelCanvas> {
        self.canvas.as_ref()
    }
}

impl Surface for HeadlessSurface {
    fn context(&mut self) -> Option<&mut PixelCanvas> {
        self.canvas.as_mut()
    }

    fn client_rect(&self) -> Rect {
        let (w, h) = match (self.display_size, &self.canvas) {
            (Some(size), _) => size,
            (None, Some(c)) => {
                let s = c.size();
                (f64::from(s.width), f64::from(s.height))
            }
            (None, None) => (0.0, 0.0),
        };
        Rect::new(
            self.client_origin.x,
            self.client_origin.y,
            self.client_origin.x + w,
            self.client_origin.y + h,
        )
    }
}
