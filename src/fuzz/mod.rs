//! Fuzzy text: text rasterized once, then repainted every frame with each scanline shifted
//! horizontally by a random amount whose amplitude rises while the pointer hovers the ink.

mod config;
mod frame;
mod renderer;

pub use config::{FuzzMotion, FuzzyTextConfig};
pub use frame::{
    FUZZ_RANGE_PX, SURFACE_MARGIN_X, SURFACE_MARGIN_Y, interactive_region, paint_fuzz_frame,
    prepare_surface, region_contains, row_displacement, surface_size_for,
};
pub use renderer::{InitTicket, TextFuzzRenderer};
