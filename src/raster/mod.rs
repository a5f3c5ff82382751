//! Raster split: an image revealed as a mosaic of flat-colored cells that subdivide under the
//! pointer until they reach single pixels.

mod config;
mod partition;
mod revealer;
mod sample;

pub use config::{RasterSplitConfig, SplitMode};
pub use partition::{
    Partition, RectId, SplitChildren, SplitRect, is_splittable, paint_partition, split_children,
};
pub use revealer::{LoadTicket, RasterSplitRevealer, SplitOutcome};
pub use sample::{FALLBACK_COLOR, SourceSamples, fit_within, sample_stride};
