use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::config;
use crate::foundation::error::{FxError, FxResult};

/// How a selected cell is subdivided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Two children along the longer axis.
    #[default]
    Half,
    /// Four children along both axes.
    Quadrant,
}

/// Options recognized by the raster split effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterSplitConfig {
    /// Opaque source identifier (path or URL) resolved by the host.
    pub image_src: String,
    pub max_width: u32,
    pub max_height: u32,
    /// Minimum pointer travel between accepted split events; `0` disables the gate.
    pub min_split_distance: f64,
    /// Corner radius reported to the host for styling only.
    pub border_radius: f64,
    pub split_mode: SplitMode,
    /// Split every cell whose center lies within this radius; `0` splits only the cell under
    /// the pointer.
    pub split_radius: f64,
}

impl Default for RasterSplitConfig {
    fn default() -> Self {
        Self {
            image_src: String::new(),
            max_width: 500,
            max_height: 500,
            min_split_distance: 0.0,
            border_radius: 16.0,
            split_mode: SplitMode::Half,
            split_radius: 0.0,
        }
    }
}

impl RasterSplitConfig {
    pub fn from_json_str(s: &str) -> FxResult<Self> {
        let cfg: Self = config::from_json_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> FxResult<Self> {
        let cfg: Self = config::from_path(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FxResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(FxError::validation("max_width/max_height must be > 0"));
        }
        for (name, v) in [
            ("min_split_distance", self.min_split_distance),
            ("border_radius", self.border_radius),
            ("split_radius", self.split_radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FxError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Whether switching from `self` to `next` invalidates the loaded samples.
    pub(crate) fn needs_reload(&self, next: &Self) -> bool {
        self.image_src != next.image_src
            || self.max_width != next.max_width
            || self.max_height != next.max_height
    }
}
