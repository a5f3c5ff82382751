use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::color::parse_css_color;
use crate::foundation::config;
use crate::foundation::error::{FxError, FxResult};
use crate::text::{FontSize, FontSlant, FontWeight, TextStyle};

/// Options recognized by the fuzzy text effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzyTextConfig {
    pub text: String,
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    /// CSS family list, or `inherit` to use the render target's computed family.
    pub font_family: String,
    pub font_style: FontSlant,
    pub color: String,
    pub enable_hover: bool,
    /// Jitter amplitude multiplier while not hovered.
    pub base_intensity: f64,
    /// Jitter amplitude multiplier while hovered.
    pub hover_intensity: f64,
}

impl Default for FuzzyTextConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: FontSize::Css("clamp(2rem, 8vw, 8rem)".to_string()),
            font_weight: FontWeight(900),
            font_family: "inherit".to_string(),
            font_style: FontSlant::Normal,
            color: "#fff".to_string(),
            enable_hover: true,
            base_intensity: 0.18,
            hover_intensity: 0.5,
        }
    }
}

impl FuzzyTextConfig {
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
        self.motion().validate()?;
        validate_style(&self.style())
    }

    /// The content-affecting half of the configuration.
    pub fn style(&self) -> TextStyle {
        TextStyle {
            text: self.text.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size.clone(),
            font_weight: self.font_weight,
            font_slant: self.font_style,
            color: self.color.clone(),
        }
    }

    /// The animation-only half of the configuration.
    pub fn motion(&self) -> FuzzMotion {
        FuzzMotion {
            enable_hover: self.enable_hover,
            base_intensity: self.base_intensity,
            hover_intensity: self.hover_intensity,
        }
    }
}

/// Options that modulate the animation without touching the glyph buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzMotion {
    pub enable_hover: bool,
    pub base_intensity: f64,
    pub hover_intensity: f64,
}

impl FuzzMotion {
    pub fn validate(&self) -> FxResult<()> {
        if !self.base_intensity.is_finite() || !self.hover_intensity.is_finite() {
            return Err(FxError::validation("fuzz intensities must be finite"));
        }
        Ok(())
    }
}

pub(crate) fn validate_style(style: &TextStyle) -> FxResult<()> {
    parse_css_color(&style.color)?;
    if let FontSize::Px(px) = style.font_size {
        if !px.is_finite() || px <= 0.0 {
            return Err(FxError::validation("font_size must be finite and > 0"));
        }
    }
    if style.font_family.trim().is_empty() {
        return Err(FxError::validation("font_family must be non-empty"));
    }
    Ok(())
}
