use serde::{Deserialize, Serialize};

use crate::foundation::error::{FxError, FxResult};

/// Requested font size: a concrete pixel value or a CSS length expression such as
/// `"clamp(2rem, 8vw, 8rem)"` resolved through a [`StyleResolver`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSize {
    /// Absolute size in pixels.
    Px(f32),
    /// Relative/responsive CSS length.
    Css(String),
}

impl From<f32> for FontSize {
    fn from(px: f32) -> Self {
        Self::Px(px)
    }
}

impl From<&str> for FontSize {
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

/// Numeric font weight (100..=1000). Deserializes from numbers, numeric strings,
/// `"normal"` and `"bold"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u16),
            Str(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(Self(n)),
            Repr::Str(s) => match s.trim() {
                "normal" => Ok(Self::NORMAL),
                "bold" => Ok(Self::BOLD),
                other => other
                    .parse::<u16>()
                    .map(Self)
                    .map_err(|_| serde::de::Error::custom(format!("invalid font weight \"{s}\""))),
            },
        }
    }
}

/// Font slant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Every attribute whose change requires re-rasterizing the glyph buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    pub font_slant: FontSlant,
    pub color: String,
}

/// Ambient style queries answered by the host (computed styles of the render target).
pub trait StyleResolver {
    /// Computed font family of the render target, used when the caller asked for `inherit`.
    fn computed_font_family(&self) -> Option<String>;

    /// Concrete pixel size for a relative/responsive CSS size value.
    fn resolve_font_size(&self, value: &str) -> Option<f32>;
}

/// Fixed ambient style: a computed family, a root font size and a viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticStyleResolver {
    pub font_family: Option<String>,
    pub root_font_px: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for StaticStyleResolver {
    fn default() -> Self {
        Self {
            font_family: None,
            root_font_px: 16.0,
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl StyleResolver for StaticStyleResolver {
    fn computed_font_family(&self) -> Option<String> {
        self.font_family.clone()
    }

    fn resolve_font_size(&self, value: &str) -> Option<f32> {
        eval_css_length(value, self)
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Resolve `inherit` against the ambient style, falling back to `sans-serif`.
pub fn resolve_font_family(requested: &str, styles: &dyn StyleResolver) -> String {
    if requested.trim().eq_ignore_ascii_case("inherit") {
        return styles
            .computed_font_family()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| "sans-serif".to_string());
    }
    requested.to_string()
}

/// Concrete pixel size for `size`, or `None` when it cannot be resolved to a positive number.
pub fn resolve_font_px(size: &FontSize, styles: &dyn StyleResolver) -> Option<f32> {
    match size {
        FontSize::Px(px) => Some(*px).filter(|v| v.is_finite() && *v > 0.0),
        FontSize::Css(value) => styles.resolve_font_size(value),
    }
}

/// Evaluate a CSS length (`px`, `pt`, `rem`, `em`, `vw`, `vh`, `%`, unitless) or a
/// `clamp()`/`min()`/`max()` expression over them.
pub fn eval_css_length(value: &str, ctx: &StaticStyleResolver) -> FxResult<f32> {
    let s = value.trim().to_ascii_lowercase();
    if let Some((name, args)) = split_function(&s) {
        let values = split_top_level_args(args)
            .into_iter()
            .map(|a| eval_css_length(a, ctx))
            .collect::<FxResult<Vec<f32>>>()?;
        return match (name, values.as_slice()) {
            ("clamp", [lo, v, hi]) => Ok(v.min(*hi).max(*lo)),
            ("min", [first, rest @ ..]) => Ok(rest.iter().fold(*first, |a, b| a.min(*b))),
            ("max", [first, rest @ ..]) => Ok(rest.iter().fold(*first, |a, b| a.max(*b))),
            ("calc", [v]) => Ok(*v),
            _ => Err(FxError::validation(format!(
                "unsupported css function in \"{value}\""
            ))),
        };
    }

    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(s.len());
    let (num, unit) = s.split_at(split);
    let v: f32 = num
        .parse()
        .map_err(|_| FxError::validation(format!("invalid css length \"{value}\"")))?;
    let px = match unit.trim() {
        "" | "px" => v,
        "pt" => v * 4.0 / 3.0,
        "rem" | "em" => v * ctx.root_font_px,
        "%" => v * ctx.root_font_px / 100.0,
        "vw" => v * ctx.viewport_width / 100.0,
        "vh" => v * ctx.viewport_height / 100.0,
        other => {
            return Err(FxError::validation(format!(
                "unsupported css unit \"{other}\""
            )));
        }
    };
    Ok(px)
}

fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

fn split_top_level_args(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(s[start..].trim());
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
