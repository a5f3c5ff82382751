use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::config;
use crate::foundation::error::{FxError, FxResult};
use crate::fuzz::FuzzyTextConfig;
use crate::text::{FontSize, FontSlant, FontWeight};

/// One phrase or a rotation of phrases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Phrases {
    One(String),
    Many(Vec<String>),
}

impl Default for Phrases {
    fn default() -> Self {
        Self::One(String::new())
    }
}

impl Phrases {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(v) => v.clone(),
        }
    }
}

impl From<&str> for Phrases {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<Vec<&str>> for Phrases {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// Per-character typing delay drawn uniformly from `[min, max]` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpeed {
    pub min: u64,
    pub max: u64,
}

/// Timing and sequencing options of the typewriter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub text: Phrases,
    pub typing_speed_ms: u64,
    pub initial_delay_ms: u64,
    pub pause_duration_ms: u64,
    pub deleting_speed_ms: u64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub variable_speed: Option<VariableSpeed>,
    /// Hold the first tick until the host reports the target as visible.
    pub start_on_visible: bool,
    /// Start from fully displayed phrases and delete them instead of typing.
    pub reverse_mode: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            text: Phrases::default(),
            typing_speed_ms: 50,
            initial_delay_ms: 0,
            pause_duration_ms: 2000,
            deleting_speed_ms: 30,
            looping: false,
            variable_speed: None,
            start_on_visible: true,
            reverse_mode: false,
        }
    }
}

impl TypewriterConfig {
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
        if let Phrases::Many(v) = &self.text {
            if v.is_empty() {
                return Err(FxError::validation("text must contain at least one phrase"));
            }
        }
        if let Some(vs) = self.variable_speed {
            if vs.min > vs.max {
                return Err(FxError::validation(format!(
                    "variable_speed min ({}) exceeds max ({})",
                    vs.min, vs.max
                )));
            }
        }
        Ok(())
    }

    pub fn phrases(&self) -> Vec<String> {
        self.text.to_vec()
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_duration_ms)
    }

    pub fn deleting_speed(&self) -> Duration {
        Duration::from_millis(self.deleting_speed_ms)
    }

    /// Delay before the next typed character; `u` is a uniform sample in `[0, 1)`.
    pub fn typing_delay(&self, u: f64) -> Duration {
        match self.variable_speed {
            Some(VariableSpeed { min, max }) => {
                let ms = min as f64 + u.clamp(0.0, 1.0) * (max - min) as f64;
                Duration::from_millis(ms.round() as u64)
            }
            None => Duration::from_millis(self.typing_speed_ms),
        }
    }
}

/// Typewriter sequencing rendered through a hover-less fuzzy text effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyTypewriterConfig {
    #[serde(flatten)]
    pub typewriter: TypewriterConfig,
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    pub font_family: String,
    pub font_style: FontSlant,
    pub color: String,
    /// Jitter amplitude; hover is disabled so it applies at all times.
    pub fuzzy_intensity: f64,
    pub show_cursor: bool,
    pub cursor_character: String,
}

impl Default for FuzzyTypewriterConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterConfig::default(),
            font_size: FontSize::Css("clamp(1rem, 4vw, 2rem)".to_string()),
            font_weight: FontWeight::BOLD,
            font_family: "inherit".to_string(),
            font_style: FontSlant::Normal,
            color: "#ffffff".to_string(),
            fuzzy_intensity: 0.18,
            show_cursor: true,
            cursor_character: "|".to_string(),
        }
    }
}

impl FuzzyTypewriterConfig {
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
        self.typewriter.validate()?;
        self.fuzz_config(String::new()).validate()
    }

    /// Text shown for a typed prefix, cursor included.
    pub fn decorate(&self, displayed: &str) -> String {
        if self.show_cursor {
            format!("{displayed}{}", self.cursor_character)
        } else {
            displayed.to_string()
        }
    }

    /// Fuzzy text options for `text`: hover off, one intensity for both states.
    pub fn fuzz_config(&self, text: String) -> FuzzyTextConfig {
        FuzzyTextConfig {
            text,
            font_size: self.font_size.clone(),
            font_weight: self.font_weight,
            font_family: self.font_family.clone(),
            font_style: self.font_style,
            color: self.color.clone(),
            enable_hover: false,
            base_intensity: self.fuzzy_intensity,
            hover_intensity: self.fuzzy_intensity,
        }
    }
}
