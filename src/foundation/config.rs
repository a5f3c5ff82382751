use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::foundation::error::{FxError, FxResult};

/// Deserialize a JSON configuration document.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> FxResult<T> {
    serde_json::from_str(s).map_err(|e| FxError::serde(format!("invalid config json: {e}")))
}

/// Read and deserialize a JSON configuration file.
pub fn from_path<T: DeserializeOwned>(path: &Path) -> FxResult<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    from_json_str(&text)
}
