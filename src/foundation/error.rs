/// Convenience result type used across canvasfx.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by effect building blocks.
///
/// Component entry points (`on_frame`, `handle_pointer`, `complete_init`, ...) never surface
/// these to the host; they log and degrade to "do not draw".
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font registration, lookup or glyph rasterization failures.
    #[error("font error: {0}")]
    Font(String),

    /// Image bytes could not be decoded into samples.
    #[error("decode error: {0}")]
    Decode(String),

    /// The drawing surface could not provide a pixel context.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`FxError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FxError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
