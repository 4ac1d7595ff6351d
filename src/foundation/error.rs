/// Convenience result type used across raw2gif.
pub type Raw2GifResult<T> = Result<T, Raw2GifError>;

/// Top-level error taxonomy used by the conversion pipeline.
#[derive(thiserror::Error, Debug)]
pub enum Raw2GifError {
    /// Malformed raw frame data (short header, short body, bad sizes).
    #[error("format error: {0}")]
    Format(String),

    /// No input files matched, or the input location could not be listed.
    #[error("not found: {0}")]
    NotFound(String),

    /// The animation assembler was handed zero frames.
    #[error("empty input: no frames to assemble")]
    EmptyInput,

    /// Invalid user-provided options or inconsistent frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by the GIF/PNG encoders.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Raw2GifError {
    /// Build a [`Raw2GifError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`Raw2GifError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`Raw2GifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`Raw2GifError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
