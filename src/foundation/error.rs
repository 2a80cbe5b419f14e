/// Convenience result type used across cacheflow.
pub type CacheFlowResult<T> = Result<T, CacheFlowError>;

/// Top-level error taxonomy used by configuration, rendering and encoding APIs.
///
/// The animator itself never fails: host problems surface as [`crate::Mounted`] outcomes.
#[derive(thiserror::Error, Debug)]
pub enum CacheFlowError {
    /// Invalid user-provided configuration or scenario data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Canvas or topology that cannot be laid out.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors while rasterizing the diagram or a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames to a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CacheFlowError {
    /// Build a [`CacheFlowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CacheFlowError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`CacheFlowError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CacheFlowError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CacheFlowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
