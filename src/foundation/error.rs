use crate::surface::SurfaceStatus;

/// Convenience result type used across rasterfx.
pub type RasterFxResult<T> = Result<T, RasterFxError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum RasterFxError {
    /// Invalid caller-provided data (configuration, dimensions, mismatched surfaces).
    #[error("validation error: {0}")]
    Validation(String),

    /// A surface is in a non-success raster state.
    #[error("surface error: {0}")]
    Surface(SurfaceStatus),

    /// Pixel buffer allocation failed.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterFxError {
    /// Build a [`RasterFxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterFxError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`RasterFxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<SurfaceStatus> for RasterFxError {
    fn from(status: SurfaceStatus) -> Self {
        Self::Surface(status)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
