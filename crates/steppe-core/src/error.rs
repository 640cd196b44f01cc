use thiserror::Error;

/// Errors raised while building core pixel and terrain buffers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SteppeError {
    #[error("pixel buffer length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
    PixelBufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("heightmap must hold exactly {expected} elevations, got {actual}")]
    HeightmapLength { expected: usize, actual: usize },

    #[error("invalid colour '{0}': must be in fully-qualified hexadecimal CSS format (#rrggbb)")]
    InvalidColor(String),

    #[error("invalid quality '{0}': must be 'low', 'medium', or 'high'")]
    UnknownQuality(String),

    #[error("unknown capability '{0}'")]
    UnknownCapability(String),
}
