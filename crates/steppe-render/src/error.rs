use steppe_core::{Capability, SteppeError};
use thiserror::Error;

/// Contract violations reported by the renderer. A failed call leaves the
/// renderer exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("canvas must be 320x200, got {width}x{height}")]
    CanvasDimensions { width: u32, height: u32 },

    #[error("{name} must be 1024x1024, got {width}x{height}")]
    TexturemapDimensions {
        name: &'static str,
        width: u32,
        height: u32,
    },

    #[error("sky must be 1920x100, got {width}x{height}")]
    SkyDimensions { width: u32, height: u32 },

    #[error("invalid camera y {0}; must be in the range 200..300")]
    CameraHeightOutOfRange(i64),

    #[error("capability not enabled: {0}")]
    CapabilityNotEnabled(Capability),

    #[error("invalid water height {0}; must be in the range 0..255")]
    WaterHeightOutOfRange(i32),

    #[error("invalid sprite position ({x}, {z}); must be in the range 1024..2047")]
    SpriteOutOfBounds { x: i32, z: i32 },

    #[error(transparent)]
    Core(#[from] SteppeError),
}
