/// Errors that can occur while preparing heightmaps and texturemaps.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CompositeError {
    #[error("invalid heightmap source: {width}x{height} has no texels")]
    EmptyHeightmapSource { width: u32, height: u32 },

    #[error("invalid elevation {0}; must be in the range 0..255")]
    ElevationOutOfRange(i32),

    #[error("invalid texture dimensions {width}x{height}; must be 256x256")]
    TextureDimensions { width: u32, height: u32 },

    #[error("no texture added at height 255; unable to composite")]
    MissingTopTexture,

    #[error("invalid texturemap dimensions {width}x{height}; must be 1024x1024")]
    TexturemapDimensions { width: u32, height: u32 },
}
